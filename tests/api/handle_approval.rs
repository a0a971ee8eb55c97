use crate::helpers::spawn_app;
use wiremock::matchers::{any, body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

/// Build the query string an approval link would carry.
fn approval_query(action: &str, item_id: &str, collection_type: &str, token: &str) -> String {
    serde_urlencoded::to_string([
        ("action", action),
        ("itemId", item_id),
        ("collectionType", collection_type),
        ("token", token),
    ])
    .unwrap()
}

#[tokio::test]
async fn clicking_the_accept_link_updates_the_store_and_confirms() {
    // Arrange
    let app = spawn_app().await;
    let body = serde_json::json!({
        "itemId": "abc123",
        "collectionType": "treasure_hunts",
        "itemData": { "title": "Gold Coin" }
    });

    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;
    app.post_notify_admin(&body).await;

    let email_request = &app.email_server.received_requests().await.unwrap()[0];
    let links = app.approval_links(email_request);

    Mock::given(method("PATCH"))
        .and(path(app.document_path("treasure_hunts", "abc123")))
        .and(body_json(serde_json::json!({ "status": "accepted" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.store_server)
        .await;

    // Act - the admin clicks the green button
    let response = reqwest::get(links.accept)
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response.text().await.unwrap(),
        "Item abc123 has been accepted. Thank you!"
    );
}

#[tokio::test]
async fn rejecting_an_item_marks_it_rejected() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(method("PATCH"))
        .and(path(app.document_path("treasure_hunts", "abc123")))
        .and(body_json(serde_json::json!({ "status": "rejected" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.store_server)
        .await;

    // Act
    let response = app
        .get_handle_approval(&approval_query(
            "reject",
            "abc123",
            "treasure_hunts",
            &app.approval_secret,
        ))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response.text().await.unwrap(),
        "Item abc123 has been rejected. Thank you!"
    );
}

#[tokio::test]
async fn an_invalid_token_is_rejected_before_anything_else() {
    // Arrange
    let app = spawn_app().await;

    // We assert that no update is fired at the document store!
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.store_server)
        .await;

    // Even with a nonsensical action the response does not hint at which check failed
    let test_cases = vec![
        approval_query("accept", "abc123", "treasure_hunts", "i-am-guessing"),
        approval_query("publish", "abc123", "treasure_hunts", "i-am-guessing"),
    ];

    for query in test_cases {
        // Act
        let response = app.get_handle_approval(&query).await;

        // Assert
        assert_eq!(400, response.status().as_u16());
        assert_eq!(
            response.text().await.unwrap(),
            "Invalid or missing parameters, or unauthorized token."
        );
    }
}

#[tokio::test]
async fn an_unknown_action_is_rejected() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.store_server)
        .await;

    // The action is matched exactly - a different casing is not accepted
    let test_cases = vec![
        approval_query("publish", "abc123", "treasure_hunts", &app.approval_secret),
        approval_query("Accept", "abc123", "treasure_hunts", &app.approval_secret),
    ];

    for query in test_cases {
        // Act
        let response = app.get_handle_approval(&query).await;

        // Assert
        assert_eq!(400, response.status().as_u16());
        assert_eq!(response.text().await.unwrap(), "Invalid action specified.");
    }
}

#[tokio::test]
async fn handle_approval_returns_a_400_when_parameters_are_missing_or_blank() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.store_server)
        .await;

    // Absent and empty parameters are folded into the same catch-all rejection as a bad token
    let test_cases = vec![
        (
            format!(
                "itemId=abc123&collectionType=treasure_hunts&token={}",
                app.approval_secret
            ),
            "missing the action",
        ),
        (
            format!(
                "action=accept&collectionType=treasure_hunts&token={}",
                app.approval_secret
            ),
            "missing the item id",
        ),
        (
            format!("action=accept&itemId=abc123&token={}", app.approval_secret),
            "missing the collection type",
        ),
        (
            "action=accept&itemId=abc123&collectionType=treasure_hunts".to_string(),
            "missing the token",
        ),
        (
            format!(
                "action=&itemId=abc123&collectionType=treasure_hunts&token={}",
                app.approval_secret
            ),
            "carrying an empty action",
        ),
        (
            format!(
                "action=accept&itemId=&collectionType=treasure_hunts&token={}",
                app.approval_secret
            ),
            "carrying an empty item id",
        ),
        (
            format!(
                "action=accept&itemId=abc123&collectionType=&token={}",
                app.approval_secret
            ),
            "carrying an empty collection type",
        ),
    ];

    for (query, error_message) in test_cases {
        // Act
        let response = app.get_handle_approval(&query).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the query was {}.",
            error_message
        );
        assert_eq!(
            response.text().await.unwrap(),
            "Invalid or missing parameters, or unauthorized token.",
            "The API did not reply with the catch-all rejection when the query was {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn handle_approval_returns_a_400_for_a_malformed_item_id() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.store_server)
        .await;

    // Act
    let response = app
        .get_handle_approval(&approval_query(
            "accept",
            "{abc123}",
            "treasure_hunts",
            &app.approval_secret,
        ))
        .await;

    // Assert
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn a_store_failure_is_reported_as_an_internal_error() {
    // Arrange
    let app = spawn_app().await;

    // 404 for a document that does not exist, 500 for an unavailable store - both surface the
    // same way to the caller
    let test_cases = vec![404, 500];

    for store_status in test_cases {
        let _mock_guard = Mock::given(method("PATCH"))
            .and(path(app.document_path("treasure_hunts", "abc123")))
            .respond_with(ResponseTemplate::new(store_status))
            .expect(1)
            .mount_as_scoped(&app.store_server)
            .await;

        // Act
        let response = app
            .get_handle_approval(&approval_query(
                "accept",
                "abc123",
                "treasure_hunts",
                &app.approval_secret,
            ))
            .await;

        // Assert
        assert_eq!(500, response.status().as_u16());
        assert_eq!(
            response.text().await.unwrap(),
            "Internal Server Error during document store update."
        );
    }
}

#[tokio::test]
async fn approving_twice_updates_the_store_twice() {
    // Arrange
    let app = spawn_app().await;

    // Nothing makes the links single-use: each click issues its own update
    Mock::given(method("PATCH"))
        .and(path(app.document_path("treasure_hunts", "abc123")))
        .and(body_json(serde_json::json!({ "status": "accepted" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.store_server)
        .await;

    let query = approval_query("accept", "abc123", "treasure_hunts", &app.approval_secret);

    // Act
    let first = app.get_handle_approval(&query).await;
    let second = app.get_handle_approval(&query).await;

    // Assert
    assert_eq!(200, first.status().as_u16());
    assert_eq!(200, second.status().as_u16());
}
