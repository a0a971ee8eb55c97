use crate::domain::{ApprovalAction, ApprovalRequest, CollectionType, EmailAddress, ItemData, ItemId};
use crate::email_client::EmailClient;
use crate::startup::{AdminEmail, ApplicationBaseUrl, ApprovalSecret};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::{ExposeSecret, Secret};
use tera::{Context as tcontext, Tera};

/// The shape of the item-creation event posted by the upstream application. Missing fields or an
/// `itemData` that is not an object never reach the handler - the `Json` extractor turns them
/// into a `400 Bad Request` on its own.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyBody {
    item_id: String,
    collection_type: String,
    item_data: ItemData,
}

impl TryFrom<NotifyBody> for ApprovalRequest {
    type Error = String;

    fn try_from(body: NotifyBody) -> Result<Self, Self::Error> {
        let item_id = ItemId::parse(body.item_id)?;
        let collection_type = CollectionType::parse(body.collection_type)?;
        Ok(Self {
            item_id,
            collection_type,
            item_data: body.item_data,
        })
    }
}

#[derive(thiserror::Error)]
pub enum NotifyError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to send email.")]
    EmailDeliveryError(#[source] anyhow::Error),
}

impl std::fmt::Debug for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for NotifyError {
    fn status_code(&self) -> StatusCode {
        match self {
            NotifyError::ValidationError(_) => StatusCode::BAD_REQUEST,
            NotifyError::EmailDeliveryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Callers get a flat JSON `{"error": ...}` carrying the `Display` representation only - the
    /// underlying cause chain stays in the logs.
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

/// Iterates over the whole chain of errors that led to the failure we are formatting - the
/// `Debug` representation actix-web logs for a failed request.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

#[tracing::instrument(
    name = "Notify the admin of a new item",
    skip(body, email_client, admin_email, base_url, approval_secret, templates),
    fields(
        item_id = %body.item_id,
        collection_type = %body.collection_type
    )
)]
pub async fn notify_admin(
    body: web::Json<NotifyBody>,
    email_client: web::Data<EmailClient>,
    admin_email: web::Data<AdminEmail>,
    base_url: web::Data<ApplicationBaseUrl>,
    approval_secret: web::Data<ApprovalSecret>,
    templates: web::Data<&Tera>,
) -> Result<HttpResponse, NotifyError> {
    let request: ApprovalRequest = body.0.try_into().map_err(NotifyError::ValidationError)?;
    send_approval_email(
        &email_client,
        templates.get_ref(),
        &request,
        &admin_email.0,
        &base_url.0,
        &approval_secret.0,
    )
    .await
    .map_err(NotifyError::EmailDeliveryError)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Admin notification email sent!" })))
}

/// Renders the approval email and hands it to the delivery provider - a single attempt, exactly
/// one outbound call per valid notification.
#[tracing::instrument(
    name = "Send an approval request email to the admin",
    skip(email_client, templates, request, recipient, base_url, approval_secret)
)]
pub async fn send_approval_email(
    email_client: &EmailClient,
    templates: &Tera,
    request: &ApprovalRequest,
    recipient: &EmailAddress,
    base_url: &str,
    approval_secret: &Secret<String>,
) -> Result<(), anyhow::Error> {
    let accept_link = approval_link(base_url, ApprovalAction::Accept, request, approval_secret)
        .context("Failed to build the accept link")?;
    let reject_link = approval_link(base_url, ApprovalAction::Reject, request, approval_secret)
        .context("Failed to build the reject link")?;

    let collection_name = request.collection_type.display_name();
    // A blank optional field counts as absent.
    let title = request.item_data.title.as_deref().filter(|t| !t.is_empty());
    let subject = format!(
        "New {} for Approval: {}",
        collection_name,
        // An untitled item is announced by its identifier instead.
        title.unwrap_or_else(|| request.item_id.as_ref())
    );

    // Everything inserted here is auto-escaped by Tera; the links are the one exception, marked
    // `safe` in the template because we built and encoded them ourselves.
    let mut template_context = tcontext::new();
    template_context.insert("collection_name", &collection_name);
    template_context.insert("item_id", request.item_id.as_ref());
    template_context.insert("title", title.unwrap_or("N/A"));
    template_context.insert(
        "description",
        request
            .item_data
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("N/A"),
    );
    template_context.insert("accept_link", &accept_link);
    template_context.insert("reject_link", &reject_link);
    let html_body = templates
        .render("approval_email.html", &template_context)
        .context("Failed to render the approval email template")?;

    email_client
        .send_email(recipient, &subject, &html_body)
        .await
        .context("Failed to dispatch the notification email")?;
    Ok(())
}

/// Builds one of the two callback links embedded in the email. Every link carries the shared
/// secret - clicking it is the only authentication the callback has.
fn approval_link(
    base_url: &str,
    action: ApprovalAction,
    request: &ApprovalRequest,
    approval_secret: &Secret<String>,
) -> Result<String, serde_urlencoded::ser::Error> {
    let query = serde_urlencoded::to_string([
        ("action", action.as_str()),
        ("itemId", request.item_id.as_ref()),
        ("collectionType", request.collection_type.as_ref()),
        ("token", approval_secret.expose_secret().as_str()),
    ])?;
    Ok(format!("{base_url}/handle-approval?{query}"))
}
