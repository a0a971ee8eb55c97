use crate::domain::{CollectionType, ItemId, ItemStatus};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

/// Credentials for the document store, deserialized from the service account blob handed to us
/// through configuration.
#[derive(serde::Deserialize, Clone)]
pub struct ServiceCredentials {
    pub project_id: String,
    pub api_token: Secret<String>,
}

/// A client for the external document store: named collections of identifier-keyed documents with
/// partial-field update support.
///
/// It is constructed once at startup - credential problems abort the process before the first
/// request instead of surfacing on the first click of an approval link.
pub struct DocumentStoreClient {
    http_client: Client,
    base_url: String,
    project_id: String,
    api_token: Secret<String>,
}

impl DocumentStoreClient {
    pub fn new(
        base_url: String,
        credentials: ServiceCredentials,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            project_id: credentials.project_id,
            api_token: credentials.api_token,
        })
    }

    /// Issues a partial update against the document identified by (collection, item id), touching
    /// only the `status` field.
    ///
    /// There is no read-before-write and no existence check on our side: the store rejects updates
    /// to documents that do not exist and that error is surfaced to the caller unchanged.
    pub async fn update_item_status(
        &self,
        collection: &CollectionType,
        item_id: &ItemId,
        status: ItemStatus,
    ) -> Result<(), reqwest::Error> {
        // Collection names and item ids are caller-supplied; encode them so they stay single path
        // segments.
        let url = format!(
            "{}/v1/projects/{}/collections/{}/documents/{}",
            self.base_url,
            self.project_id,
            urlencoding::encode(collection.as_ref()),
            urlencoding::encode(item_id.as_ref()),
        );
        let request_body = UpdateDocumentRequest {
            status: status.as_str(),
        };
        self.http_client
            .patch(&url)
            .bearer_auth(self.api_token.expose_secret())
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// A PATCH body listing only the fields to change - the rest of the document is left untouched.
#[derive(serde::Serialize)]
struct UpdateDocumentRequest<'a> {
    status: &'a str,
}
