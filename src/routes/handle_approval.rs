use crate::document_store::DocumentStoreClient;
use crate::domain::{ApprovalAction, CollectionType, ItemId};
use crate::routes::error_chain_fmt;
use crate::startup::ApprovalSecret;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::ExposeSecret;

/// Every query parameter the approval callback may carry. It needs to implement
/// `serde::Deserialize` to enable `actix-web` to build it from the incoming query string, and it is
/// enough to add a function parameter of type `web::Query<Parameters>` to instruct `actix-web` to
/// only call the handler if the extraction was successful. Every field is an `Option`: the handler
/// decides what an absent parameter means instead of letting the extractor reply on its own.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    action: Option<String>,
    item_id: Option<String>,
    collection_type: Option<String>,
    token: Option<String>,
}

#[derive(thiserror::Error)]
pub enum ApprovalError {
    #[error("Invalid or missing parameters, or unauthorized token.")]
    UnauthorizedToken,
    #[error("Invalid action specified.")]
    InvalidAction,
    #[error("{0}")]
    ValidationError(String),
    #[error("Internal Server Error during document store update.")]
    StoreUpdateError(#[source] anyhow::Error),
}

impl std::fmt::Debug for ApprovalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// We rely on the default `error_response` implementation: a plain-text body carrying the
/// `Display` representation of the error. `UnauthorizedToken` deliberately maps to a `400`, the
/// same status an unauthenticated caller gets for a malformed request, so the response does not
/// reveal which of the two checks failed.
impl ResponseError for ApprovalError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApprovalError::UnauthorizedToken => StatusCode::BAD_REQUEST,
            ApprovalError::InvalidAction => StatusCode::BAD_REQUEST,
            ApprovalError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApprovalError::StoreUpdateError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[tracing::instrument(
    name = "Handle an admin approval decision",
    skip(parameters, store_client, approval_secret),
    fields(
        action = ?parameters.action,
        item_id = ?parameters.item_id,
        collection_type = ?parameters.collection_type
    )
)]
pub async fn handle_approval(
    parameters: web::Query<Parameters>,
    store_client: web::Data<DocumentStoreClient>,
    approval_secret: web::Data<ApprovalSecret>,
) -> Result<HttpResponse, ApprovalError> {
    let parameters = parameters.0;
    let action = parameters.action.unwrap_or_default();
    let item_id = parameters.item_id.unwrap_or_default();
    let collection_type = parameters.collection_type.unwrap_or_default();
    let token = parameters.token.unwrap_or_default();
    // An absent or empty parameter fails the same gate as a mismatched token, before anything
    // else is looked at.
    if action.is_empty()
        || item_id.is_empty()
        || collection_type.is_empty()
        || token != *approval_secret.0.expose_secret()
    {
        return Err(ApprovalError::UnauthorizedToken);
    }
    let action = ApprovalAction::parse(&action).map_err(|_| ApprovalError::InvalidAction)?;
    let item_id = ItemId::parse(item_id).map_err(ApprovalError::ValidationError)?;
    let collection_type =
        CollectionType::parse(collection_type).map_err(ApprovalError::ValidationError)?;

    let status = action.resolved_status();
    store_client
        .update_item_status(&collection_type, &item_id, status)
        .await
        .context("Failed to update the item's status in the document store")
        .map_err(ApprovalError::StoreUpdateError)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(format!(
            "Item {} has been {}. Thank you!",
            item_id,
            status.as_str()
        )))
}
