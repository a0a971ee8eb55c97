/// The payload describing the item awaiting review.
///
/// Upstream applications attach whatever fields their collection carries; we only ever read the
/// title and the description, while everything else is captured by the flattened extension map so
/// that a request is not rejected for being richer than we expect.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ItemData {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
