use crate::domain::{CollectionType, ItemData, ItemId};

/// A validated request to put a newly created item in front of the administrator.
///
/// Making an incorrect usage pattern unrepresentable, by construction, is known as *type driven
/// development*: once a value of this type exists, the identifier and the collection name have
/// already passed parsing, and the rest of the pipeline can splice them into URLs and documents
/// without re-checking.
pub struct ApprovalRequest {
    pub item_id: ItemId,
    pub collection_type: CollectionType,
    pub item_data: ItemData,
}
