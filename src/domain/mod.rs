mod approval_action;
mod approval_request;
mod collection_type;
mod email_address;
mod item_data;
mod item_id;
mod item_status;

pub use approval_action::ApprovalAction;
pub use approval_request::ApprovalRequest;
pub use collection_type::CollectionType;
pub use email_address::EmailAddress;
pub use item_data::ItemData;
pub use item_id::ItemId;
pub use item_status::ItemStatus;
