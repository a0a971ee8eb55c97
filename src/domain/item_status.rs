/// The one field this service ever writes to an item document.
///
/// The update is unconditional: no prior state is read, so a later click simply overwrites an
/// earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Accepted,
    Rejected,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Accepted => "accepted",
            ItemStatus::Rejected => "rejected",
        }
    }
}
