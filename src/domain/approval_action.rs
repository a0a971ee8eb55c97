use crate::domain::ItemStatus;

/// The decision carried by an approval callback.
///
/// Parsing is case-sensitive on purpose: the only legitimate source of these values are the links
/// we generate ourselves, and those use the lowercase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    Accept,
    Reject,
}

impl ApprovalAction {
    pub fn parse(s: &str) -> Result<ApprovalAction, String> {
        match s {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            other => Err(format!("{other} is not a valid approval action.")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalAction::Accept => "accept",
            ApprovalAction::Reject => "reject",
        }
    }

    /// The status value written to the item's document when this action is taken.
    pub fn resolved_status(&self) -> ItemStatus {
        match self {
            ApprovalAction::Accept => ItemStatus::Accepted,
            ApprovalAction::Reject => ItemStatus::Rejected,
        }
    }
}
