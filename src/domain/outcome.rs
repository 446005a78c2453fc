use serde::Serialize;

/// Status reported when the amount is reserved but not yet captured.
pub const STATUS_AUTHORISED: &str = "5";
/// Status reported when the payment was requested (captured).
pub const STATUS_PAYMENT_REQUESTED: &str = "9";
/// Status reported when the merchant processed the payment manually.
pub const STATUS_PROCESSED_BY_MERCHANT: &str = "95";

/// Statuses other than the authorisation sentinel that count as success.
pub const SUCCESS_STATUSES: [&str; 2] = [STATUS_PAYMENT_REQUESTED, STATUS_PROCESSED_BY_MERCHANT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Authorized,
    Completed,
    Declined,
    Invalid,
}

impl OutcomeKind {
    pub fn is_success(self) -> bool {
        matches!(self, OutcomeKind::Authorized | OutcomeKind::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedOutcome {
    pub kind: OutcomeKind,
    pub remote_id: Option<String>,
    pub error_code: Option<String>,
}

impl ClassifiedOutcome {
    pub fn invalid(remote_id: Option<String>) -> Self {
        Self {
            kind: OutcomeKind::Invalid,
            remote_id,
            error_code: None,
        }
    }
}
