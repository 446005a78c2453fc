use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    #[diagnostic(code(storage::io))]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    #[diagnostic(code(storage::serialization))]
    Serialization(#[from] serde_json::Error),
    #[error("Payment {payment_id} was modified concurrently (expected version {expected}, found {found})")]
    #[diagnostic(
        code(storage::conflict),
        help("the processor will redeliver the notification")
    )]
    Conflict {
        payment_id: String,
        expected: u64,
        found: u64,
    },
    #[error("Payment {0} already exists")]
    #[diagnostic(code(storage::already_exists))]
    AlreadyExists(String),
}

#[derive(Error, Diagnostic, Debug)]
pub enum FeedbackError {
    #[error(
        "No payment record found for {}",
        .0.as_deref().unwrap_or("feedback without a PAYMENT_ID")
    )]
    #[diagnostic(code(feedback::lookup_failure))]
    LookupFailure(Option<String>),
    #[error("The gateway response looks suspicious.")]
    #[diagnostic(code(feedback::invalid_response))]
    InvalidResponse,
    #[error("Payment has been declined by the gateway ({})", .code.as_deref().unwrap_or(""))]
    #[diagnostic(code(feedback::decline))]
    Decline { code: Option<String> },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Storage(#[from] StorageError),
    #[error("Configuration error: {0}")]
    #[diagnostic(code(feedback::config))]
    Config(String),
}

impl FeedbackError {
    /// Whether the processor should redeliver the notification.
    ///
    /// Lookup, signature and decline failures are final for a given payload;
    /// only a failed persistence step can succeed on a later attempt.
    pub fn is_redeliverable(&self) -> bool {
        matches!(self, FeedbackError::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
