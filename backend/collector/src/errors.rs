//! Application-wide error types.

use thiserror::Error;

/// Plumbing errors outside the submission flow.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CollectorError>;

pub const VALIDATION_MESSAGE: &str = "Please fill in both your name and project name.";
pub const IP_LOOKUP_MESSAGE: &str =
    "Couldn't detect your IP address. Please check your connection and try again.";
pub const UNKNOWN_MESSAGE: &str = "Something went wrong. Please try again.";

/// Why a submission attempt failed.
///
/// The payload strings carry the underlying cause for logging only; the page
/// always shows the fixed text returned by [`SubmissionError::message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// One or both fields were empty after trimming.
    #[error("validation failed: both fields required")]
    Validation,

    /// The IP-echo service was unreachable or answered with a non-success status.
    #[error("IP lookup failed: {0}")]
    IpLookup(String),

    /// The webhook was unreachable or answered with a non-success status.
    #[error("webhook delivery failed: {0}")]
    WebhookDelivery(String),

    /// Anything else, e.g. a malformed lookup response.
    #[error("unexpected failure: {0}")]
    Unknown(String),
}

impl SubmissionError {
    /// User-facing message for this failure kind.
    ///
    /// `destination` names the system behind the webhook (e.g. `Teams`).
    pub fn message(&self, destination: &str) -> String {
        match self {
            Self::Validation => VALIDATION_MESSAGE.to_string(),
            Self::IpLookup(_) => IP_LOOKUP_MESSAGE.to_string(),
            Self::WebhookDelivery(_) => webhook_message(destination),
            Self::Unknown(_) => UNKNOWN_MESSAGE.to_string(),
        }
    }
}

pub fn webhook_message(destination: &str) -> String {
    format!("Failed to send to {destination}. Please try again or contact support.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_fixed_per_kind() {
        assert_eq!(
            SubmissionError::Validation.message("Teams"),
            "Please fill in both your name and project name."
        );
        assert_eq!(
            SubmissionError::IpLookup("status 500".into()).message("Teams"),
            "Couldn't detect your IP address. Please check your connection and try again."
        );
        assert_eq!(
            SubmissionError::WebhookDelivery("status 503".into()).message("Teams"),
            "Failed to send to Teams. Please try again or contact support."
        );
        assert_eq!(
            SubmissionError::Unknown("missing ip".into()).message("Teams"),
            "Something went wrong. Please try again."
        );
    }

    #[test]
    fn cause_does_not_leak_into_message() {
        let err = SubmissionError::IpLookup("connection refused at 10.0.0.1".into());
        assert!(!err.message("Teams").contains("10.0.0.1"));
        assert!(err.to_string().contains("10.0.0.1"));
    }
}
