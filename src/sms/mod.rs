//! SMS module: message formatting, the gateway seam, and the notifier that
//! ties them together.
//!
//! Every operation is a one-shot pipeline: format the body, hand it to the
//! gateway once, collapse the outcome. Nothing is retained between calls.

pub mod format;
pub mod gateway;
pub mod http_gateway;
pub mod notifier;

pub use format::{
    format_ai_insights, format_daily_summary, format_task_reminder, parse_due_date,
    DEFAULT_INSIGHTS_MAX_CHARS,
};
pub use gateway::{DryRunGateway, SentMessage, SmsGateway};
pub use http_gateway::HttpSmsGateway;
pub use notifier::SmsNotifier;

/// Errors from formatting or delivering a single SMS.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// The task's due date is not an ISO-8601 timestamp.
    #[error("invalid due date {value:?}: {source}")]
    InvalidDueDate {
        /// The rejected input.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: chrono::ParseError,
    },

    /// A task carried a priority key outside `high`/`medium`/`low`.
    #[error("unrecognized priority: {0:?}")]
    UnknownPriority(String),

    /// The gateway refused or failed to deliver the message.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors raised by an [`SmsGateway`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP transport failure.
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The account service refused the credentials.
    #[error("gateway authentication failed: {0}")]
    Authentication(String),

    /// The account service rejected the message.
    #[error("gateway rejected message with status {status}: {body}")]
    Rejected {
        /// HTTP status code (200 when the envelope itself reported failure).
        status: u16,
        /// Sanitised response body or envelope error.
        body: String,
    },

    /// Response did not match the expected envelope.
    #[error("gateway response parse error: {0}")]
    Parse(String),
}

/// Mask a phone number for logging, keeping only the last four characters.
pub fn mask_recipient(recipient: &str) -> String {
    let chars: Vec<char> = recipient.trim().chars().collect();
    let keep = chars.len().min(4);
    let tail: String = chars[chars.len().saturating_sub(keep)..].iter().collect();
    format!("***{tail}")
}
