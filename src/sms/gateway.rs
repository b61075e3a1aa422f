//! The delivery seam between formatting and the SMS account service.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::info;

use super::{mask_recipient, GatewayError};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Delivery capability for plain-text SMS.
///
/// Implementations own authentication and transport. The notifier only ever
/// calls [`SmsGateway::send`], once per operation.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Deliver `body` to `recipient`.
    ///
    /// The recipient is passed through unvalidated; number checks belong to
    /// the account service.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the service rejects the message or is
    /// unreachable.
    async fn send(&self, recipient: &str, body: &str) -> Result<(), GatewayError>;
}

// ---------------------------------------------------------------------------
// Dry run
// ---------------------------------------------------------------------------

/// A message captured by [`DryRunGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Recipient as given.
    pub recipient: String,
    /// Message body as given.
    pub body: String,
}

/// Gateway that accepts every message without delivering it.
///
/// Messages are logged and kept in memory so callers can print or inspect
/// them afterwards.
#[derive(Debug, Default)]
pub struct DryRunGateway {
    sent: Mutex<Vec<SentMessage>>,
}

impl DryRunGateway {
    /// Create an empty dry-run gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages accepted so far, oldest first.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SmsGateway for DryRunGateway {
    async fn send(&self, recipient: &str, body: &str) -> Result<(), GatewayError> {
        info!(
            recipient = %mask_recipient(recipient),
            chars = body.chars().count(),
            "dry run: message not delivered"
        );
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentMessage {
                recipient: recipient.to_owned(),
                body: body.to_owned(),
            });
        Ok(())
    }
}
