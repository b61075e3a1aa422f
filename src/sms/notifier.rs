//! Format-then-send operations over a shared gateway handle.
//!
//! Each operation comes in two shapes:
//! - `try_*` returns a typed [`SmsError`] so callers can tell bad input from
//!   delivery failure
//! - the plain form logs the failure and collapses it to `bool`
//!
//! In both shapes the body is fully built before the gateway is called, so a
//! formatting error never results in a partial send.

use std::sync::Arc;

use tracing::{info, warn};

use super::format::{
    format_ai_insights, format_daily_summary, format_task_reminder, DEFAULT_INSIGHTS_MAX_CHARS,
};
use super::gateway::SmsGateway;
use super::{mask_recipient, SmsError};
use crate::task::Task;

/// Sends task notifications through an [`SmsGateway`].
#[derive(Clone)]
pub struct SmsNotifier {
    gateway: Arc<dyn SmsGateway>,
    insights_max_chars: usize,
}

impl std::fmt::Debug for SmsNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsNotifier")
            .field("insights_max_chars", &self.insights_max_chars)
            .finish_non_exhaustive()
    }
}

impl SmsNotifier {
    /// Create a notifier over an already-authenticated gateway.
    pub fn new(gateway: Arc<dyn SmsGateway>) -> Self {
        Self {
            gateway,
            insights_max_chars: DEFAULT_INSIGHTS_MAX_CHARS,
        }
    }

    /// Override the insight length cap (default 1000 characters).
    #[must_use]
    pub fn with_insights_limit(mut self, max_chars: usize) -> Self {
        self.insights_max_chars = max_chars;
        self
    }

    /// Send a reminder for one task.
    ///
    /// # Errors
    ///
    /// Returns [`SmsError::InvalidDueDate`] before contacting the gateway if
    /// the due date does not parse, or [`SmsError::Gateway`] if delivery fails.
    pub async fn try_send_task_reminder(
        &self,
        recipient: &str,
        task: &Task,
    ) -> Result<(), SmsError> {
        let message = format_task_reminder(task)?;
        self.deliver(recipient, &message).await
    }

    /// Send a daily summary grouped by priority.
    ///
    /// # Errors
    ///
    /// Returns [`SmsError::UnknownPriority`] before contacting the gateway if
    /// any task has an unrecognised priority, or [`SmsError::Gateway`] if
    /// delivery fails.
    pub async fn try_send_daily_summary(
        &self,
        recipient: &str,
        tasks: &[Task],
    ) -> Result<(), SmsError> {
        let message = format_daily_summary(tasks)?;
        self.deliver(recipient, &message).await
    }

    /// Send an insight digest, truncated to the configured limit.
    ///
    /// # Errors
    ///
    /// Returns [`SmsError::Gateway`] if delivery fails.
    pub async fn try_send_ai_insights(
        &self,
        recipient: &str,
        insights: &str,
    ) -> Result<(), SmsError> {
        let message = format_ai_insights(insights, self.insights_max_chars);
        self.deliver(recipient, &message).await
    }

    /// Send an already-formatted body unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SmsError::Gateway`] if delivery fails.
    pub async fn try_send_text(&self, recipient: &str, text: &str) -> Result<(), SmsError> {
        self.deliver(recipient, text).await
    }

    /// Boolean form of [`Self::try_send_task_reminder`].
    pub async fn send_task_reminder(&self, recipient: &str, task: &Task) -> bool {
        report(
            "task reminder",
            recipient,
            self.try_send_task_reminder(recipient, task).await,
        )
    }

    /// Boolean form of [`Self::try_send_daily_summary`].
    pub async fn send_daily_summary(&self, recipient: &str, tasks: &[Task]) -> bool {
        report(
            "daily summary",
            recipient,
            self.try_send_daily_summary(recipient, tasks).await,
        )
    }

    /// Boolean form of [`Self::try_send_ai_insights`].
    pub async fn send_ai_insights(&self, recipient: &str, insights: &str) -> bool {
        report(
            "AI insights",
            recipient,
            self.try_send_ai_insights(recipient, insights).await,
        )
    }

    /// Boolean form of [`Self::try_send_text`].
    pub async fn send_text(&self, recipient: &str, text: &str) -> bool {
        report(
            "text message",
            recipient,
            self.try_send_text(recipient, text).await,
        )
    }

    async fn deliver(&self, recipient: &str, message: &str) -> Result<(), SmsError> {
        self.gateway.send(recipient, message).await?;
        Ok(())
    }
}

fn report(kind: &'static str, recipient: &str, outcome: Result<(), SmsError>) -> bool {
    match outcome {
        Ok(()) => {
            info!(kind, recipient = %mask_recipient(recipient), "SMS sent");
            true
        }
        Err(e) => {
            warn!(kind, recipient = %mask_recipient(recipient), error = %e, "error sending SMS");
            false
        }
    }
}
