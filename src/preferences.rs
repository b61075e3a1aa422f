//! Per-recipient SMS preferences: which notification kinds are wanted and
//! when the phone should stay quiet.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Kinds of SMS the notifier can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Reminder for a single task.
    TaskReminder,
    /// Priority-grouped daily summary.
    DailySummary,
    /// AI insight digest.
    AiInsights,
    /// Pre-formatted text. Not gated by a per-kind toggle.
    Text,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::TaskReminder => "task_reminder",
            Self::DailySummary => "daily_summary",
            Self::AiInsights => "ai_insights",
            Self::Text => "text",
        })
    }
}

/// Why a notification was held back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Suppressed {
    /// SMS notifications are switched off entirely.
    #[error("SMS notifications are disabled")]
    Disabled,
    /// This kind of notification is switched off.
    #[error("{0} notifications are disabled")]
    KindDisabled(NotificationKind),
    /// The current time falls inside quiet hours.
    #[error("inside quiet hours")]
    QuietHours,
}

/// Per-kind opt-ins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindToggles {
    /// Task reminders (default on).
    pub task_reminders: bool,
    /// Daily summaries (default off).
    pub daily_summary: bool,
    /// AI insight digests (default off).
    pub ai_insights: bool,
}

impl Default for KindToggles {
    fn default() -> Self {
        Self {
            task_reminders: true,
            daily_summary: false,
            ai_insights: false,
        }
    }
}

impl KindToggles {
    /// Whether `kind` is switched on.
    pub fn allows(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::TaskReminder => self.task_reminders,
            NotificationKind::DailySummary => self.daily_summary,
            NotificationKind::AiInsights => self.ai_insights,
            NotificationKind::Text => true,
        }
    }
}

/// Daily window in which no SMS is sent, as `HH:MM` in local time.
///
/// The window is half-open, `[start, end)`. When `start` is later than `end`
/// it wraps past midnight. Equal bounds mean no quiet window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuietHours {
    /// Window start.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Window end (exclusive).
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl QuietHours {
    /// Whether `now` falls inside the quiet window.
    pub fn contains(&self, now: NaiveTime) -> bool {
        if self.start <= self.end {
            now >= self.start && now < self.end
        } else {
            now >= self.start || now < self.end
        }
    }
}

/// SMS delivery preferences for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsPreferences {
    /// Master switch (default off).
    pub enabled: bool,
    /// Default recipient.
    pub phone_number: Option<String>,
    /// Per-kind opt-ins.
    pub kinds: KindToggles,
    /// Quiet window.
    pub quiet_hours: QuietHours,
}

impl SmsPreferences {
    /// Decide whether a notification of `kind` may go out at local time `now`.
    ///
    /// # Errors
    ///
    /// Returns the first [`Suppressed`] reason that applies.
    pub fn check(&self, kind: NotificationKind, now: NaiveTime) -> Result<(), Suppressed> {
        if !self.enabled {
            return Err(Suppressed::Disabled);
        }
        if !self.kinds.allows(kind) {
            return Err(Suppressed::KindDisabled(kind));
        }
        if self.quiet_hours.contains(now) {
            return Err(Suppressed::QuietHours);
        }
        Ok(())
    }
}

/// `HH:MM` (seconds optional) serde for [`NaiveTime`].
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|e| serde::de::Error::custom(format!("invalid time {raw:?}: {e}")))
    }
}
