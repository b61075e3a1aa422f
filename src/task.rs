//! Task records as handed to the SMS formatter.

use serde::{Deserialize, Serialize};

use crate::sms::SmsError;

/// A task to be reminded about or summarised.
///
/// Records are transient: the caller builds one, passes it in, and the
/// formatter reads it without keeping a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Short task title.
    pub title: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional ISO-8601 due timestamp, kept as written by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Raw priority key (`high`, `medium` or `low`).
    ///
    /// Kept as a string so reminders print it verbatim; summaries reject
    /// anything [`Priority::parse`] does not recognise.
    pub priority: String,
}

impl Task {
    /// Build a task with only the required fields.
    pub fn new(title: impl Into<String>, priority: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            priority: priority.into(),
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a due timestamp.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }
}

/// Priority bucket used to group a daily summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Rendered first.
    High,
    /// Rendered second.
    Medium,
    /// Rendered last.
    Low,
}

impl Priority {
    /// All buckets in summary order.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Returns the wire key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Returns the capitalised label used in summary headings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parse a wire key. Matching is exact and case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`SmsError::UnknownPriority`] for anything other than
    /// `high`, `medium` or `low`.
    pub fn parse(s: &str) -> Result<Self, SmsError> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(SmsError::UnknownPriority(other.to_owned())),
        }
    }

    /// Position of this bucket in summary order.
    pub(crate) fn index(self) -> usize {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}
