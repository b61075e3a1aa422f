//! Plain-text SMS bodies built from task data.
//!
//! All functions here are pure: identical input always yields identical text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use super::SmsError;
use crate::task::{Priority, Task};

/// Maximum number of insight characters carried in one message.
pub const DEFAULT_INSIGHTS_MAX_CHARS: usize = 1000;

const SUMMARY_HEADER: &str = "Daily Task Summary:\n\n";
const INSIGHTS_HEADER: &str = "AI Task Insights:\n\n";

/// `February 22, 2024 at 03:00 PM`
const DUE_DATE_FORMAT: &str = "%B %d, %Y at %I:%M %p";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

/// Parse an ISO-8601 due date into its wall-clock value.
///
/// Accepts a bare date (midnight), a date-time with `T` or space separator,
/// and RFC 3339 with `Z` or a numeric offset. Basic (`20240222T150000`) and
/// reduced-precision (`2024-02-22T15`) forms are accepted too, as are offsets
/// written as `+05` or `+0530`. Offsets are dropped rather than converted, so
/// the rendered time is the one written in the input.
///
/// # Errors
///
/// Returns [`SmsError::InvalidDueDate`] when no accepted form matches.
pub fn parse_due_date(raw: &str) -> Result<NaiveDateTime, SmsError> {
    let value = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Ok(dt.naive_local());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(dt);
        }
    }
    if let Some(dt) = normalize_iso8601(value)
        .and_then(|extended| NaiveDateTime::parse_from_str(&extended, NAIVE_FORMATS[0]).ok())
    {
        return Ok(dt);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|source| SmsError::InvalidDueDate {
            value: raw.to_owned(),
            source,
        })
}

/// Rewrite basic, reduced-precision or short-offset ISO-8601 into
/// `YYYY-MM-DDTHH:MM:SS[.fff]`, dropping any offset. Missing time parts are
/// zero.
fn normalize_iso8601(value: &str) -> Option<String> {
    let regex = Regex::new(
        r"^(\d{4})-?(\d{2})-?(\d{2})(?:[T ](\d{2})(?::?(\d{2})(?::?(\d{2})(?:[.,](\d{1,9})\d*)?)?)?)?(?:Z|[+-]\d{2}(?::?\d{2})?)?$",
    )
    .ok()?;
    let caps = regex.captures(value)?;
    let part = |i: usize| caps.get(i).map_or("00", |m| m.as_str());

    let mut extended = format!(
        "{}-{}-{}T{}:{}:{}",
        part(1),
        part(2),
        part(3),
        part(4),
        part(5),
        part(6)
    );
    if let Some(fraction) = caps.get(7) {
        extended.push('.');
        extended.push_str(fraction.as_str());
    }
    Some(extended)
}

/// Build a reminder for a single task.
///
/// ```text
/// Task Reminder: {title}
/// Description: {description}      (only when non-empty)
/// Due: {Month DD, YYYY at HH:MM AM/PM}   (only when present)
/// Priority: {priority}
/// ```
///
/// No trailing newline follows the priority line.
///
/// # Errors
///
/// Returns [`SmsError::InvalidDueDate`] if `due_date` is present but cannot be
/// parsed.
pub fn format_task_reminder(task: &Task) -> Result<String, SmsError> {
    let mut lines = Vec::with_capacity(4);
    lines.push(format!("Task Reminder: {}", task.title));

    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("Description: {description}"));
    }

    if let Some(raw) = task.due_date.as_deref().filter(|d| !d.is_empty()) {
        let due = parse_due_date(raw)?;
        lines.push(format!("Due: {}", due.format(DUE_DATE_FORMAT)));
    }

    lines.push(format!("Priority: {}", task.priority));
    Ok(lines.join("\n"))
}

/// Build a daily summary grouping task titles by priority.
///
/// Buckets appear in high, medium, low order; empty buckets are omitted and
/// titles keep their input order within a bucket. Sections are separated by
/// one blank line and the last section has no trailing newline.
///
/// # Errors
///
/// Returns [`SmsError::UnknownPriority`] if any task has a priority outside
/// the three recognised keys. Nothing is rendered in that case.
pub fn format_daily_summary(tasks: &[Task]) -> Result<String, SmsError> {
    let mut buckets: [Vec<&str>; 3] = Default::default();
    for task in tasks {
        let priority = Priority::parse(&task.priority)?;
        buckets[priority.index()].push(task.title.as_str());
    }

    let sections: Vec<String> = Priority::ALL
        .iter()
        .zip(buckets.iter())
        .filter(|(_, titles)| !titles.is_empty())
        .map(|(priority, titles)| {
            let mut section = format!("{} Priority:", priority.label());
            for title in titles {
                section.push_str("\n- ");
                section.push_str(title);
            }
            section
        })
        .collect();

    let mut message = String::from(SUMMARY_HEADER);
    message.push_str(&sections.join("\n\n"));
    Ok(message)
}

/// Build an insight digest, hard-cut to `max_chars` characters.
///
/// The cut counts characters rather than bytes and ignores word boundaries.
pub fn format_ai_insights(insights: &str, max_chars: usize) -> String {
    let body: String = insights.chars().take(max_chars).collect();
    format!("{INSIGHTS_HEADER}{body}")
}
