//! tasksms — SMS task notifications.
//!
//! Formats task reminders, priority-grouped daily summaries and AI insight
//! digests as plain text and hands them to an SMS account gateway.
//!
//! See `DESIGN.md` for architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod logging;
pub mod preferences;
pub mod sms;
pub mod task;
