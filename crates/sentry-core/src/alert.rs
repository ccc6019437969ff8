//! The [`Alert`] record published by probes onto the [`crate::alert_bus::AlertBus`].

use crate::severity::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length, in characters, of [`Alert::subject`].
pub const MAX_SUBJECT_LEN: usize = 64;
/// Maximum length, in characters, of [`Alert::message`].
pub const MAX_MESSAGE_LEN: usize = 512;

/// A single alert raised by a probe during a sample cycle.
///
/// `subject` and `message` are truncated at construction time so the
/// length invariants always hold for anything that reaches the bus;
/// callers never need to validate an `Alert` after receiving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    /// Name of the probe that raised this alert (e.g. `"port_probe"`).
    pub source: String,
    pub subject: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn new(
        severity: Severity,
        source: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            severity,
            source: source.into(),
            subject: truncate_chars(subject.into(), MAX_SUBJECT_LEN),
            message: truncate_chars(message.into(), MAX_MESSAGE_LEN),
            timestamp,
        }
    }
}

fn truncate_chars(mut s: String, max: usize) -> String {
    if s.chars().count() > max {
        let cut = s.char_indices().nth(max).map(|(i, _)| i).unwrap_or(s.len());
        s.truncate(cut);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn new_preserves_short_fields() {
        let a = Alert::new(Severity::Low, "port_probe", "subj", "msg", ts());
        assert_eq!(a.subject, "subj");
        assert_eq!(a.message, "msg");
    }

    #[test]
    fn new_truncates_oversized_subject_and_message() {
        let long_subject = "x".repeat(MAX_SUBJECT_LEN + 10);
        let long_message = "y".repeat(MAX_MESSAGE_LEN + 10);
        let a = Alert::new(Severity::High, "fs_probe", long_subject, long_message, ts());
        assert_eq!(a.subject.chars().count(), MAX_SUBJECT_LEN);
        assert_eq!(a.message.chars().count(), MAX_MESSAGE_LEN);
    }
}
