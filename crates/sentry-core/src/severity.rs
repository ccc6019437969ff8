//! Alert severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a published [`crate::alert::Alert`].
///
/// Ordering is significant: [`AlertBus`](crate::alert_bus::AlertBus) reports
/// and exports group alerts High, then Medium, then Low, preserving
/// publication order within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// All severities, in report/export order.
    pub const ORDER: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_report_labels() {
        assert_eq!(Severity::High.to_string(), "HIGH");
        assert_eq!(Severity::Medium.to_string(), "MEDIUM");
        assert_eq!(Severity::Low.to_string(), "LOW");
    }

    #[test]
    fn order_is_high_medium_low() {
        assert_eq!(Severity::ORDER, [Severity::High, Severity::Medium, Severity::Low]);
    }
}
