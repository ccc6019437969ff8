//! Central collection point for alerts raised by probes during a sample cycle.
//!
//! Unlike a general pub-sub event bus, the alert bus is a single-writer,
//! ordered record: the sampler loop publishes alerts serially as each probe
//! finishes its cycle, and reports read back a severity-grouped snapshot.
//! Within a severity group, alerts appear in the order they were published.

use crate::alert::Alert;
use crate::severity::Severity;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Running counts of published alerts, by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertCounts {
    pub total: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl AlertCounts {
    fn record(&mut self, severity: Severity) {
        self.total += 1;
        match severity {
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }
}

struct AlertBusState {
    alerts: Vec<Alert>,
    counts: AlertCounts,
}

/// Shared handle to the alert bus. Cheaply cloneable; every clone sees the
/// same underlying log.
#[derive(Clone)]
pub struct AlertBus {
    state: Arc<Mutex<AlertBusState>>,
}

impl AlertBus {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(AlertBusState {
                alerts: Vec::new(),
                counts: AlertCounts::default(),
            })),
        }
    }

    /// Append an alert to the log in publication order.
    pub fn publish(&self, alert: Alert) {
        debug!(severity = %alert.severity, source = %alert.source, "alert published");
        let mut state = self.state.lock();
        state.counts.record(alert.severity);
        state.alerts.push(alert);
    }

    /// Current counts, by severity.
    pub fn counts(&self) -> AlertCounts {
        self.state.lock().counts
    }

    /// All alerts in raw publication order (across severities).
    pub fn history(&self) -> Vec<Alert> {
        self.state.lock().alerts.clone()
    }

    /// Alerts grouped High, then Medium, then Low; insertion order is
    /// preserved within each group.
    pub fn snapshot(&self) -> Vec<Alert> {
        let state = self.state.lock();
        let mut out = Vec::with_capacity(state.alerts.len());
        for severity in Severity::ORDER {
            out.extend(state.alerts.iter().filter(|a| a.severity == severity).cloned());
        }
        out
    }

    /// Remove all recorded alerts and reset counters.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.alerts.clear();
        state.counts = AlertCounts::default();
    }
}

impl Default for AlertBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn alert(severity: Severity, subject: &str) -> Alert {
        Alert::new(severity, "test_probe", subject, "msg", Utc::now())
    }

    #[test]
    fn publish_increments_counts() {
        let bus = AlertBus::new();
        bus.publish(alert(Severity::High, "a"));
        bus.publish(alert(Severity::Low, "b"));
        let counts = bus.counts();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.high, 1);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.medium, 0);
    }

    #[test]
    fn snapshot_groups_by_severity_preserving_insertion_order() {
        let bus = AlertBus::new();
        bus.publish(alert(Severity::High, "h1"));
        bus.publish(alert(Severity::Low, "l1"));
        bus.publish(alert(Severity::Medium, "m1"));
        bus.publish(alert(Severity::High, "h2"));

        let snapshot = bus.snapshot();
        let subjects: Vec<&str> = snapshot.iter().map(|a| a.subject.as_str()).collect();
        assert_eq!(subjects, vec!["h1", "h2", "m1", "l1"]);
    }

    #[test]
    fn history_preserves_raw_publication_order() {
        let bus = AlertBus::new();
        bus.publish(alert(Severity::Low, "l1"));
        bus.publish(alert(Severity::High, "h1"));
        let history = bus.history();
        let subjects: Vec<&str> = history.iter().map(|a| a.subject.as_str()).collect();
        assert_eq!(subjects, vec!["l1", "h1"]);
    }

    #[test]
    fn clear_resets_log_and_counts() {
        let bus = AlertBus::new();
        bus.publish(alert(Severity::High, "h1"));
        bus.clear();
        assert_eq!(bus.counts(), AlertCounts::default());
        assert!(bus.history().is_empty());
    }
}
