//! Plain-text report rendering.
//!
//! Builds a human-readable summary the same way the teacher's own
//! `export_text` does: a manually formatted, column-aligned report built
//! with `{:<width}`-style format specifiers rather than a templating
//! engine, since plain text has no markup to templat away.

use crate::ReportMeta;
use sentry_core::{Alert, Severity};

/// Render `alerts` (already in the bus's severity-grouped snapshot order)
/// as a plain-text report.
pub fn render_text(meta: &ReportMeta, alerts: &[Alert]) -> String {
    let mut out = String::new();
    out.push_str("=== Reporte de Seguridad ===\n");
    out.push_str(&format!("Objetivo:   {}\n", meta.target));
    out.push_str(&format!("Generado:   {}\n", meta.generated_at.to_rfc3339()));
    out.push('\n');

    let high = alerts.iter().filter(|a| a.severity == Severity::High).count();
    let medium = alerts.iter().filter(|a| a.severity == Severity::Medium).count();
    let low = alerts.iter().filter(|a| a.severity == Severity::Low).count();
    out.push_str(&format!(
        "Total de alertas: {} ({} alta, {} media, {} baja)\n\n",
        alerts.len(),
        high,
        medium,
        low
    ));

    for severity in Severity::ORDER {
        let group: Vec<&Alert> = alerts.iter().filter(|a| a.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("--- {severity} ---\n"));
        for alert in group {
            out.push_str(&format!(
                "[{}] {:<20} {}\n",
                alert.timestamp.to_rfc3339(),
                alert.source,
                alert.message
            ));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn alert(severity: Severity, message: &str) -> Alert {
        Alert::new(severity, "port_probe", "subj", message, Utc::now())
    }

    #[test]
    fn render_text_groups_by_severity() {
        let meta = ReportMeta::new("192.168.1.10");
        let alerts = vec![
            alert(Severity::Low, "low one"),
            alert(Severity::High, "high one"),
        ];
        let text = render_text(&meta, &alerts);
        let high_pos = text.find("high one").unwrap();
        let low_pos = text.find("low one").unwrap();
        assert!(high_pos < low_pos);
    }

    #[test]
    fn render_text_includes_summary_counts() {
        let meta = ReportMeta::new("10.0.0.1");
        let alerts = vec![alert(Severity::High, "a"), alert(Severity::High, "b")];
        let text = render_text(&meta, &alerts);
        assert!(text.contains("Total de alertas: 2 (2 alta, 0 media, 0 baja)"));
    }

    #[test]
    fn render_text_on_empty_bus_has_the_literal_zero_total_and_no_detail_sections() {
        let meta = ReportMeta::new("10.0.0.1");
        let text = render_text(&meta, &[]);
        assert!(text.contains("Total de alertas: 0"));
        assert!(!text.contains("---"));
    }
}
