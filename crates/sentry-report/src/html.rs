//! HTML report rendering via `tera`.
//!
//! Reproduces the original report's structure: a header, an info section,
//! a four-box severity summary, and one alert section per severity,
//! ordered High, Medium, Low.

use crate::ReportMeta;
use sentry_core::{Alert, Error, Result, Severity};
use serde::Serialize;
use tera::{Context, Tera};

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="UTF-8">
<title>Sentry - Reporte de Seguridad</title>
<style>
body { font-family: sans-serif; background: #f4f4f4; margin: 0; }
.container { max-width: 960px; margin: 0 auto; padding: 20px; }
.header { background: #2c3e50; color: #fff; padding: 20px; border-radius: 4px; }
.info-section { background: #fff; padding: 16px; margin-top: 16px; border-radius: 4px; }
.summary { display: flex; gap: 12px; margin-top: 16px; }
.summary-item { flex: 1; padding: 16px; border-radius: 4px; text-align: center; color: #fff; }
.summary-total { background: #34495e; }
.summary-high { background: #c0392b; }
.summary-medium { background: #e67e22; }
.summary-low { background: #27ae60; }
.alert-section { background: #fff; margin-top: 16px; padding: 16px; border-radius: 4px; }
.alert-high .alert-item { border-left: 4px solid #c0392b; }
.alert-medium .alert-item { border-left: 4px solid #e67e22; }
.alert-low .alert-item { border-left: 4px solid #27ae60; }
.alert-item { padding: 8px 12px; margin-bottom: 8px; background: #f9f9f9; }
.alert-header { font-weight: bold; }
.alert-details { color: #555; font-size: 0.9em; }
.footer { text-align: center; color: #888; margin-top: 24px; font-size: 0.8em; }
</style>
</head>
<body>
<div class="container">
  <div class="header"><h1>Sentry - Reporte de Seguridad</h1></div>
  <div class="info-section">
    <p>Objetivo: {{ target }}</p>
    <p>Generado: {{ generated_at }}</p>
  </div>
  <div class="summary">
    <div class="summary-item summary-total">Total<br>{{ total }}</div>
    <div class="summary-item summary-high">Alta<br>{{ high_count }}</div>
    <div class="summary-item summary-medium">Media<br>{{ medium_count }}</div>
    <div class="summary-item summary-low">Baja<br>{{ low_count }}</div>
  </div>
  {% for group in groups %}
  <div class="alert-section alert-{{ group.css }}">
    <h2>{{ group.label }}</h2>
    {% for alert in group.alerts %}
    <div class="alert-item">
      <div class="alert-header">{{ alert.subject }}</div>
      <div class="alert-details">{{ alert.message }} &mdash; {{ alert.source }} &mdash; {{ alert.timestamp }}</div>
    </div>
    {% endfor %}
  </div>
  {% endfor %}
  <div class="footer">Generado por sentry</div>
</div>
</body>
</html>
"#;

#[derive(Serialize)]
struct AlertView {
    subject: String,
    message: String,
    source: String,
    timestamp: String,
}

#[derive(Serialize)]
struct SeverityGroup {
    css: &'static str,
    label: &'static str,
    alerts: Vec<AlertView>,
}

pub fn render_html(meta: &ReportMeta, alerts: &[Alert]) -> Result<String> {
    let high = alerts.iter().filter(|a| a.severity == Severity::High).count();
    let medium = alerts.iter().filter(|a| a.severity == Severity::Medium).count();
    let low = alerts.iter().filter(|a| a.severity == Severity::Low).count();

    let groups: Vec<SeverityGroup> = [
        (Severity::High, "high", "Alertas Altas"),
        (Severity::Medium, "medium", "Alertas Medias"),
        (Severity::Low, "low", "Alertas Bajas"),
    ]
    .into_iter()
    .map(|(severity, css, label)| SeverityGroup {
        css,
        label,
        alerts: alerts
            .iter()
            .filter(|a| a.severity == severity)
            .map(|a| AlertView {
                subject: a.subject.clone(),
                message: a.message.clone(),
                source: a.source.clone(),
                timestamp: a.timestamp.to_rfc3339(),
            })
            .collect(),
    })
    .collect();

    let mut context = Context::new();
    context.insert("target", &meta.target);
    context.insert("generated_at", &meta.generated_at.to_rfc3339());
    context.insert("total", &alerts.len());
    context.insert("high_count", &high);
    context.insert("medium_count", &medium);
    context.insert("low_count", &low);
    context.insert("groups", &groups);

    Tera::one_off(TEMPLATE, &context, true).map_err(|err| Error::Render(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn render_html_includes_target_and_counts() {
        let meta = ReportMeta::new("192.168.1.10");
        let alerts = vec![Alert::new(Severity::High, "port_probe", "subj", "msg", Utc::now())];
        let html = render_html(&meta, &alerts).unwrap();
        assert!(html.contains("192.168.1.10"));
        assert!(html.contains("subj"));
    }

    #[test]
    fn render_html_on_empty_alerts_still_renders() {
        let meta = ReportMeta::new("10.0.0.1");
        let html = render_html(&meta, &[]).unwrap();
        assert!(html.contains("<html"));
    }

    #[test]
    fn render_html_escapes_message_content() {
        let meta = ReportMeta::new("10.0.0.1");
        let alerts = vec![Alert::new(
            Severity::Low,
            "port_probe",
            "subj",
            "<script>alert(1)</script>",
            Utc::now(),
        )];
        let html = render_html(&meta, &alerts).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
    }
}
