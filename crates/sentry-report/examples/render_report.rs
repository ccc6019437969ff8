//! Demonstrates rendering a handful of alerts to text and HTML. Run with:
//! cargo run -p sentry-report --example render_report

use sentry_core::{Alert, Severity};
use sentry_report::{render_html, render_text, ReportMeta};

fn main() {
    let alerts = vec![
        Alert::new(
            Severity::High,
            "port_probe",
            "Puerto 31337 sospechoso",
            "[ALERTA] Puerto 31337/tcp abierto (Back Orifice)",
            chrono::Utc::now(),
        ),
        Alert::new(
            Severity::Medium,
            "process_probe",
            "stress uso elevado de CPU",
            "Proceso stress (pid 4821) supera el umbral de CPU: 92.0%",
            chrono::Utc::now(),
        ),
    ];

    let meta = ReportMeta::new("192.168.1.10");
    println!("{}", render_text(&meta, &alerts));

    let html = render_html(&meta, &alerts).expect("render html");
    println!("--- HTML length: {} bytes ---", html.len());
}
