//! Renders alert bus snapshots as plain-text or HTML reports, and converts
//! HTML reports to PDF via whatever external tool is available.

pub mod html;
pub mod pdf;
pub mod text;

use chrono::{DateTime, Utc};

pub use html::render_html;
pub use pdf::convert_html_to_pdf;
pub use text::render_text;

/// Fields common to every report, independent of output format.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub target: String,
    pub generated_at: DateTime<Utc>,
}

impl ReportMeta {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            generated_at: Utc::now(),
        }
    }
}
