//! PDF generation by shelling out to whichever HTML-to-PDF tool is
//! installed, in order of preference.
//!
//! The original report generator built a shell command string and handed
//! it to `system()`; here every invocation is an argument vector passed
//! straight to [`std::process::Command`], so no path or filename can be
//! interpreted by a shell.

use sentry_core::{Error, Result};
use std::path::Path;
use std::process::Command;

/// One external tool this module knows how to invoke, in trial order.
enum PdfTool {
    Wkhtmltopdf,
    Weasyprint,
    ChromiumHeadless(&'static str),
}

const TOOLS: &[PdfTool] = &[
    PdfTool::Wkhtmltopdf,
    PdfTool::Weasyprint,
    PdfTool::ChromiumHeadless("chromium-browser"),
    PdfTool::ChromiumHeadless("google-chrome"),
];

fn build_command(tool: &PdfTool, html_path: &Path, pdf_path: &Path) -> Command {
    match tool {
        PdfTool::Wkhtmltopdf => {
            let mut cmd = Command::new("wkhtmltopdf");
            cmd.args(["--page-size", "A4"])
                .args(["--margin-top", "10mm"])
                .args(["--margin-bottom", "10mm"])
                .args(["--margin-left", "10mm"])
                .args(["--margin-right", "10mm"])
                .arg(html_path)
                .arg(pdf_path);
            cmd
        }
        PdfTool::Weasyprint => {
            let mut cmd = Command::new("weasyprint");
            cmd.arg(html_path).arg(pdf_path);
            cmd
        }
        PdfTool::ChromiumHeadless(binary) => {
            let mut cmd = Command::new(binary);
            cmd.args(["--headless", "--disable-gpu"])
                .arg(format!("--print-to-pdf={}", pdf_path.display()))
                .arg(html_path);
            cmd
        }
    }
}

/// Try each known tool against `html_path` until one succeeds, writing the
/// result to `pdf_path`. Returns an error naming every tool that failed or
/// was not installed if none succeeded; the HTML file is left in place
/// either way.
pub fn convert_html_to_pdf(html_path: &Path, pdf_path: &Path) -> Result<()> {
    let mut failures = Vec::new();
    for tool in TOOLS {
        let mut cmd = build_command(tool, html_path, pdf_path);
        match cmd.output() {
            Ok(output) if output.status.success() => return Ok(()),
            Ok(output) => failures.push(format!("exit status {}", output.status)),
            Err(err) => failures.push(err.to_string()),
        }
    }
    Err(Error::ExternalTool(format!(
        "no PDF tool succeeded for {}: {}",
        html_path.display(),
        failures.join("; ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command_for_wkhtmltopdf_uses_argv_not_shell_string() {
        let cmd = build_command(&PdfTool::Wkhtmltopdf, Path::new("in.html"), Path::new("out.pdf"));
        assert_eq!(cmd.get_program(), "wkhtmltopdf");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert!(args.contains(&"in.html".to_string()));
        assert!(args.contains(&"out.pdf".to_string()));
    }

    #[test]
    fn convert_html_to_pdf_fails_cleanly_when_no_tool_is_installed() {
        // In the sandboxed test environment none of wkhtmltopdf, weasyprint,
        // or a headless browser are on PATH, so every attempt should fail
        // without panicking, propagating a descriptive error.
        let result = convert_html_to_pdf(Path::new("/tmp/does-not-exist.html"), Path::new("/tmp/out.pdf"));
        assert!(result.is_err());
    }
}
