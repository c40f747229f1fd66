//! Report rendering
//!
//! The run report is rendered once, after the last test, through a [`ReportRenderer`]. Plain text is the default
//! (optionally coloured for terminals); JSON suits CI tooling that wants the counts without scraping.

use std::env;
use std::io::{self, IsTerminal};

use clap::ValueEnum;
use sctest_core::RunReport;
use serde_json::json;

const GREEN: &str = "\x1b[1;32m";
const RED: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

/// When to colour the summary lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Colour when stdout is a terminal and NO_COLOR is unset
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Auto => io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Turns a finished [`RunReport`] into the text written to stdout.
pub trait ReportRenderer {
    fn render(&self, report: &RunReport) -> String;
}

/// `"<n> passed"`, `"<m> failed"`, then one `ERROR at ...` line per failure.
pub struct TextRenderer {
    color: bool,
}

impl TextRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, line: String, color: &str) -> String {
        if self.color {
            format!("{}{}{}", color, line, RESET)
        } else {
            line
        }
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &RunReport) -> String {
        if !self.color {
            return report.to_string();
        }

        let mut out = String::new();
        out.push_str(&self.paint(report.passed_line(), GREEN));
        out.push('\n');
        let failed_color = if report.is_success() { GREEN } else { RED };
        out.push_str(&self.paint(report.failed_line(), failed_color));
        out.push('\n');
        for failure in report.failures() {
            out.push_str(failure);
            out.push('\n');
        }
        out
    }
}

pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, report: &RunReport) -> String {
        let value = json!({
            "passed": report.passed(),
            "failed": report.failed(),
            "total": report.total(),
            "failures": report.failures(),
        });
        format!("{:#}\n", value)
    }
}

/// Pick the renderer for the requested format.
pub fn renderer(format: ReportFormat, color: ColorMode) -> Box<dyn ReportRenderer> {
    match format {
        ReportFormat::Text => Box::new(TextRenderer::new(color.enabled())),
        ReportFormat::Json => Box::new(JsonRenderer),
    }
}
