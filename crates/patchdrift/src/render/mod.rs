//! Report renderers.
//!
//! A [`Report`] can be rendered three ways:
//! - `text` - counts plus one line per drifted method and per skipped patch
//! - `json` - the versioned [`CompareResponse`] envelope
//! - `html` - a self-contained document with side-by-side panes

pub mod html;
pub mod text;

use clap::ValueEnum;

use patchdrift_core::error::PatchdriftError;
use patchdrift_core::output::CompareResponse;
use patchdrift_core::report::Report;

use crate::cli::to_json;

/// Output format of the compare command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary (default).
    #[default]
    Text,
    /// Full JSON response.
    Json,
    /// Standalone HTML document with two-pane diffs.
    Html,
}

/// Render `report` in `format`.
pub fn render_report(report: &Report, format: OutputFormat) -> Result<String, PatchdriftError> {
    match format {
        OutputFormat::Text => Ok(text::TextSummary::new(report).to_string()),
        OutputFormat::Json => to_json(&CompareResponse::from_report(report)),
        OutputFormat::Html => Ok(html::HtmlReport::new(report).to_string()),
    }
}
