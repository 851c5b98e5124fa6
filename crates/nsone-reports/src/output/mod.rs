//! Output formatting for different formats.

mod render;
mod summary;

pub use render::{html_document, render_csv, render_html, render_json, render_xml, REPORT_TITLE};
pub use summary::{render_table, render_yaml, ActivitySummary};

use clap::ValueEnum;
use nsone_core::{ActivityRecord, ExportFormat};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Renders a batch of records as text
pub type Renderer = fn(&[ActivityRecord]) -> Result<String>;

/// Available report formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON array of records
    #[default]
    Json,
    /// XML document
    Xml,
    /// CSV with one row per record
    Csv,
    /// PDF document (--export only)
    Pdf,
    /// Excel workbook (--export only)
    Xlsx,
    /// HTML page with a table of records
    Html,
    /// Summary table for the terminal (not exportable)
    Table,
    /// YAML summary per record (not exportable)
    Yaml,
}

impl OutputFormat {
    /// Matching server-side export format, if the API can produce this one
    #[must_use]
    pub const fn export_format(self) -> Option<ExportFormat> {
        match self {
            Self::Json => Some(ExportFormat::Json),
            Self::Xml => Some(ExportFormat::Xml),
            Self::Csv => Some(ExportFormat::Csv),
            Self::Pdf => Some(ExportFormat::Pdf),
            Self::Xlsx => Some(ExportFormat::Xlsx),
            Self::Html => Some(ExportFormat::Html),
            Self::Table | Self::Yaml => None,
        }
    }

    /// Whether records can be rendered locally as text in this format
    #[must_use]
    pub fn is_text(self) -> bool {
        self.renderer().is_some()
    }

    /// Local renderer for this format; `None` for binary formats
    #[must_use]
    pub fn renderer(self) -> Option<Renderer> {
        match self {
            Self::Json => Some(render_json as Renderer),
            Self::Xml => Some(render_xml as Renderer),
            Self::Csv => Some(render_csv as Renderer),
            Self::Html => Some(render_html as Renderer),
            Self::Table => Some(render_table as Renderer),
            Self::Yaml => Some(render_yaml as Renderer),
            Self::Pdf | Self::Xlsx => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Xml => write!(f, "xml"),
            Self::Csv => write!(f, "csv"),
            Self::Pdf => write!(f, "pdf"),
            Self::Xlsx => write!(f, "xlsx"),
            Self::Html => write!(f, "html"),
            Self::Table => write!(f, "table"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Render records in `format`.
pub fn render(format: OutputFormat, records: &[ActivityRecord]) -> Result<String> {
    let renderer = format.renderer().ok_or_else(|| {
        ReportError::Format(format!("{format} cannot be rendered as text"))
    })?;
    renderer(records)
}
