use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Ns1Error, Result};

/// File formats the NS1 API can render an activity export in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Xml,
    Csv,
    Pdf,
    Xlsx,
    Html,
}

impl ExportFormat {
    /// Every export format, in the order shown in help output
    pub const ALL: [Self; 6] = [
        Self::Json,
        Self::Xml,
        Self::Csv,
        Self::Pdf,
        Self::Xlsx,
        Self::Html,
    ];

    /// Value of the `export` query parameter
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Html => "html",
        }
    }

    /// File extension, without the dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        self.as_str()
    }

    /// MIME type used when attaching the export to an email
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Csv => "text/csv",
            Self::Pdf => "application/pdf",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Html => "text/html",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Ns1Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Ns1Error::InvalidFormat(s.to_string()))
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report rendered by the API in one of the [`ExportFormat`]s
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Format the bytes are in
    pub format: ExportFormat,

    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Wrap raw export bytes
    #[must_use]
    pub const fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    /// Default file name for an export generated at `at`
    #[must_use]
    pub fn file_name(&self, at: DateTime<Utc>) -> String {
        format!(
            "nsone-activity-{}.{}",
            at.format("%Y%m%dT%H%M%SZ"),
            self.format.extension()
        )
    }

    /// Size in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the API returned an empty body
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_parsing() {
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
        }
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!(matches!(
            "docx".parse::<ExportFormat>(),
            Err(Ns1Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 12, 30, 5).unwrap();
        let artifact = ExportArtifact::new(ExportFormat::Csv, b"a,b\n".to_vec());
        assert_eq!(artifact.file_name(at), "nsone-activity-20240517T123005Z.csv");
    }

    #[test]
    fn test_artifact_size() {
        let empty = ExportArtifact::new(ExportFormat::Csv, Vec::new());
        assert!(empty.is_empty());

        let pdf = ExportArtifact::new(ExportFormat::Pdf, b"%PDF-1.4".to_vec());
        assert_eq!(pdf.len(), 8);
        assert!(!pdf.is_empty());
    }
}
