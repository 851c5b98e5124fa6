//! Getting a finished report to its destination: stdout, a file, or email.

pub mod mail;

use chrono::{DateTime, Utc};
use nsone_core::ExportArtifact;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ReportError, Result};

/// Write report text to stdout.
pub fn print_report(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text.trim_end_matches('\n'))
        .and_then(|()| stdout.flush())
        .map_err(|e| ReportError::Delivery(format!("cannot write to stdout: {e}")))
}

/// Where an export goes when no `--output` was given.
pub fn default_export_path(dir: &Path, artifact: &ExportArtifact, at: DateTime<Utc>) -> PathBuf {
    dir.join(artifact.file_name(at))
}

/// Write an export to disk, creating missing parent directories.
pub fn save_artifact(artifact: &ExportArtifact, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReportError::Delivery(format!("cannot create {}: {e}", parent.display()))
        })?;
    }

    std::fs::write(path, &artifact.bytes)
        .map_err(|e| ReportError::Delivery(format!("cannot write {}: {e}", path.display())))?;

    info!(path = %path.display(), bytes = artifact.len(), "export saved");
    Ok(())
}
