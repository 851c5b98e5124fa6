//! Tracing subscriber setup.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::error::{ReportError, Result};

/// Log file created inside the configured log directory
pub const LOG_FILE_NAME: &str = "nsone-reports.log";

const QUIET: &str = "warn";
const DEBUG: &str = "warn,nsone_reports=debug,nsone_client=debug,nsone_core=debug";

/// Install the global subscriber.
///
/// With a log directory, debug output is appended to [`LOG_FILE_NAME`] there;
/// otherwise logs go to stderr. `RUST_LOG` overrides the level either way.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> Result<()> {
    let default = if verbose || log_dir.is_some() { DEBUG } else { QUIET };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let installed = match log_dir {
        Some(dir) => {
            let path = dir.join(LOG_FILE_NAME);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    ReportError::Config(format!("cannot open log file {}: {e}", path.display()))
                })?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    installed.map_err(|e| ReportError::Config(format!("cannot initialise logging: {e}")))
}
