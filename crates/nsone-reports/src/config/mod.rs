//! Configuration file handling.
//!
//! The file is TOML with one table per concern:
//!
//! ```toml
//! [nsone]
//! api_key = "..."
//!
//! [defaults]
//! unit = "hours"
//! amount = 1
//!
//! [smtp]
//! server = "smtp.example.com"
//! from = "reports@example.com"
//! ```

mod settings;

pub use settings::{parse_recipients, MailSettings, Settings, SmtpSecurity, SmtpSettings};

use directories::ProjectDirs;
use nsone_core::TimeUnit;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::output::OutputFormat;

/// Config file looked up in the home directory when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "~/.nsone_reports.toml";

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub nsone: ApiSection,

    #[serde(default)]
    pub defaults: DefaultsSection,

    #[serde(default)]
    pub smtp: SmtpSection,

    #[serde(default)]
    pub mail: MailSection,

    #[serde(default)]
    pub export: ExportSection,
}

/// `[nsone]` - API access and logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    pub api_key: Option<String>,

    /// Override of the API base URL.
    pub api_url: Option<String>,

    pub timeout_secs: Option<u64>,

    /// Directory for `nsone-reports.log`.
    pub log_dir: Option<String>,
}

/// `[defaults]` - fallbacks for the command-line options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsSection {
    pub unit: Option<TimeUnit>,
    pub amount: Option<u64>,
    pub limit: Option<u32>,
    pub format: Option<OutputFormat>,
}

/// `[smtp]` - outgoing mail server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpSection {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub security: Option<SmtpSecurity>,
    pub username: Option<String>,
    pub password: Option<String>,

    /// Default sender address.
    pub from: Option<String>,

    /// Default recipients, comma separated.
    pub mailto: Option<String>,
}

/// `[mail]` - message text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MailSection {
    pub subject: Option<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
}

/// `[export]` - where exports land when no `--output` is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    pub dir: Option<String>,
}

impl ConfigFile {
    /// Candidate paths tried when no `--config` is given, in order.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![expand_path(DEFAULT_CONFIG_PATH)];

        if let Some(dirs) = ProjectDirs::from("net", "nsone", "nsone-reports") {
            paths.push(dirs.config_dir().join("config.toml"));
        }

        paths
    }

    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, the first existing default
    /// path is used, and built-in defaults apply if there is none.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let path = expand_path(&path.to_string_lossy());
            return Self::read(&path);
        }

        for path in Self::default_paths() {
            if path.exists() {
                return Self::read(&path);
            }
        }

        debug!("no config file found, using built-in defaults");
        Ok(Self::default())
    }

    /// Read and parse one config file.
    pub fn read(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config file");

        let content = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;

        Self::parse(&content)
            .map_err(|e| ReportError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse config file contents.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
