//! Effective settings for one run: command line merged over the config file.

use lettre::message::Mailbox;
use nsone_client::DEFAULT_BASE_URL;
use nsone_core::TimeUnit;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::{expand_path, ConfigFile};
use crate::cli::args::Cli;
use crate::error::{ReportError, Result};
use crate::output::OutputFormat;

const DEFAULT_AMOUNT: u64 = 1;
const DEFAULT_LIMIT: u32 = 20;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SMTP_SERVER: &str = "localhost";
const DEFAULT_SMTP_PORT: u16 = 465;
const DEFAULT_SUBJECT: &str = "NS1 Activity Report";

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// TLS from the first byte (SMTPS, usually port 465)
    #[default]
    Tls,
    /// Plain connection upgraded with STARTTLS (usually port 587)
    Starttls,
    /// No encryption, for local relays only
    None,
}

/// SMTP server connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub security: SmtpSecurity,
    /// Username and password, only when both are configured
    pub credentials: Option<(String, String)>,
}

/// Everything needed to mail a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    pub subject: String,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub smtp: SmtpSettings,
}

/// Immutable settings for a single report run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_url: String,
    pub timeout: Duration,
    pub unit: TimeUnit,
    pub amount: u64,
    pub limit: u32,
    pub format: OutputFormat,
    pub export: bool,
    pub silent: bool,
    /// Explicit export destination
    pub output: Option<PathBuf>,
    /// Directory for default-named exports
    pub export_dir: PathBuf,
    /// Present when mail delivery was requested
    pub mail: Option<MailSettings>,
    pub log_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl Settings {
    /// Merge command-line options over the config file and validate the result.
    ///
    /// Everything that can be checked without the network is checked here.
    pub fn resolve(cli: &Cli, file: &ConfigFile) -> Result<Self> {
        let api_key = non_empty(cli.api_key.as_deref())
            .or_else(|| non_empty(file.nsone.api_key.as_deref()))
            .ok_or_else(|| {
                ReportError::Config(
                    "API key required.\n\n\
                     Set it with one of:\n  \
                     1. --api-key <KEY>\n  \
                     2. NSONE_API_KEY environment variable\n  \
                     3. api_key in the [nsone] section of the config file"
                        .to_string(),
                )
            })?
            .to_string();

        let format = cli
            .format
            .or(file.defaults.format)
            .unwrap_or_default();

        if cli.export && format.export_format().is_none() {
            return Err(ReportError::Config(format!(
                "format {format} is only available without --export"
            )));
        }

        if !cli.export && !format.is_text() {
            return Err(ReportError::Format(format!(
                "{format} is a binary format and can only be produced with --export"
            )));
        }

        let amount = at_least_one(
            "amount",
            cli.amount.or(file.defaults.amount).unwrap_or(DEFAULT_AMOUNT),
        )?;
        let limit = at_least_one(
            "limit",
            cli.limit.or(file.defaults.limit).unwrap_or(DEFAULT_LIMIT),
        )?;
        let timeout_secs = at_least_one(
            "timeout_secs",
            file.nsone.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        )?;

        let mail = match cli.mailto.as_deref() {
            Some(mailto) => Some(resolve_mail(cli, file, mailto)?),
            None => None,
        };

        Ok(Self {
            api_key,
            api_url: non_empty(cli.api_url.as_deref())
                .or_else(|| non_empty(file.nsone.api_url.as_deref()))
                .unwrap_or(DEFAULT_BASE_URL)
                .to_string(),
            timeout: Duration::from_secs(timeout_secs),
            unit: cli.unit.or(file.defaults.unit).unwrap_or_default(),
            amount,
            limit,
            format,
            export: cli.export,
            silent: cli.silent,
            output: cli
                .output
                .as_ref()
                .map(|p| expand_path(&p.to_string_lossy())),
            export_dir: file
                .export
                .dir
                .as_deref()
                .map_or_else(|| PathBuf::from("."), expand_path),
            mail,
            log_dir: file.nsone.log_dir.as_deref().map(expand_path),
            verbose: cli.verbose,
        })
    }
}

fn resolve_mail(cli: &Cli, file: &ConfigFile, mailto: &str) -> Result<MailSettings> {
    let recipients = non_empty(Some(mailto))
        .or_else(|| non_empty(file.smtp.mailto.as_deref()))
        .map(parse_recipients)
        .transpose()?
        .unwrap_or_default();

    if recipients.is_empty() {
        return Err(ReportError::Delivery(
            "no recipient: pass addresses to --mailto or set mailto in [smtp]".to_string(),
        ));
    }

    let from = non_empty(cli.mailfrom.as_deref())
        .or_else(|| non_empty(file.smtp.from.as_deref()))
        .ok_or_else(|| {
            ReportError::Delivery("no sender: pass --mailfrom or set from in [smtp]".to_string())
        })?
        .parse::<Mailbox>()?;

    let credentials = match (&file.smtp.username, &file.smtp.password) {
        (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
        _ => None,
    };

    Ok(MailSettings {
        from,
        to: recipients,
        subject: file
            .mail
            .subject
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
        header: file.mail.header.clone(),
        footer: file.mail.footer.clone(),
        smtp: SmtpSettings {
            server: file
                .smtp
                .server
                .clone()
                .unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
            port: file.smtp.port.unwrap_or(DEFAULT_SMTP_PORT),
            security: file.smtp.security.unwrap_or_default(),
            credentials,
        },
    })
}

/// Split a comma-separated address list, skipping blanks.
pub fn parse_recipients(list: &str) -> Result<Vec<Mailbox>> {
    list.split(',')
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(|addr| {
            addr.parse::<Mailbox>()
                .map_err(|e| ReportError::Delivery(format!("invalid recipient {addr:?}: {e}")))
        })
        .collect()
}

fn at_least_one<T>(name: &str, value: T) -> Result<T>
where
    T: Copy + Default + PartialEq + std::fmt::Display,
{
    if value == T::default() {
        return Err(ReportError::Config(format!("{name} must be at least 1, got {value}")));
    }
    Ok(value)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
