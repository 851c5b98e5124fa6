//! The two delivery modes: console reports and exports.

use chrono::Utc;
use colored::Colorize;
use lettre::Transport;
use nsone_client::Ns1Client;
use nsone_core::TimeWindow;
use std::fmt::Display;
use tracing::info;

use crate::config::Settings;
use crate::delivery::{self, mail::Mailer};
use crate::error::{ReportError, Result};
use crate::output;

/// Fetch records, render them locally, print and optionally mail the text.
pub async fn console<T>(
    settings: &Settings,
    client: &Ns1Client,
    window: &TimeWindow,
    mailer: Option<&Mailer<T>>,
) -> Result<()>
where
    T: Transport,
    T::Error: Display,
{
    let records = client.activity().in_window(window, settings.limit).await?;
    info!(count = records.len(), "activity fetched");

    let text = output::render(settings.format, &records)?;

    if !settings.silent {
        delivery::print_report(&text)?;
    }

    if let Some(mailer) = mailer {
        if records.is_empty() {
            info!("no activity in window, mail not sent");
        } else {
            mailer.send_report(&text, settings.format)?;
        }
    }

    Ok(())
}

/// Fetch the server-rendered export, then save and/or mail it.
///
/// The export is written to `--output` when given. Without `--output` it is
/// written to a timestamped file in the export directory, unless it is mailed.
pub async fn export<T>(
    settings: &Settings,
    client: &Ns1Client,
    window: &TimeWindow,
    mailer: Option<&Mailer<T>>,
) -> Result<()>
where
    T: Transport,
    T::Error: Display,
{
    let format = settings.format.export_format().ok_or_else(|| {
        ReportError::Config(format!("format {} cannot be exported", settings.format))
    })?;

    let artifact = client
        .activity()
        .export_window(window, settings.limit, format)
        .await?;
    info!(format = %format, bytes = artifact.len(), "export fetched");

    let now = Utc::now();
    let mut status = Vec::new();

    let path = match (&settings.output, mailer) {
        (Some(path), _) => Some(path.clone()),
        (None, None) => Some(delivery::default_export_path(&settings.export_dir, &artifact, now)),
        (None, Some(_)) => None,
    };

    if let Some(path) = path {
        delivery::save_artifact(&artifact, &path)?;
        status.push(format!("{} {}", "Saved:".green().bold(), path.display()));
    }

    if let Some(mailer) = mailer {
        if artifact.is_empty() {
            info!("empty export, mail not sent");
            status.push(format!("{} export was empty, no mail sent", "Skipped:".yellow().bold()));
        } else {
            mailer.send_export(&artifact, window, now)?;

            let recipients: Vec<String> = mailer.settings().to.iter().map(ToString::to_string).collect();
            status.push(format!("{} {}", "Mailed:".green().bold(), recipients.join(", ")));
        }
    }

    if !settings.silent {
        delivery::print_report(&status.join("\n"))?;
    }

    Ok(())
}
