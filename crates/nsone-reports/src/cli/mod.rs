//! CLI argument parsing and the report pipeline.

pub mod args;
pub mod report;

use args::Cli;
use clap::Parser;
use nsone_client::Ns1Client;
use nsone_core::TimeWindow;
use tracing::debug;

use crate::config::{ConfigFile, Settings};
use crate::delivery::mail::Mailer;
use crate::error::Result;
use crate::logging;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    run_with(Cli::parse()).await
}

/// Run the pipeline for already parsed arguments.
pub async fn run_with(cli: Cli) -> Result<()> {
    // Load configuration
    let file = ConfigFile::load(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, &file)?;

    logging::init(settings.verbose, settings.log_dir.as_deref())?;
    debug!(
        unit = %settings.unit,
        amount = settings.amount,
        limit = settings.limit,
        format = %settings.format,
        export = settings.export,
        mail = settings.mail.is_some(),
        "settings resolved"
    );

    let window = TimeWindow::ending_now(settings.unit, settings.amount)?;
    debug!(start = window.start_timestamp(), end = window.end_timestamp(), "time window");

    let client = Ns1Client::builder(settings.api_key.as_str())
        .base_url(settings.api_url.as_str())
        .timeout(settings.timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    debug!(api = client.base_url(), "client ready");

    let mailer = settings.mail.clone().map(Mailer::smtp).transpose()?;

    if settings.export {
        report::export(&settings, &client, &window, mailer.as_ref()).await
    } else {
        report::console(&settings, &client, &window, mailer.as_ref()).await
    }
}
