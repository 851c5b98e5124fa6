//! Command-line argument definitions using clap.

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::Parser;
use nsone_core::TimeUnit;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Fetch NS1 account activity and print, export or mail it
///
/// Records are requested for the window of `--amount` `--unit`s ending now.
/// Settings not given on the command line are read from the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "nsone-reports")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Unit for the time window [default: hours]
    #[arg(
        long,
        value_parser = PossibleValuesParser::new(TimeUnit::NAMES)
            .try_map(|s| s.parse::<TimeUnit>())
    )]
    pub unit: Option<TimeUnit>,

    /// Number of units in the time window [default: 1]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub amount: Option<u64>,

    /// Maximum number of records to return [default: 20]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Path to config file [default: ~/.nsone_reports.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// NS1 API key (overrides the config file)
    #[arg(short = 'k', long, env = "NSONE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// NS1 API base URL
    #[arg(long, env = "NSONE_API_URL", hide = true)]
    pub api_url: Option<String>,

    /// Don't print the report to stdout
    #[arg(short, long)]
    pub silent: bool,

    /// Export the report in the same format as the NS1 GUI
    #[arg(short, long)]
    pub export: bool,

    /// Format of the generated report [default: json]
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the export to this file
    #[arg(short, long, requires = "export")]
    pub output: Option<PathBuf>,

    /// Sender address
    #[arg(long)]
    pub mailfrom: Option<String>,

    /// Recipient addresses separated by comma; bare `--mailto` uses the config file's list
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub mailto: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
