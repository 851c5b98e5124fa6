//! # nsone-reports
//!
//! Reports NS1 account activity for a recent time window.
//!
//! ## Features
//!
//! - **Console reports**: JSON, XML, CSV, HTML, YAML summaries or a table
//! - **Exports**: server-rendered files saved to disk or mailed as attachments
//! - **Mail delivery**: SMTP over TLS, STARTTLS or plain
//! - **Config file**: API key, defaults and SMTP settings in TOML

pub mod cli;
pub mod config;
pub mod delivery;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::run;
pub use error::{ReportError, Result};
