//! Error taxonomy of the report pipeline.

use nsone_core::Ns1Error;
use thiserror::Error;
use tracing::debug;

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Everything that can stop a report run, grouped by the stage that failed
#[derive(Error, Debug)]
pub enum ReportError {
    /// Missing or malformed configuration, or invalid option values
    #[error("configuration error: {0}")]
    Config(String),

    /// The API rejected the credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// The API could not be reached
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with a failure or an unreadable body
    #[error("API error: {0}")]
    Api(String),

    /// Records could not be rendered in the requested format
    #[error("format error: {0}")]
    Format(String),

    /// Writing the report or sending the mail failed
    #[error("delivery error: {0}")]
    Delivery(String),
}

impl ReportError {
    /// Process exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Auth(_) => 3,
            Self::Network(_) => 4,
            Self::Api(_) => 5,
            Self::Format(_) => 6,
            Self::Delivery(_) => 7,
        }
    }
}

impl From<Ns1Error> for ReportError {
    fn from(err: Ns1Error) -> Self {
        debug!(status = ?err.status_code(), "{err}");
        let message = err.to_string();
        if err.is_auth_error() {
            Self::Auth(message)
        } else if err.is_transport_error() {
            Self::Network(message)
        } else if err.is_input_error() {
            Self::Config(message)
        } else {
            Self::Api(message)
        }
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        Self::Format(err.to_string())
    }
}

impl From<serde_yaml::Error> for ReportError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Format(err.to_string())
    }
}

impl From<lettre::error::Error> for ReportError {
    fn from(err: lettre::error::Error) -> Self {
        Self::Delivery(err.to_string())
    }
}

impl From<lettre::address::AddressError> for ReportError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::Delivery(err.to_string())
    }
}
