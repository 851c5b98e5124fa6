use thiserror::Error;

/// Result type alias for NS1 operations
pub type Result<T> = std::result::Result<T, Ns1Error>;

/// Errors that can occur when talking to the NS1 API
#[derive(Error, Debug)]
pub enum Ns1Error {
    /// Authentication failed - invalid or missing API key
    #[error("authentication failed: {message}")]
    Unauthorized {
        /// Message returned by the API
        message: String,
    },

    /// The API key is valid but lacks the required permission
    #[error("permission denied: {message}")]
    Forbidden {
        /// Message returned by the API
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after: Option<u64>,
    },

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// API returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Unit/amount pair that does not describe a usable time window
    #[error("invalid time window: {0}")]
    InvalidWindow(String),

    /// Unknown time unit name
    #[error("unknown time unit: {0}")]
    InvalidUnit(String),

    /// Unknown export format name
    #[error("unknown export format: {0}")]
    InvalidFormat(String),
}

impl Ns1Error {
    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::Forbidden { .. })
    }

    /// Returns true if the request never got a response from the API
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout(_) | Self::Connection(_))
    }

    /// Returns true if the error comes from local input validation
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl(_)
                | Self::InvalidWindow(_)
                | Self::InvalidUnit(_)
                | Self::InvalidFormat(_)
        )
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
