//! Main NS1 API client implementation.

use crate::api::ActivityApi;
use nsone_core::{Ns1Error, Result};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// The NS1 API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.nsone.net/v1";

/// Header carrying the API key
const API_KEY_HEADER: &str = "X-NSONE-Key";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Main NS1 API client
#[derive(Clone)]
pub struct Ns1Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for Ns1Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ns1Client")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl Ns1Client {
    /// Create a new client with the given API key using default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ns1ClientBuilder::new(api_key).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> Ns1ClientBuilder {
        Ns1ClientBuilder::new(api_key)
    }

    /// Access account activity endpoints
    #[must_use]
    pub fn activity(&self) -> ActivityApi<'_> {
        ActivityApi::new(self)
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Perform a GET request and decode the JSON body
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self.send_get(path, params).await?;
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;
        serde_json::from_str(&body).map_err(Ns1Error::Json)
    }

    /// Perform a GET request and return the raw body
    pub(crate) async fn get_bytes_with_query(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<u8>> {
        let response = self.send_get(path, params).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&e))?;
        Ok(bytes.to_vec())
    }

    async fn send_get(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response> {
        let url = self.build_url(path, params)?;
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.inner.api_key)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "response received");

        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::handle_error(status.as_u16(), response).await)
        }
    }

    /// Build a URL with query parameters
    fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let raw = format!("{}{}", self.inner.base_url.trim_end_matches('/'), path);
        let mut url = Url::parse(&raw).map_err(|e| Ns1Error::InvalidUrl(format!("{raw}: {e}")))?;

        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }

    fn transport_error(&self, err: &reqwest::Error) -> Ns1Error {
        if err.is_timeout() {
            Ns1Error::Timeout(self.inner.timeout.as_secs())
        } else if err.is_connect() {
            Ns1Error::Connection(err.to_string())
        } else {
            Ns1Error::Http(err.to_string())
        }
    }

    /// Convert an error response to an Ns1Error
    async fn handle_error(status: u16, response: reqwest::Response) -> Ns1Error {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let body = response.text().await.unwrap_or_default();

        // NS1 reports errors as {"message": "..."}
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(body);

        match status {
            401 => Ns1Error::Unauthorized { message },
            403 => Ns1Error::Forbidden { message },
            404 => Ns1Error::NotFound { resource: message },
            429 => {
                warn!("Rate limited by NS1 API");
                Ns1Error::RateLimited { retry_after }
            }
            _ => Ns1Error::Api {
                code: status,
                message,
            },
        }
    }
}

/// Builder for configuring an [`Ns1Client`]
pub struct Ns1ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl Ns1ClientBuilder {
    /// Create a new builder with the given API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("nsone-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<Ns1Client> {
        Url::parse(&self.base_url)
            .map_err(|e| Ns1Error::InvalidUrl(format!("{}: {e}", self.base_url)))?;

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| Ns1Error::Http(e.to_string()))?;

        Ok(Ns1Client {
            inner: Arc::new(ClientInner {
                http,
                api_key: self.api_key,
                base_url: self.base_url,
                timeout: self.timeout,
            }),
        })
    }
}
