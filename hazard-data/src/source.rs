//! `reqwest`-backed [`PageSource`].

use std::time::Duration;

use async_trait::async_trait;
use hazard_core::{PageSource, TransportError};
use log::debug;
use reqwest::Client;
use thiserror::Error;

/// Default user agent for API requests.
pub const DEFAULT_USER_AGENT: &str = "hazard-atlas/0.1";

/// Default connect and request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while constructing an HTTP client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The API base URL is not an absolute `http`/`https` URL.
    #[error("invalid API base URL `{url}`: {message}")]
    InvalidBaseUrl {
        /// URL as given.
        url: String,
        /// Why it was rejected.
        message: String,
    },
}

/// Transport settings for [`HttpPageSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpPageSourceConfig {
    /// Connect and whole-request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for HttpPageSourceConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpPageSourceConfig {
    /// Configuration with default timeout and user agent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Fetches pages with a shared `reqwest` client.
///
/// Non-success statuses are reported as [`TransportError::Http`] and the
/// error body is discarded.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    config: HttpPageSourceConfig,
}

impl HttpPageSource {
    /// Build a source with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::HttpClient`] when the TLS backend cannot
    /// be initialised.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(HttpPageSourceConfig::default())
    }

    /// Build a source with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::HttpClient`] when the client fails to build.
    pub fn with_config(config: HttpPageSourceConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        Ok(Self { client, config })
    }

    /// Active transport settings.
    #[must_use]
    pub const fn config(&self) -> &HttpPageSourceConfig {
        &self.config
    }
}

#[async_trait(?Send)]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, url))?;
        let body = response
            .bytes()
            .await
            .map_err(|err| convert_reqwest_error(&err, url))?;
        debug!("received {} bytes from {url}", body.len());
        Ok(body.to_vec())
    }
}

fn convert_reqwest_error(error: &reqwest::Error, url: &str) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout {
            url: url.to_owned(),
        };
    }
    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .map_or_else(|| error.to_string(), str::to_owned),
        };
    }
    TransportError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}
