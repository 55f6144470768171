//! Synchronous facade over [`HttpPageSource`].
//!
//! [`FeatureApiClient`] is bound to one API base URL and blocks on its own
//! Tokio runtime, so command-line tools and other synchronous callers can
//! fetch whole collections without managing an executor.

use hazard_core::{
    FetchError, FetchOutcome, FetchRequest, PageFetchStrategy, TransportError, fetch_all,
    probe_tiles,
};
use log::info;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use crate::source::{ClientBuildError, HttpPageSource, HttpPageSourceConfig};

/// Blocking client for one feature API server.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the client drives requests on its stored
/// current-thread runtime. Inside a multi-threaded runtime it reuses the
/// caller's handle through [`tokio::task::block_in_place`]. Calling it from
/// a `current_thread` runtime is not supported and panics.
///
/// # Example
///
/// ```no_run
/// use hazard_core::PageFetchStrategy;
/// use hazard_data::FeatureApiClient;
///
/// let client = FeatureApiClient::new("http://localhost:5000")?;
/// let outcome = client.fetch_collection("points", PageFetchStrategy::OffsetIncrement)?;
/// println!("{} features", outcome.collection.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct FeatureApiClient {
    base_url: String,
    source: HttpPageSource,
    runtime: Runtime,
}

impl std::fmt::Debug for FeatureApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureApiClient")
            .field("base_url", &self.base_url)
            .field("source", &self.source)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl FeatureApiClient {
    /// Create a client with default transport settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::InvalidBaseUrl`] unless `base_url` is an
    /// absolute `http` or `https` URL, or a build error for the HTTP client
    /// or runtime.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(base_url, HttpPageSourceConfig::default())
    }

    /// Create a client with explicit transport settings.
    ///
    /// # Errors
    ///
    /// See [`FeatureApiClient::new`].
    pub fn with_config(
        base_url: impl Into<String>,
        config: HttpPageSourceConfig,
    ) -> Result<Self, ClientBuildError> {
        let base_url = validate_base_url(base_url.into())?;
        let source = HttpPageSource::with_config(config)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            base_url,
            source,
            runtime,
        })
    }

    /// Normalised base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying page source, for async callers.
    #[must_use]
    pub const fn source(&self) -> &HttpPageSource {
        &self.source
    }

    /// Fetch every feature of `collection_id` with default limits.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingCollectionId`] for a blank id, and any
    /// transport or parse failure that aborted the fetch.
    pub fn fetch_collection(
        &self,
        collection_id: &str,
        strategy: PageFetchStrategy,
    ) -> Result<FetchOutcome, FetchError> {
        let request = FetchRequest::new(self.base_url.as_str(), collection_id, strategy)?;
        self.fetch(&request)
    }

    /// Run a prepared request against this client's transport.
    ///
    /// The request's own base URL is used, so one client can serve requests
    /// for other servers.
    ///
    /// # Errors
    ///
    /// Any transport or parse failure that aborted the fetch.
    pub fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome, FetchError> {
        info!(
            "fetching collection {} from {}",
            request.collection_id(),
            request.base_url()
        );
        self.block_on(fetch_all(&self.source, request))
    }

    /// Whether the server publishes vector tiles for `collection_id`.
    ///
    /// # Errors
    ///
    /// Timeouts and network failures; error statuses read as `Ok(false)`.
    pub fn tiles_available(&self, collection_id: &str) -> Result<bool, TransportError> {
        self.block_on(probe_tiles(&self.source, &self.base_url, collection_id))
    }

    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

fn validate_base_url(raw: String) -> Result<String, ClientBuildError> {
    let reject = |message: String| ClientBuildError::InvalidBaseUrl {
        url: raw.clone(),
        message,
    };
    let trimmed = hazard_core::trim_base_url(raw.trim());
    let parsed = Url::parse(trimmed).map_err(|err| reject(err.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_owned()),
        other => Err(reject(format!("unsupported scheme `{other}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:5000", "http://localhost:5000")]
    #[case("https://api.example.org/ogc/", "https://api.example.org/ogc")]
    #[case("  http://localhost:5000//  ", "http://localhost:5000")]
    fn base_url_is_normalised(#[case] raw: &str, #[case] expected: &str) {
        let client = FeatureApiClient::new(raw).expect("client should build");
        assert_eq!(client.base_url(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("localhost:5000")]
    #[case("ftp://files.example.org")]
    #[case("not a url")]
    fn invalid_base_urls_are_rejected(#[case] raw: &str) {
        let err = FeatureApiClient::new(raw).expect_err("client should be rejected");
        assert!(
            matches!(err, ClientBuildError::InvalidBaseUrl { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[rstest]
    fn blank_collection_is_rejected_before_any_request() {
        let client = FeatureApiClient::new("http://127.0.0.1:9").expect("client should build");
        let err = client
            .fetch_collection(" ", PageFetchStrategy::OffsetIncrement)
            .expect_err("fetch should fail");
        assert_eq!(err, FetchError::MissingCollectionId);
    }
}
