//! Transport seam for retrieving item pages and probing endpoints.
//!
//! The core never performs network I/O itself. A [`PageSource`] resolves a
//! fully qualified URL to the response body, or a [`TransportError`] when
//! the request fails or the server answers with a non-success status.

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level errors encountered while issuing a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server answered with a non-success HTTP status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short description of the failure.
        message: String,
    },
    /// The transport gave up waiting for a response.
    #[error("request to {url} timed out")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
    },
    /// The request could not be sent or the body could not be read.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Description reported by the transport.
        message: String,
    },
}

impl TransportError {
    /// URL of the failed request.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Http { url, .. } | Self::Timeout { url } | Self::Network { url, .. } => url,
        }
    }

    /// HTTP status, when the server responded at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Timeout { .. } | Self::Network { .. } => None,
        }
    }
}

/// Resolve URLs to response bodies.
///
/// Implementations must return an error for non-success statuses rather
/// than handing the error body back as data.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use hazard_core::{PageSource, TransportError};
///
/// struct EmptyPages;
///
/// #[async_trait(?Send)]
/// impl PageSource for EmptyPages {
///     async fn fetch(&self, _url: &str) -> Result<Vec<u8>, TransportError> {
///         Ok(br#"{"type":"FeatureCollection","features":[]}"#.to_vec())
///     }
/// }
/// ```
#[async_trait(?Send)]
pub trait PageSource {
    /// Issue a GET request for `url` and return the body bytes.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// Strip trailing slashes from an API base URL before path concatenation.
///
/// # Examples
/// ```
/// use hazard_core::trim_base_url;
///
/// assert_eq!(trim_base_url("http://localhost:5000/"), "http://localhost:5000");
/// assert_eq!(trim_base_url("http://localhost:5000"), "http://localhost:5000");
/// ```
#[must_use]
pub fn trim_base_url(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}
