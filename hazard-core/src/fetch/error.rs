//! Failure and warning types for paginated fetches.

use thiserror::Error;

use crate::TransportError;

/// Errors that abort a paginated fetch.
///
/// No partial data accompanies an error; callers decide whether to retry
/// the whole operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The API base URL was blank.
    #[error("API base URL must not be empty")]
    MissingBaseUrl,
    /// The collection identifier was blank.
    #[error("collection identifier must not be empty")]
    MissingCollectionId,
    /// A page request failed or returned a non-success status.
    #[error("failed to fetch page: {source}")]
    Transport {
        /// Underlying transport failure.
        #[from]
        source: TransportError,
    },
    /// A page body was not a valid item listing.
    #[error("failed to parse page from {url}: {message}")]
    Parse {
        /// URL whose body failed to parse.
        url: String,
        /// Decoder message.
        message: String,
    },
}

/// Non-fatal conditions reported alongside a successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FetchWarning {
    /// The request ceiling was hit while more pages were expected.
    ///
    /// The returned collection holds everything fetched so far and may be
    /// incomplete.
    #[error("reached the maximum of {max_requests} requests; some data may be missing")]
    SafetyLimitReached {
        /// Ceiling that was reached.
        max_requests: u32,
    },
}
