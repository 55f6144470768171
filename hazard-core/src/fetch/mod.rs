//! Accumulate paginated item listings into a single feature collection.
//!
//! Two request styles are supported behind [`PageFetchStrategy`]:
//!
//! - **Offset increment**: `GET {base}/collections/{id}/items?offset={n}`,
//!   advancing `n` by a fixed stride after every non-empty page and stopping
//!   on an empty page, a short page, or the request ceiling.
//! - **Link following**: `GET {base}/collections/{id}/items?f=json&limit={n}`,
//!   then following each page's `rel = "next"` link until none remains.
//!
//! Pages are fetched strictly one after another. Any transport or parse
//! failure aborts the whole fetch; reaching the request ceiling returns the
//! accumulated features together with [`FetchWarning::SafetyLimitReached`].
//!
//! # Example
//!
//! ```
//! use hazard_core::test_support::{ScriptedPageSource, sample_features};
//! use hazard_core::{FetchRequest, PageFetchStrategy, fetch_all};
//!
//! let source = ScriptedPageSource::new()
//!     .with_features("http://api.test/collections/points/items?offset=0", sample_features(0, 3));
//! let request = FetchRequest::new("http://api.test/", "points", PageFetchStrategy::OffsetIncrement)?;
//! let runtime = tokio::runtime::Builder::new_current_thread().build()?;
//! let outcome = runtime.block_on(fetch_all(&source, &request))?;
//! assert_eq!(outcome.collection.len(), 3);
//! assert!(outcome.warning.is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod engine;
mod error;
mod page;
mod strategy;

pub use engine::{FetchOutcome, fetch_all};
pub use error::{FetchError, FetchWarning};
pub use page::{ItemsPage, PageLink};
pub use strategy::{
    DEFAULT_PAGE_SIZE, FetchLimits, FetchRequest, MAX_REQUESTS, OFFSET_STRIDE, PageFetchStrategy,
    SHORT_PAGE_THRESHOLD,
};

#[cfg(test)]
mod tests;
