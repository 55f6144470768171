//! Request styles, limits and the validated fetch request.

use crate::source::trim_base_url;

use super::FetchError;

/// Amount the offset advances after each non-empty page.
pub const OFFSET_STRIDE: u64 = 1000;

/// Pages with fewer features than this end an offset-style fetch.
pub const SHORT_PAGE_THRESHOLD: usize = 10;

/// Hard ceiling on the number of page requests per fetch.
pub const MAX_REQUESTS: u32 = 1000;

/// Page size hint used when callers do not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 2000;

/// How successive pages are addressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageFetchStrategy {
    /// Request `?offset={n}` and advance `n` by a fixed stride.
    ///
    /// No `limit` parameter is sent; the server's default page size applies.
    #[default]
    OffsetIncrement,
    /// Request `?f=json&limit={page_size}` and follow `rel = "next"` links.
    LinkFollowing {
        /// Advisory number of items per page.
        page_size: u32,
    },
}

impl PageFetchStrategy {
    /// Link-following strategy with the given page size hint.
    #[must_use]
    pub const fn link_following(page_size: u32) -> Self {
        Self::LinkFollowing { page_size }
    }
}

/// Termination parameters for a fetch.
///
/// The defaults match the public feature API: a stride of 1000, a
/// short-page threshold of 10 and at most 1000 requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    /// Offset increment applied after each non-empty page.
    pub offset_stride: u64,
    /// Offset-style pages below this size end the fetch.
    pub short_page_threshold: usize,
    /// Maximum number of requests before the fetch is truncated.
    pub max_requests: u32,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            offset_stride: OFFSET_STRIDE,
            short_page_threshold: SHORT_PAGE_THRESHOLD,
            max_requests: MAX_REQUESTS,
        }
    }
}

impl FetchLimits {
    /// Override the request ceiling.
    #[must_use]
    pub const fn with_max_requests(mut self, max_requests: u32) -> Self {
        self.max_requests = max_requests;
        self
    }

    /// Override the offset stride.
    #[must_use]
    pub const fn with_offset_stride(mut self, offset_stride: u64) -> Self {
        self.offset_stride = offset_stride;
        self
    }

    /// Override the short-page threshold.
    #[must_use]
    pub const fn with_short_page_threshold(mut self, threshold: usize) -> Self {
        self.short_page_threshold = threshold;
        self
    }
}

/// A validated description of one fetch.
///
/// # Examples
/// ```
/// use hazard_core::{FetchRequest, PageFetchStrategy};
///
/// let request = FetchRequest::new(
///     "http://localhost:5000/",
///     "points",
///     PageFetchStrategy::OffsetIncrement,
/// )?;
/// assert_eq!(
///     request.offset_url(2000),
///     "http://localhost:5000/collections/points/items?offset=2000"
/// );
/// # Ok::<(), hazard_core::FetchError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    base_url: String,
    collection_id: String,
    strategy: PageFetchStrategy,
    limits: FetchLimits,
}

impl FetchRequest {
    /// Validate and construct a request with default limits.
    ///
    /// Trailing slashes are trimmed from `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingBaseUrl`] or
    /// [`FetchError::MissingCollectionId`] when either is blank.
    pub fn new(
        base_url: impl Into<String>,
        collection_id: impl Into<String>,
        strategy: PageFetchStrategy,
    ) -> Result<Self, FetchError> {
        let raw_base = base_url.into();
        let trimmed = trim_base_url(raw_base.trim());
        if trimmed.is_empty() {
            return Err(FetchError::MissingBaseUrl);
        }
        let collection = collection_id.into();
        let collection_id = collection.trim();
        if collection_id.is_empty() {
            return Err(FetchError::MissingCollectionId);
        }
        Ok(Self {
            base_url: trimmed.to_owned(),
            collection_id: collection_id.to_owned(),
            strategy,
            limits: FetchLimits::default(),
        })
    }

    /// Replace the termination limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: FetchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Normalised base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Collection being listed.
    #[must_use]
    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    /// Selected request style.
    #[must_use]
    pub const fn strategy(&self) -> PageFetchStrategy {
        self.strategy
    }

    /// Termination limits.
    #[must_use]
    pub const fn limits(&self) -> FetchLimits {
        self.limits
    }

    /// URL of the offset-style page starting at `offset`.
    #[must_use]
    pub fn offset_url(&self, offset: u64) -> String {
        format!("{}?offset={offset}", self.items_url())
    }

    /// URL of the first link-following page.
    #[must_use]
    pub fn first_page_url(&self, page_size: u32) -> String {
        format!("{}?f=json&limit={page_size}", self.items_url())
    }

    fn items_url(&self) -> String {
        format!("{}/collections/{}/items", self.base_url, self.collection_id)
    }
}
