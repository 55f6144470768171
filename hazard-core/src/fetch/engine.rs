//! The sequential page loop.

use log::{debug, info, warn};

use crate::source::PageSource;
use crate::FeatureCollection;

use super::{FetchError, FetchRequest, FetchWarning, ItemsPage, PageFetchStrategy};

/// Result of a completed fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// All fetched features, in request order then server order.
    pub collection: FeatureCollection,
    /// Number of page requests issued.
    pub requests: u32,
    /// Set when the fetch was truncated by the request ceiling.
    pub warning: Option<FetchWarning>,
}

impl FetchOutcome {
    /// Whether the fetch ended on a natural end-of-data signal.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.warning.is_none()
    }
}

/// Per-call pagination state. Owned by one fetch and dropped with it.
#[derive(Debug)]
struct PageCursor {
    offset: u64,
    requests: u32,
    more_expected: bool,
    collection: FeatureCollection,
}

impl PageCursor {
    fn new() -> Self {
        Self {
            offset: 0,
            requests: 0,
            more_expected: true,
            collection: FeatureCollection::default(),
        }
    }

    fn finish(self, max_requests: u32) -> FetchOutcome {
        let warning = self
            .more_expected
            .then_some(FetchWarning::SafetyLimitReached { max_requests });
        if let Some(warning) = warning {
            warn!("{warning}");
        }
        info!(
            "collected {} features in {} requests",
            self.collection.len(),
            self.requests
        );
        FetchOutcome {
            collection: self.collection,
            requests: self.requests,
            warning,
        }
    }
}

/// Fetch every page of a collection and concatenate the features.
///
/// # Errors
///
/// Returns [`FetchError::Transport`] when any page request fails and
/// [`FetchError::Parse`] when any page body is not a valid listing. Both
/// abort the fetch and discard accumulated features.
pub async fn fetch_all<S: PageSource + ?Sized>(
    source: &S,
    request: &FetchRequest,
) -> Result<FetchOutcome, FetchError> {
    match request.strategy() {
        PageFetchStrategy::OffsetIncrement => fetch_by_offset(source, request).await,
        PageFetchStrategy::LinkFollowing { page_size } => {
            fetch_by_links(source, request, page_size).await
        }
    }
}

async fn fetch_by_offset<S: PageSource + ?Sized>(
    source: &S,
    request: &FetchRequest,
) -> Result<FetchOutcome, FetchError> {
    let limits = request.limits();
    let mut cursor = PageCursor::new();

    while cursor.more_expected && cursor.requests < limits.max_requests {
        cursor.requests += 1;
        let url = request.offset_url(cursor.offset);
        let page = fetch_page(source, &url).await?;
        let count = page.features.len();
        debug!("page at offset {} contains {count} features", cursor.offset);

        if count == 0 {
            cursor.more_expected = false;
        } else {
            cursor.collection.extend(page.features);
            cursor.offset = cursor.offset.saturating_add(limits.offset_stride);
        }

        // A short page is taken as the last one even if the server holds more.
        if count < limits.short_page_threshold {
            debug!("short page of {count} features; treating as end of data");
            cursor.more_expected = false;
        }
    }

    Ok(cursor.finish(limits.max_requests))
}

async fn fetch_by_links<S: PageSource + ?Sized>(
    source: &S,
    request: &FetchRequest,
    page_size: u32,
) -> Result<FetchOutcome, FetchError> {
    let limits = request.limits();
    let mut cursor = PageCursor::new();
    let mut next_url = Some(request.first_page_url(page_size));

    while let Some(url) = next_url.take() {
        if cursor.requests >= limits.max_requests {
            break;
        }
        cursor.requests += 1;
        let page = fetch_page(source, &url).await?;
        debug!("page {url} contains {} features", page.features.len());
        next_url = page.next_href().map(str::to_owned);
        cursor.more_expected = next_url.is_some();
        cursor.collection.extend(page.features);
    }

    Ok(cursor.finish(limits.max_requests))
}

async fn fetch_page<S: PageSource + ?Sized>(
    source: &S,
    url: &str,
) -> Result<ItemsPage, FetchError> {
    info!("fetching {url}");
    let body = source.fetch(url).await?;
    ItemsPage::from_slice(&body).map_err(|err| FetchError::Parse {
        url: url.to_owned(),
        message: err.to_string(),
    })
}
