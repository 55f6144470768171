//! Deterministic test doubles for [`PageSource`] consumers.
//!
//! [`ScriptedPageSource`] answers requests from an in-memory script keyed by
//! URL and records every URL it was asked for, so tests can assert on the
//! exact request sequence without a running server.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{Feature, PageSource, TransportError};

#[derive(Debug, Clone)]
enum ScriptedResponse {
    Body(Vec<u8>),
    Error(TransportError),
}

/// Stub [`PageSource`] returning pre-configured responses.
///
/// URLs without a scripted response yield the fallback response when one is
/// set, and an HTTP 404 [`TransportError`] otherwise.
///
/// # Example
///
/// ```
/// use hazard_core::test_support::{ScriptedPageSource, sample_features};
///
/// let source = ScriptedPageSource::new()
///     .with_features("http://api.test/collections/points/items?offset=0", sample_features(0, 2));
/// assert!(source.requested_urls().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ScriptedPageSource {
    responses: HashMap<String, ScriptedResponse>,
    fallback: Option<ScriptedResponse>,
    requests: RefCell<Vec<String>>,
}

impl ScriptedPageSource {
    /// Create a source with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with the given raw body.
    #[must_use]
    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .insert(url.into(), ScriptedResponse::Body(body.into()));
        self
    }

    /// Answer `url` with a JSON document.
    #[must_use]
    pub fn with_json(self, url: impl Into<String>, document: &Value) -> Self {
        self.with_body(url, document.to_string())
    }

    /// Answer `url` with a page holding `features` and no links.
    #[must_use]
    pub fn with_features(self, url: impl Into<String>, features: Vec<Feature>) -> Self {
        self.with_json(url, &page_document(&features, None))
    }

    /// Answer `url` with a page holding `features` and a `next` link.
    #[must_use]
    pub fn with_linked_features(
        self,
        url: impl Into<String>,
        features: Vec<Feature>,
        next: &str,
    ) -> Self {
        self.with_json(url, &page_document(&features, Some(next)))
    }

    /// Fail requests for `url` with `error`.
    #[must_use]
    pub fn with_error(mut self, url: impl Into<String>, error: TransportError) -> Self {
        self.responses
            .insert(url.into(), ScriptedResponse::Error(error));
        self
    }

    /// Answer every unscripted URL with a page holding `features`.
    #[must_use]
    pub fn with_fallback_features(mut self, features: Vec<Feature>) -> Self {
        let body = page_document(&features, None).to_string().into_bytes();
        self.fallback = Some(ScriptedResponse::Body(body));
        self
    }

    /// Every URL requested so far, in request order.
    #[must_use]
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl PageSource for ScriptedPageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.requests.borrow_mut().push(url.to_owned());
        match self.responses.get(url).or(self.fallback.as_ref()) {
            Some(ScriptedResponse::Body(body)) => Ok(body.clone()),
            Some(ScriptedResponse::Error(error)) => Err(error.clone()),
            None => Err(TransportError::Http {
                url: url.to_owned(),
                status: 404,
                message: "no scripted response".to_owned(),
            }),
        }
    }
}

/// Build a page document in the shape served by the feature API.
#[must_use]
pub fn page_document(features: &[Feature], next: Option<&str>) -> Value {
    let mut links = vec![json!({"rel": "self", "href": "about:self"})];
    if let Some(href) = next {
        links.push(json!({"rel": "next", "href": href}));
    }
    json!({
        "type": "FeatureCollection",
        "features": features,
        "links": links,
    })
}

/// Generate `count` Point features with sequential ids starting at `first_id`.
///
/// Each feature carries `id`, `Longitude` and `Latitude` properties matching
/// its geometry, inside the Norway bounding box.
#[must_use]
pub fn sample_features(first_id: u64, count: usize) -> Vec<Feature> {
    (first_id..)
        .take(count)
        .map(|id| {
            let lon = 5.0 + f64::from(u32::try_from(id % 20).unwrap_or(0));
            let lat = 58.0 + f64::from(u32::try_from(id % 10).unwrap_or(0));
            Feature::new(json!({
                "type": "Feature",
                "id": id,
                "geometry": {"type": "Point", "coordinates": [lon, lat]},
                "properties": {"id": id, "Longitude": lon, "Latitude": lat},
            }))
        })
        .collect()
}

/// Offset-style URL for `collection` at `offset` under `base_url`.
#[must_use]
pub fn offset_url(base_url: &str, collection: &str, offset: u64) -> String {
    format!("{base_url}/collections/{collection}/items?offset={offset}")
}

/// Script an offset-style listing with pages of the given sizes.
///
/// Pages are placed at offsets `0, 1000, 2000, ...`; the offset after the
/// last page answers with an empty page.
#[must_use]
pub fn offset_listing(base_url: &str, collection: &str, page_sizes: &[usize]) -> ScriptedPageSource {
    let mut source = ScriptedPageSource::new();
    let mut next_id = 0_u64;
    let mut offset = 0_u64;
    for &size in page_sizes {
        source = source.with_features(
            offset_url(base_url, collection, offset),
            sample_features(next_id, size),
        );
        next_id = next_id.saturating_add(u64::try_from(size).unwrap_or(u64::MAX));
        offset += crate::fetch::OFFSET_STRIDE;
    }
    source.with_features(offset_url(base_url, collection, offset), Vec::new())
}
