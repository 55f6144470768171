//! Property tests for the offset pagination loop.

use hazard_core::test_support::{offset_listing, offset_url};
use hazard_core::{FetchRequest, PageFetchStrategy, fetch_all};
use proptest::prelude::*;

const BASE: &str = "http://api.test";

fn listing() -> impl Strategy<Value = Vec<usize>> {
    // Full pages followed by a final page of any size below the stride.
    (prop::collection::vec(Just(1000_usize), 0..4), 0_usize..1000).prop_map(|(mut pages, last)| {
        pages.push(last);
        pages
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn collection_is_the_concatenation_of_pages(pages in listing()) {
        let source = offset_listing(BASE, "points", &pages);
        let request = FetchRequest::new(BASE, "points", PageFetchStrategy::OffsetIncrement)
            .expect("request should validate");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("failed to build Tokio runtime");

        let outcome = runtime
            .block_on(fetch_all(&source, &request))
            .expect("fetch should succeed");

        let total: usize = pages.iter().sum();
        prop_assert_eq!(outcome.collection.len(), total);
        prop_assert!(outcome.warning.is_none());

        let ids: Vec<u64> = outcome
            .collection
            .iter()
            .filter_map(|feature| feature.id().and_then(serde_json::Value::as_u64))
            .collect();
        let expected: Vec<u64> = (0..).take(total).collect();
        prop_assert_eq!(ids, expected);

        // Each request targets the next multiple of the stride.
        for (index, url) in source.requested_urls().iter().enumerate() {
            let offset = u64::try_from(index).expect("index fits") * 1000;
            prop_assert_eq!(url, &offset_url(BASE, "points", offset));
        }
    }
}
