use super::*;
use crate::test_support::{
    ScriptedPageSource, offset_listing, offset_url, sample_features,
};
use crate::{Feature, TransportError};
use rstest::{fixture, rstest};
use serde_json::json;

const BASE: &str = "http://api.test";

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build Tokio runtime")
        .block_on(future)
}

fn ids(features: &[Feature]) -> Vec<u64> {
    features
        .iter()
        .map(|feature| {
            feature
                .id()
                .and_then(serde_json::Value::as_u64)
                .expect("sample features carry numeric ids")
        })
        .collect()
}

#[fixture]
fn offset_request() -> FetchRequest {
    FetchRequest::new(BASE, "points", PageFetchStrategy::OffsetIncrement)
        .expect("request should validate")
}

#[fixture]
fn link_request() -> FetchRequest {
    FetchRequest::new(BASE, "points", PageFetchStrategy::link_following(500))
        .expect("request should validate")
}

#[rstest]
fn offset_pages_are_concatenated_in_order(offset_request: FetchRequest) {
    let source = offset_listing(BASE, "points", &[1000, 1000, 3]);

    let outcome = block_on(fetch_all(&source, &offset_request)).expect("fetch should succeed");

    assert_eq!(outcome.collection.len(), 2003);
    assert_eq!(outcome.requests, 3);
    assert!(outcome.is_complete());
    assert_eq!(
        source.requested_urls(),
        vec![
            offset_url(BASE, "points", 0),
            offset_url(BASE, "points", 1000),
            offset_url(BASE, "points", 2000),
        ]
    );
    let expected: Vec<u64> = (0..2003).collect();
    assert_eq!(ids(outcome.collection.features()), expected);
}

#[rstest]
fn full_pages_end_with_an_empty_request(offset_request: FetchRequest) {
    let source = offset_listing(BASE, "points", &[1000, 1000]);

    let outcome = block_on(fetch_all(&source, &offset_request)).expect("fetch should succeed");

    assert_eq!(outcome.collection.len(), 2000);
    assert_eq!(outcome.requests, 3);
    assert_eq!(
        source.requested_urls().last().map(String::as_str),
        Some(offset_url(BASE, "points", 2000).as_str())
    );
}

#[rstest]
fn partial_last_page_costs_one_trailing_request(offset_request: FetchRequest) {
    // A final page of 10..=999 features is not recognised as short, so one
    // more request is made and answers empty.
    let source = offset_listing(BASE, "points", &[1000, 250]);

    let outcome = block_on(fetch_all(&source, &offset_request)).expect("fetch should succeed");

    assert_eq!(outcome.collection.len(), 1250);
    assert_eq!(outcome.requests, 3);
}

#[rstest]
fn short_page_stops_even_when_more_exist(offset_request: FetchRequest) {
    let source = offset_listing(BASE, "points", &[1000, 9, 1000]);

    let outcome = block_on(fetch_all(&source, &offset_request)).expect("fetch should succeed");

    assert_eq!(outcome.collection.len(), 1009);
    assert_eq!(outcome.requests, 2);
}

#[rstest]
fn empty_first_page_yields_empty_collection(offset_request: FetchRequest) {
    let source = offset_listing(BASE, "points", &[]);

    let outcome = block_on(fetch_all(&source, &offset_request)).expect("fetch should succeed");

    assert!(outcome.collection.is_empty());
    assert_eq!(outcome.requests, 1);
    assert!(outcome.is_complete());
}

#[rstest]
fn missing_features_member_reads_as_empty(offset_request: FetchRequest) {
    let source = ScriptedPageSource::new()
        .with_json(offset_url(BASE, "points", 0), &json!({"type": "FeatureCollection"}));

    let outcome = block_on(fetch_all(&source, &offset_request)).expect("fetch should succeed");

    assert!(outcome.collection.is_empty());
    assert_eq!(outcome.requests, 1);
}

#[rstest]
fn safety_limit_returns_partial_data_with_warning(offset_request: FetchRequest) {
    let source = ScriptedPageSource::new().with_fallback_features(sample_features(0, 10));

    let outcome = block_on(fetch_all(&source, &offset_request)).expect("fetch should succeed");

    assert_eq!(outcome.requests, MAX_REQUESTS);
    assert_eq!(outcome.collection.len(), 10 * 1000);
    assert_eq!(
        outcome.warning,
        Some(FetchWarning::SafetyLimitReached {
            max_requests: MAX_REQUESTS
        })
    );
    assert_eq!(
        source.requested_urls().last().map(String::as_str),
        Some(offset_url(BASE, "points", 999_000).as_str())
    );
}

#[rstest]
fn custom_request_ceiling_is_honoured(offset_request: FetchRequest) {
    let request = offset_request.with_limits(FetchLimits::default().with_max_requests(4));
    let source = ScriptedPageSource::new().with_fallback_features(sample_features(0, 10));

    let outcome = block_on(fetch_all(&source, &request)).expect("fetch should succeed");

    assert_eq!(outcome.requests, 4);
    assert_eq!(outcome.collection.len(), 40);
    assert!(!outcome.is_complete());
}

#[rstest]
fn short_final_page_at_the_ceiling_is_not_a_warning(offset_request: FetchRequest) {
    let request = offset_request.with_limits(FetchLimits::default().with_max_requests(2));
    let source = offset_listing(BASE, "points", &[1000, 3]);

    let outcome = block_on(fetch_all(&source, &request)).expect("fetch should succeed");

    assert_eq!(outcome.requests, 2);
    assert!(outcome.is_complete());
}

#[rstest]
fn page_failure_aborts_without_partial_data(offset_request: FetchRequest) {
    let failure = TransportError::Http {
        url: offset_url(BASE, "points", 1000),
        status: 500,
        message: "Internal Server Error".to_owned(),
    };
    let source = ScriptedPageSource::new()
        .with_features(offset_url(BASE, "points", 0), sample_features(0, 1000))
        .with_error(offset_url(BASE, "points", 1000), failure.clone());

    let err = block_on(fetch_all(&source, &offset_request)).expect_err("fetch should fail");

    assert_eq!(err, FetchError::Transport { source: failure });
    assert_eq!(source.requested_urls().len(), 2);
}

#[rstest]
fn invalid_body_is_a_parse_error(offset_request: FetchRequest) {
    let source = ScriptedPageSource::new().with_body(offset_url(BASE, "points", 0), "<html>");

    let err = block_on(fetch_all(&source, &offset_request)).expect_err("fetch should fail");

    match err {
        FetchError::Parse { url, .. } => assert_eq!(url, offset_url(BASE, "points", 0)),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[rstest]
fn links_are_followed_verbatim(link_request: FetchRequest) {
    let first = "http://api.test/collections/points/items?f=json&limit=500";
    let second = "http://mirror.test/items?cursor=abc";
    let source = ScriptedPageSource::new()
        .with_linked_features(first, sample_features(0, 500), second)
        .with_features(second, sample_features(500, 2));

    let outcome = block_on(fetch_all(&source, &link_request)).expect("fetch should succeed");

    assert_eq!(source.requested_urls(), vec![first.to_owned(), second.to_owned()]);
    assert_eq!(outcome.collection.len(), 502);
    assert_eq!(outcome.requests, 2);
    assert!(outcome.is_complete());
}

#[rstest]
fn link_style_ignores_short_pages(link_request: FetchRequest) {
    let first = "http://api.test/collections/points/items?f=json&limit=500";
    let second = "http://api.test/collections/points/items?f=json&limit=500&offset=500";
    let third = "http://api.test/collections/points/items?f=json&limit=500&offset=1000";
    let source = ScriptedPageSource::new()
        .with_linked_features(first, sample_features(0, 3), second)
        .with_linked_features(second, Vec::new(), third)
        .with_features(third, sample_features(3, 4));

    let outcome = block_on(fetch_all(&source, &link_request)).expect("fetch should succeed");

    assert_eq!(outcome.requests, 3);
    assert_eq!(ids(outcome.collection.features()), vec![0, 1, 2, 3, 4, 5, 6]);
}

fn linked_listing() -> ScriptedPageSource {
    let first = "http://api.test/collections/points/items?f=json&limit=500";
    let second = "http://api.test/collections/points/items?f=json&limit=500&offset=500";
    ScriptedPageSource::new()
        .with_linked_features(first, sample_features(0, 500), second)
        .with_features(second, sample_features(500, 7))
}

fn fetch_bytes(source: &ScriptedPageSource, request: &FetchRequest) -> Vec<u8> {
    let outcome = block_on(fetch_all(source, request)).expect("fetch should succeed");
    serde_json::to_vec(&outcome.collection).expect("collection should serialise")
}

#[rstest]
fn repeated_offset_fetches_are_byte_identical(offset_request: FetchRequest) {
    let first = offset_listing(BASE, "points", &[1000, 1000, 3]);
    let second = offset_listing(BASE, "points", &[1000, 1000, 3]);

    let first_bytes = fetch_bytes(&first, &offset_request);
    let second_bytes = fetch_bytes(&second, &offset_request);

    assert!(!first_bytes.is_empty());
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(first.requested_urls(), second.requested_urls());
}

#[rstest]
fn repeated_link_fetches_are_byte_identical(link_request: FetchRequest) {
    let first = linked_listing();
    let second = linked_listing();

    let first_bytes = fetch_bytes(&first, &link_request);
    let second_bytes = fetch_bytes(&second, &link_request);

    assert_eq!(first_bytes, second_bytes);
    assert_eq!(first.requested_urls(), second.requested_urls());
    assert_eq!(first.requested_urls().len(), 2);
}

#[rstest]
fn link_cycle_is_cut_by_the_ceiling(link_request: FetchRequest) {
    let first = "http://api.test/collections/points/items?f=json&limit=500";
    let request = link_request.with_limits(FetchLimits::default().with_max_requests(3));
    let source = ScriptedPageSource::new().with_linked_features(first, sample_features(0, 1), first);

    let outcome = block_on(fetch_all(&source, &request)).expect("fetch should succeed");

    assert_eq!(outcome.requests, 3);
    assert_eq!(outcome.collection.len(), 3);
    assert_eq!(
        outcome.warning,
        Some(FetchWarning::SafetyLimitReached { max_requests: 3 })
    );
}

#[rstest]
fn link_style_parse_failure_aborts(link_request: FetchRequest) {
    let first = "http://api.test/collections/points/items?f=json&limit=500";
    let source = ScriptedPageSource::new().with_body(first, "[1, 2, 3]");

    let err = block_on(fetch_all(&source, &link_request)).expect_err("fetch should fail");

    assert!(matches!(err, FetchError::Parse { .. }));
}

#[rstest]
#[case("", "points", FetchError::MissingBaseUrl)]
#[case("///", "points", FetchError::MissingBaseUrl)]
#[case("http://api.test", "  ", FetchError::MissingCollectionId)]
fn blank_inputs_are_rejected(
    #[case] base: &str,
    #[case] collection: &str,
    #[case] expected: FetchError,
) {
    let err = FetchRequest::new(base, collection, PageFetchStrategy::OffsetIncrement)
        .expect_err("request should be rejected");
    assert_eq!(err, expected);
}

#[rstest]
fn first_page_url_carries_format_and_limit() {
    let request = FetchRequest::new("http://api.test/", "hazardglobal", PageFetchStrategy::default())
        .expect("request should validate");
    assert_eq!(
        request.first_page_url(2000),
        "http://api.test/collections/hazardglobal/items?f=json&limit=2000"
    );
}

#[rstest]
fn next_href_skips_links_without_targets() {
    let page = ItemsPage::from_slice(
        br#"{"links": [{"rel": "next"}, {"rel": "next", "href": "http://x/2"}], "features": null}"#,
    )
    .expect("page should parse");
    assert!(page.features.is_empty());
    assert_eq!(page.next_href(), Some("http://x/2"));
}
