//! Integration tests for the listing endpoint client.

use gpsync::error::Error;
use gpsync::model::{DateRange, MediaFilter, MediaKind};
use gpsync::remote::{MediaLibrary, SearchQuery};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_search_sends_filters_and_decodes_page() {
    let (server, client) = common::setup().await;

    Mock::given(method("GET"))
        .and(path("/media/search"))
        .and(header("accept", common::SEARCH_ACCEPT))
        .and(header("cookie", common::COOKIE))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "30"))
        .and(query_param("type", "Video,BurstVideo,TimeLapse,TimeLapseVideo,LoopedVideo"))
        .and(query_param("range", "2024-03-01,2024-03-31"))
        .and(query_param("processing_states", "rendering,pretranscoding,transcoding,ready"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_embedded": { "media": [
                common::item("a", "2024-03-01T10:00:00Z", 1024),
                common::item("b", "2024-03-02T11:30:00Z", 2048)
            ]},
            "_pages": { "current_page": 1, "per_page": 30, "total_items": 2, "total_pages": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = MediaFilter {
        range: Some(DateRange {
            start: "2024-03-01".parse().unwrap(),
            end: "2024-03-31".parse().unwrap(),
        }),
        kind: MediaKind::Videos,
    };
    let page = client
        .search(&SearchQuery::new(1, 30, filter))
        .await
        .expect("search should succeed");

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, "a");
    assert_eq!(page.items[1].file_size, Some(2048));
    assert_eq!(page.pages.total_pages, 1);
}

#[tokio::test]
async fn test_search_401_is_auth_rejected() {
    let (server, client) = common::setup().await;

    Mock::given(method("GET"))
        .and(path("/media/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("session expired"))
        .mount(&server)
        .await;

    let err = client
        .search(&SearchQuery::new(1, 30, MediaFilter::default()))
        .await
        .unwrap_err();

    match err {
        Error::AuthRejected { body } => assert_eq!(body, "session expired"),
        other => panic!("expected AuthRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_search_500_is_listing_failure() {
    let (server, client) = common::setup().await;

    Mock::given(method("GET"))
        .and(path("/media/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = client
        .search(&SearchQuery::new(1, 30, MediaFilter::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Listing { status: 500, .. }));
    assert!(err.to_string().contains("upstream down"));
}

#[tokio::test]
async fn test_search_garbage_body_is_malformed() {
    let (server, client) = common::setup().await;

    Mock::given(method("GET"))
        .and(path("/media/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client
        .search(&SearchQuery::new(1, 30, MediaFilter::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedListing(_)));
}

#[tokio::test]
async fn test_open_archive_non_200() {
    let (server, client) = common::setup().await;
    common::mount_archive_status(&server, "a,b", 404).await;

    let err = client
        .open_archive(&["a".to_string(), "b".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Archive { status: 404, .. }));
}
