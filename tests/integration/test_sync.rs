//! End-to-end sync runs against the mock endpoints.
//!
//! - Multi-page listing with a day split across pages
//! - Archive bytes land in `{day}_{n}_GoPro.zip`
//! - Rerun downloads nothing
//! - A failing archive only fails its own day
//! - Listing failures abort before any download

use std::collections::BTreeSet;

use gpsync::error::Error;
use gpsync::model::CaptureDay;
use gpsync::storage::{LedgerStore, SqliteLedger};
use gpsync::sync::{CohortStatus, NoProgress, SyncEngine, SyncOptions};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

fn day(s: &str) -> CaptureDay {
    s.parse().unwrap()
}

fn ids(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn options(dir: &TempDir) -> SyncOptions {
    let mut options = SyncOptions::new(dir.path().join("downloads"));
    options.per_page = 2;
    options.chunk_size = 3;
    options
}

#[tokio::test]
async fn test_two_page_sync_writes_one_archive_per_day() {
    let (server, client) = common::setup().await;
    let dir = TempDir::new().unwrap();

    common::mount_page(
        &server,
        1,
        2,
        serde_json::json!([
            common::item("a", "2024-03-01T10:00:00Z", 100),
            common::item("b", "2024-03-01T11:00:00Z", 100)
        ]),
    )
    .await;
    common::mount_page(
        &server,
        2,
        2,
        serde_json::json!([
            common::item("c", "2024-03-01T12:00:00Z", 100),
            common::item("d", "2024-03-02T09:00:00Z", 100)
        ]),
    )
    .await;
    common::mount_archive(&server, "a,b,c", b"PK\x03\x04day-one", 1).await;
    common::mount_archive(&server, "d", b"PK\x03\x04day-two", 1).await;

    let ledger = SqliteLedger::open(&dir.path().join("ledger.db")).unwrap();
    let report = SyncEngine::new(&client, &ledger, &NoProgress, options(&dir))
        .run()
        .await
        .expect("sync should succeed");

    assert_eq!(report.pages_read, 2);
    assert_eq!(report.fetched(), 2);
    assert!(report.is_clean());

    let downloads = dir.path().join("downloads");
    assert_eq!(
        std::fs::read(downloads.join("2024-03-01_1_GoPro.zip")).unwrap(),
        b"PK\x03\x04day-one"
    );
    assert_eq!(
        std::fs::read(downloads.join("2024-03-02_1_GoPro.zip")).unwrap(),
        b"PK\x03\x04day-two"
    );
    assert_eq!(ledger.get(day("2024-03-01")), ids(&["a", "b", "c"]));
    assert_eq!(ledger.get(day("2024-03-02")), ids(&["d"]));
}

#[tokio::test]
async fn test_rerun_downloads_nothing() {
    let (server, client) = common::setup().await;
    let dir = TempDir::new().unwrap();

    common::mount_page(
        &server,
        1,
        1,
        serde_json::json!([common::item("a", "2024-03-01T10:00:00Z", 10)]),
    )
    .await;
    // Verified on drop: exactly one archive request across both runs.
    common::mount_archive(&server, "a", b"zip", 1).await;

    let ledger_path = dir.path().join("ledger.db");
    {
        let ledger = SqliteLedger::open(&ledger_path).unwrap();
        SyncEngine::new(&client, &ledger, &NoProgress, options(&dir))
            .run()
            .await
            .unwrap();
    }

    let ledger = SqliteLedger::open(&ledger_path).unwrap();
    let report = SyncEngine::new(&client, &ledger, &NoProgress, options(&dir))
        .run()
        .await
        .unwrap();

    assert_eq!(report.skipped(), 1);
    assert_eq!(report.fetched(), 0);
    assert!(!dir.path().join("downloads/2024-03-01_2_GoPro.zip").exists());
}

#[tokio::test]
async fn test_existing_file_gets_next_counter() {
    let (server, client) = common::setup().await;
    let dir = TempDir::new().unwrap();
    let downloads = dir.path().join("downloads");
    std::fs::create_dir_all(&downloads).unwrap();
    std::fs::write(downloads.join("2024-03-01_1_GoPro.zip"), b"older run").unwrap();

    common::mount_page(
        &server,
        1,
        1,
        serde_json::json!([common::item("a", "2024-03-01T10:00:00Z", 10)]),
    )
    .await;
    common::mount_archive(&server, "a", b"fresh", 1).await;

    let ledger = SqliteLedger::open_memory().unwrap();
    SyncEngine::new(&client, &ledger, &NoProgress, options(&dir))
        .run()
        .await
        .unwrap();

    assert_eq!(std::fs::read(downloads.join("2024-03-01_1_GoPro.zip")).unwrap(), b"older run");
    assert_eq!(std::fs::read(downloads.join("2024-03-01_2_GoPro.zip")).unwrap(), b"fresh");
}

#[tokio::test]
async fn test_archive_failure_fails_only_that_day() {
    let (server, client) = common::setup().await;
    let dir = TempDir::new().unwrap();

    common::mount_page(
        &server,
        1,
        1,
        serde_json::json!([
            common::item("a", "2024-03-01T10:00:00Z", 10),
            common::item("b", "2024-03-02T10:00:00Z", 10)
        ]),
    )
    .await;
    common::mount_archive_status(&server, "a", 500).await;
    common::mount_archive(&server, "b", b"zip-b", 1).await;

    let ledger = SqliteLedger::open_memory().unwrap();
    let report = SyncEngine::new(&client, &ledger, &NoProgress, options(&dir))
        .run()
        .await
        .unwrap();

    assert_eq!(report.failed(), 1);
    assert_eq!(report.fetched(), 1);
    match &report.cohorts[0].status {
        CohortStatus::Failed { error } => assert!(error.contains("500")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(ledger.get(day("2024-03-01")).is_empty());
    assert_eq!(ledger.get(day("2024-03-02")), ids(&["b"]));
}

#[tokio::test]
async fn test_auth_failure_aborts_before_downloads() {
    let (server, client) = common::setup().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/media/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/x/zip/source"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ledger = SqliteLedger::open_memory().unwrap();
    let err = SyncEngine::new(&client, &ledger, &NoProgress, options(&dir))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AuthRejected { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_second_page_failure_is_fatal() {
    let (server, client) = common::setup().await;
    let dir = TempDir::new().unwrap();

    common::mount_page(
        &server,
        1,
        2,
        serde_json::json!([common::item("a", "2024-03-01T10:00:00Z", 10)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/media/search"))
        .and(wiremock::matchers::query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/x/zip/source"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ledger = SqliteLedger::open_memory().unwrap();
    let err = SyncEngine::new(&client, &ledger, &NoProgress, options(&dir))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Listing { status: 502, .. }));
    assert!(ledger.entries().unwrap().is_empty());
}
