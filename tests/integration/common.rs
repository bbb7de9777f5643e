//! Shared test helpers for the HTTP integration tests.
//!
//! Each helper mounts mock endpoints on a wiremock server; `setup` returns a
//! `GoProClient` pointed at it.

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gpsync::remote::GoProClient;

pub const COOKIE: &str = "gp_access_token=abc123; gp_user_id=user-001";

pub const SEARCH_ACCEPT: &str = "application/vnd.gopro.jk.media.search+json; version=2.0.0";

/// Starts a mock server and returns a client authenticated with [`COOKIE`].
pub async fn setup() -> (MockServer, GoProClient) {
    let server = MockServer::start().await;
    let client = GoProClient::with_base_url(COOKIE, server.uri()).expect("client should build");
    (server, client)
}

/// A listing record as the remote returns it.
pub fn item(id: &str, captured_at: &str, size: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "captured_at": captured_at,
        "file_size": size,
        "filename": format!("GX01{id}.MP4"),
        "file_extension": "mp4",
        "type": "Video",
        "camera_model": "HERO12 Black",
        "ready_to_view": "ready"
    })
}

/// Mounts listing page `page` of `total_pages`.
pub async fn mount_page(server: &MockServer, page: u32, total_pages: u32, items: serde_json::Value) {
    let count = items.as_array().map_or(0, Vec::len);
    Mock::given(method("GET"))
        .and(path("/media/search"))
        .and(query_param("page", page.to_string()))
        .and(header("cookie", COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_embedded": { "media": items, "errors": [] },
            "_pages": {
                "current_page": page,
                "per_page": 2,
                "total_items": count,
                "total_pages": total_pages
            }
        })))
        .mount(server)
        .await;
}

/// Mounts an archive endpoint for exactly `ids` (comma-joined) returning
/// `body`, expected to be hit `times` times.
pub async fn mount_archive(server: &MockServer, ids: &str, body: &[u8], times: u64) {
    Mock::given(method("GET"))
        .and(path("/media/x/zip/source"))
        .and(query_param("ids", ids))
        .and(header("accept", "application/zip"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/zip")
                .set_body_bytes(body.to_vec()),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts an archive endpoint for `ids` that answers with `status`.
pub async fn mount_archive_status(server: &MockServer, ids: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path("/media/x/zip/source"))
        .and(query_param("ids", ids))
        .respond_with(ResponseTemplate::new(status).set_body_string("archive unavailable"))
        .mount(server)
        .await;
}
