//! GoPro cloud HTTP client.
//!
//! Talks to the listing (`/media/search`) and bulk archive
//! (`/media/x/zip/source`) endpoints with a browser session cookie.

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue};
use tracing::debug;

use super::library::{ArchiveBody, MediaLibrary};
use super::types::{SearchPage, SearchQuery, SearchResponse};
use crate::error::{Error, Result};

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.gopro.com";

const SEARCH_ACCEPT: &str = "application/vnd.gopro.jk.media.search+json; version=2.0.0";
const ARCHIVE_ACCEPT: &str = "application/zip";

/// HTTP implementation of [`MediaLibrary`].
#[derive(Debug, Clone)]
pub struct GoProClient {
    client: reqwest::Client,
    base_url: String,
}

impl GoProClient {
    /// Create a client against the production API.
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie header is not a valid header value or
    /// the HTTP client cannot be built.
    pub fn new(cookie_header: &str) -> Result<Self> {
        Self::with_base_url(cookie_header, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (mirrors, tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie header is not a valid header value or
    /// the HTTP client cannot be built.
    pub fn with_base_url(cookie_header: &str, base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let cookie = HeaderValue::from_str(cookie_header)
            .map_err(|e| Error::Config(format!("cookie header is not valid: {e}")))?;
        headers.insert(COOKIE, cookie);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("gpsync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Streamed body of a successful archive response.
#[derive(Debug)]
pub struct HttpArchive {
    response: reqwest::Response,
}

impl ArchiveBody for HttpArchive {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        Ok(self.response.chunk().await?)
    }
}

impl MediaLibrary for GoProClient {
    type Archive = HttpArchive;

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        let url = format!("{}/media/search", self.base_url);
        debug!(page = query.page, per_page = query.per_page, "Requesting media listing");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, SEARCH_ACCEPT)
            .query(&query.params())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::AuthRejected { body });
        }
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Listing {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let decoded: SearchResponse = serde_json::from_str(&text)
            .map_err(|e| Error::MalformedListing(format!("page {}: {e}", query.page)))?;
        Ok(SearchPage::from(decoded))
    }

    async fn open_archive(&self, ids: &[String]) -> Result<HttpArchive> {
        // Identifiers are sent comma-joined and unescaped.
        let url = format!("{}/media/x/zip/source?ids={}", self.base_url, ids.join(","));
        debug!(items = ids.len(), "Requesting archive");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, ARCHIVE_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Archive {
                status: status.as_u16(),
                body,
            });
        }

        Ok(HttpArchive { response })
    }
}
