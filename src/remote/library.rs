//! Media library traits.
//!
//! Defines the interface the sync engine uses to reach the remote listing
//! and archive endpoints. Uses async methods for HTTP-based libraries.

use bytes::Bytes;

use super::types::{SearchPage, SearchQuery};
use crate::error::Result;

/// A streamed archive response body.
pub trait ArchiveBody: Send {
    /// Next chunk of the body, or `None` once the body is exhausted.
    fn next_chunk(&mut self) -> impl std::future::Future<Output = Result<Option<Bytes>>> + Send;
}

/// The remote media library.
///
/// Implemented by [`GoProClient`](super::GoProClient) and by in-process
/// fakes in tests.
pub trait MediaLibrary: Send + Sync {
    /// Body type returned by [`open_archive`](Self::open_archive).
    type Archive: ArchiveBody;

    /// Request one page of the listing.
    ///
    /// Fails with `AuthRejected` on 401 and `Listing` on any other
    /// non-200 status.
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl std::future::Future<Output = Result<SearchPage>> + Send;

    /// Request a bulk archive of `ids`.
    ///
    /// Succeeds only on HTTP 200; any other status is an `Archive` error
    /// carrying the status and body text. The body is not read until the
    /// caller pulls chunks from it.
    fn open_archive(
        &self,
        ids: &[String],
    ) -> impl std::future::Future<Output = Result<Self::Archive>> + Send;
}
