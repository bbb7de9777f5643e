//! Remote media library access.
//!
//! The sync engine only talks to the [`MediaLibrary`] trait. The HTTP
//! implementation, [`GoProClient`], authenticates every request with a
//! cookie header built from a browser cookie export.
//!
//! - [`library`] - `MediaLibrary` / `ArchiveBody` traits
//! - [`types`] - listing request/response types
//! - [`gopro`] - reqwest-based client
//! - [`cookies`] - cookie file loading

pub mod cookies;
pub mod gopro;
pub mod library;
pub mod types;

pub use cookies::load_cookie_header;
pub use gopro::{DEFAULT_BASE_URL, GoProClient, HttpArchive};
pub use library::{ArchiveBody, MediaLibrary};
pub use types::{Pages, SearchPage, SearchQuery, SearchResponse};
