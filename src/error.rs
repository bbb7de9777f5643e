//! Error types for gpsync.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=ledger, 3=remote, 4=validation, 6=partial run, etc.)
//! - Retryability flags
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gpsync operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Ledger (exit 2)
    LedgerError,

    // Remote (exit 3)
    AuthRejected,
    ListingFailed,
    ArchiveFailed,
    TransportError,
    MalformedListing,
    NoMediaFound,

    // Validation (exit 4)
    InvalidArgument,

    // Interrupted (exit 5)
    Interrupted,

    // Partial run (exit 6)
    SyncIncomplete,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::LedgerError => "LEDGER_ERROR",
            Self::AuthRejected => "AUTH_REJECTED",
            Self::ListingFailed => "LISTING_FAILED",
            Self::ArchiveFailed => "ARCHIVE_FAILED",
            Self::TransportError => "TRANSPORT_ERROR",
            Self::MalformedListing => "MALFORMED_LISTING",
            Self::NoMediaFound => "NO_MEDIA_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::Interrupted => "INTERRUPTED",
            Self::SyncIncomplete => "SYNC_INCOMPLETE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::LedgerError => 2,
            Self::AuthRejected
            | Self::ListingFailed
            | Self::ArchiveFailed
            | Self::TransportError
            | Self::MalformedListing
            | Self::NoMediaFound => 3,
            Self::InvalidArgument => 4,
            Self::Interrupted => 5,
            Self::SyncIncomplete => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether rerunning the same command may succeed without changes.
    ///
    /// True for transient remote failures and interruptions. Auth and
    /// validation errors need operator action first.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ListingFailed
                | Self::ArchiveFailed
                | Self::TransportError
                | Self::Interrupted
                | Self::SyncIncomplete
                | Self::LedgerError
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in gpsync operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication rejected (HTTP 401): {body}")]
    AuthRejected { body: String },

    #[error("Media listing failed with status {status}: {body}")]
    Listing { status: u16, body: String },

    #[error("Archive download failed with status {status}: {body}")]
    Archive { status: u16, body: String },

    #[error("Malformed media listing: {0}")]
    MalformedListing(String),

    #[error("No media was found")]
    NoMedia,

    #[error("Interrupted by operator")]
    Interrupted,

    #[error("{failed} day(s) failed to download, {unrecorded} downloaded day(s) not recorded in the ledger")]
    SyncIncomplete { failed: usize, unrecorded: usize },

    #[error("Cookie file not found: {path}")]
    CookiesNotFound { path: PathBuf },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ledger error: {0}")]
    Ledger(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::AuthRejected { .. } => ErrorCode::AuthRejected,
            Self::Listing { .. } => ErrorCode::ListingFailed,
            Self::Archive { .. } => ErrorCode::ArchiveFailed,
            Self::MalformedListing(_) => ErrorCode::MalformedListing,
            Self::NoMedia => ErrorCode::NoMediaFound,
            Self::Interrupted => ErrorCode::Interrupted,
            Self::SyncIncomplete { .. } => ErrorCode::SyncIncomplete,
            Self::CookiesNotFound { .. } | Self::Config(_) => ErrorCode::ConfigError,
            Self::Http(_) => ErrorCode::TransportError,
            Self::Ledger(_) => ErrorCode::LedgerError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for the operator.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::AuthRejected { .. } => Some(
                "Log in to the website again and re-export your cookies as JSON \
                 (e.g. with the Cookie-Editor extension), then pass them with --auth."
                    .to_string(),
            ),

            Self::CookiesNotFound { path } => Some(format!(
                "No cookie file at {}. Export cookies from your browser as JSON and pass the path with --auth.",
                path.display()
            )),

            Self::NoMedia => Some(
                "Check the --date-range and --media-type filters; nothing matched them.".to_string(),
            ),

            Self::Interrupted => Some(
                "Rerun the same command to continue. Days that were not recorded in the ledger \
                 will be downloaded again."
                    .to_string(),
            ),

            Self::SyncIncomplete { .. } => Some(
                "Rerun the same command; only the failed days will be downloaded again.".to_string(),
            ),

            Self::InvalidArgument(msg) => {
                if msg.contains("date range") {
                    Some("Expected format: YYYY-MM-DD,YYYY-MM-DD with start <= end".to_string())
                } else if msg.contains("media type") {
                    Some("Valid media types: all, videos, photos".to_string())
                } else {
                    None
                }
            }

            Self::Listing { .. }
            | Self::Archive { .. }
            | Self::MalformedListing(_)
            | Self::Http(_)
            | Self::Ledger(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
