//! Media item models.
//!
//! A `RemoteItem` is a snapshot of one record from the remote listing. It is
//! reduced to a `MediaItem` as soon as its capture day is known; nothing
//! downstream of the Cohort Builder sees the raw record.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Date format used for capture days everywhere (ledger keys, file names).
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// The date component of a capture timestamp.
///
/// Derived by truncating the remote ISO-8601 timestamp at its date part.
/// No timezone conversion is applied: the day is whatever the remote
/// source wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureDay(NaiveDate);

impl CaptureDay {
    /// Truncate an ISO-8601 timestamp (`2024-03-01T10:22:33Z`) to its day.
    ///
    /// Returns `None` if the timestamp does not start with a valid
    /// `YYYY-MM-DD` date.
    #[must_use]
    pub fn from_timestamp(timestamp: &str) -> Option<Self> {
        let date_part = timestamp
            .split(['T', ' '])
            .next()
            .unwrap_or(timestamp)
            .trim();
        NaiveDate::parse_from_str(date_part, DAY_FORMAT).ok().map(Self)
    }
}

impl fmt::Display for CaptureDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for CaptureDay {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DAY_FORMAT).map(Self)
    }
}

impl Serialize for CaptureDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CaptureDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One record of the remote listing, as delivered on the wire.
///
/// Only the fields the engine needs are declared; everything else the
/// remote returns is ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteItem {
    /// Globally unique, opaque identifier.
    pub id: String,

    /// ISO-8601 capture timestamp.
    pub captured_at: String,

    /// Declared size in bytes (the remote omits it for some items).
    #[serde(default)]
    pub file_size: Option<u64>,

    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub file_extension: Option<String>,

    /// Media-type tag (`Video`, `Photo`, `TimeLapse`, ...).
    #[serde(rename = "type", default)]
    pub media_type: String,
}

/// The reduced projection of a `RemoteItem` used by the sync engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    pub id: String,
    pub filename: String,
    pub file_extension: String,
    pub file_size: u64,
    pub media_type: String,
    pub captured_at: String,
    pub captured_day: CaptureDay,
}

impl MediaItem {
    /// Project a remote record, returning `None` if its capture timestamp
    /// carries no parsable date.
    #[must_use]
    pub fn from_remote(item: &RemoteItem) -> Option<Self> {
        let captured_day = CaptureDay::from_timestamp(&item.captured_at)?;
        Some(Self {
            id: item.id.clone(),
            filename: item.filename.clone().unwrap_or_default(),
            file_extension: item.file_extension.clone().unwrap_or_default(),
            file_size: item.file_size.unwrap_or(0),
            media_type: item.media_type.clone(),
            captured_at: item.captured_at.clone(),
            captured_day,
        })
    }
}
