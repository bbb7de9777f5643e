//! Listing filters: date range and media kind.

use std::fmt;

use serde::Serialize;

use super::media::CaptureDay;

/// Inclusive capture-date range passed to the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: CaptureDay,
    pub end: CaptureDay,
}

impl DateRange {
    /// The `start,end` form the listing endpoint expects.
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("{},{}", self.start, self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Which media types to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    All,
    Videos,
    Photos,
}

impl MediaKind {
    /// Remote type tags this kind expands to.
    #[must_use]
    pub const fn type_tags(&self) -> &'static [&'static str] {
        match self {
            Self::All => &[
                "Burst",
                "BurstVideo",
                "Continuous",
                "LoopedVideo",
                "Photo",
                "TimeLapse",
                "TimeLapseVideo",
                "Video",
            ],
            Self::Videos => &[
                "Video",
                "BurstVideo",
                "TimeLapse",
                "TimeLapseVideo",
                "LoopedVideo",
            ],
            Self::Photos => &["Photo", "Burst"],
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Videos => "videos",
            Self::Photos => "photos",
        }
    }
}

/// Filters applied to every listing request of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaFilter {
    pub range: Option<DateRange>,
    pub kind: MediaKind,
}

impl MediaFilter {
    /// Comma-joined type tags for the `type` query parameter.
    #[must_use]
    pub fn type_query(&self) -> String {
        self.kind.type_tags().join(",")
    }
}
