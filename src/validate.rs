//! Input validation for sync arguments.
//!
//! Date ranges are checked strictly (format, real calendar dates, order).
//! Media kinds go through exact match → synonym lookup → error, so
//! `video`, `Videos` and `clips` all resolve to the same filter.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::model::{CaptureDay, DateRange, MediaKind};

// ── Synonym map ──────────────────────────────────────────────

pub static MEDIA_KIND_SYNONYMS: LazyLock<HashMap<&str, MediaKind>> = LazyLock::new(|| {
    [
        ("all", MediaKind::All),
        ("any", MediaKind::All),
        ("everything", MediaKind::All),
        ("videos", MediaKind::Videos),
        ("video", MediaKind::Videos),
        ("clips", MediaKind::Videos),
        ("photos", MediaKind::Photos),
        ("photo", MediaKind::Photos),
        ("pictures", MediaKind::Photos),
        ("images", MediaKind::Photos),
    ]
    .into_iter()
    .collect()
});

/// Resolve a media kind argument (case-insensitive, synonyms allowed).
///
/// # Errors
///
/// Returns `InvalidArgument` if the value matches no kind.
pub fn normalize_media_kind(input: &str) -> Result<MediaKind> {
    let lower = input.trim().to_lowercase();
    MEDIA_KIND_SYNONYMS
        .get(lower.as_str())
        .copied()
        .ok_or_else(|| Error::InvalidArgument(format!("unknown media type '{input}'")))
}

/// Parse and validate a `YYYY-MM-DD,YYYY-MM-DD` date range.
///
/// # Errors
///
/// Returns `InvalidArgument` if the format is wrong, either date is not a
/// real calendar date, or start is after end.
pub fn parse_date_range(input: &str) -> Result<DateRange> {
    let invalid = || Error::InvalidArgument(format!("invalid date range '{input}'"));

    let (start, end) = input.split_once(',').ok_or_else(invalid)?;
    if !is_day_shaped(start) || !is_day_shaped(end) {
        return Err(invalid());
    }

    let start: CaptureDay = start.parse().map_err(|_| invalid())?;
    let end: CaptureDay = end.parse().map_err(|_| invalid())?;

    if start > end {
        return Err(Error::InvalidArgument(format!(
            "invalid date range '{input}': start is after end"
        )));
    }

    Ok(DateRange { start, end })
}

/// Check the literal `\d{4}-\d{2}-\d{2}` shape before parsing, so that
/// chrono's lenient parsing (e.g. `2024-1-5`) is not accepted.
fn is_day_shaped(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Validate a positive size argument (`--per-page`, `--chunk-size`).
///
/// # Errors
///
/// Returns `InvalidArgument` if the value is zero.
pub fn require_positive(name: &str, value: usize) -> Result<usize> {
    if value == 0 {
        return Err(Error::InvalidArgument(format!("{name} must be at least 1")));
    }
    Ok(value)
}
