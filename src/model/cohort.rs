//! Cohorts and archive jobs.

use std::path::PathBuf;

use serde::Serialize;

use super::media::{CaptureDay, MediaItem};

/// All listed items sharing one capture day, in listing order.
///
/// A cohort is the unit of archive granularity: one archive per cohort
/// per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cohort {
    pub day: CaptureDay,
    pub items: Vec<MediaItem>,
}

impl Cohort {
    #[must_use]
    pub const fn new(day: CaptureDay) -> Self {
        Self {
            day,
            items: Vec::new(),
        }
    }

    /// Append items observed later in the listing (e.g. on a later page).
    pub fn extend(&mut self, items: impl IntoIterator<Item = MediaItem>) {
        self.items.extend(items);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identifiers in listing order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }

    /// Sum of declared sizes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.items.iter().map(|i| i.file_size).sum()
    }
}

/// A single archive transfer: where to write it and what to bundle.
///
/// Lives for one engine iteration.
#[derive(Debug, Clone)]
pub struct ArchiveJob {
    pub day: CaptureDay,
    pub path: PathBuf,
    pub items: Vec<MediaItem>,
}

impl ArchiveJob {
    #[must_use]
    pub fn new(cohort: &Cohort, path: PathBuf) -> Self {
        Self {
            day: cohort.day,
            path,
            items: cohort.items.clone(),
        }
    }

    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }

    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.items.iter().map(|i| i.file_size).sum()
    }
}
