//! Cohort Builder.
//!
//! Groups listing pages by capture day. Grouping is stable: inside a day,
//! items keep listing order. Pages are accumulated into a [`CohortSet`] so
//! a day split across several pages (adjacent or not) ends up as a single
//! cohort. An identifier served more than once is kept at its first
//! position only.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{CaptureDay, Cohort, MediaItem, RemoteItem};

/// Group one page of remote records by capture day.
///
/// # Errors
///
/// Returns `MalformedListing` if a record's capture timestamp has no
/// parsable date.
pub fn group_by_day(items: &[RemoteItem]) -> Result<BTreeMap<CaptureDay, Vec<MediaItem>>> {
    let mut grouped: BTreeMap<CaptureDay, Vec<MediaItem>> = BTreeMap::new();
    for item in items {
        let projected = MediaItem::from_remote(item).ok_or_else(|| {
            Error::MalformedListing(format!(
                "item {} has unparsable captured_at '{}'",
                item.id, item.captured_at
            ))
        })?;
        grouped
            .entry(projected.captured_day)
            .or_default()
            .push(projected);
    }
    Ok(grouped)
}

/// Cohorts accumulated across pages, keyed by capture day.
#[derive(Debug, Default)]
pub struct CohortSet {
    cohorts: BTreeMap<CaptureDay, Cohort>,
    seen: HashSet<String>,
}

impl CohortSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Group `items` and append them to any cohort already seen.
    ///
    /// Items whose id was already added (on this page or an earlier one)
    /// are dropped. Returns the number of items added.
    ///
    /// # Errors
    ///
    /// Returns `MalformedListing` if any record has no parsable capture day;
    /// in that case nothing from the page is added.
    pub fn add_page(&mut self, items: &[RemoteItem]) -> Result<usize> {
        let grouped = group_by_day(items)?;
        let mut added = 0;
        for (day, day_items) in grouped {
            let fresh: Vec<MediaItem> = day_items
                .into_iter()
                .filter(|item| {
                    let new = self.seen.insert(item.id.clone());
                    if !new {
                        debug!(id = %item.id, day = %day, "Dropping repeated listing entry");
                    }
                    new
                })
                .collect();
            if fresh.is_empty() {
                continue;
            }
            added += fresh.len();
            self.cohorts
                .entry(day)
                .or_insert_with(|| Cohort::new(day))
                .extend(fresh);
        }
        Ok(added)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    /// Total items across all cohorts.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.cohorts.values().map(Cohort::len).sum()
    }

    #[must_use]
    pub fn get(&self, day: CaptureDay) -> Option<&Cohort> {
        self.cohorts.get(&day)
    }

    /// Finished cohorts in ascending capture-day order.
    #[must_use]
    pub fn into_cohorts(self) -> Vec<Cohort> {
        self.cohorts.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(id: &str, captured_at: &str) -> RemoteItem {
        RemoteItem {
            id: id.to_string(),
            captured_at: captured_at.to_string(),
            file_size: Some(100),
            filename: Some(format!("{id}.JPG")),
            file_extension: Some("jpg".to_string()),
            media_type: "Photo".to_string(),
        }
    }

    fn day(s: &str) -> CaptureDay {
        s.parse().unwrap()
    }

    #[test]
    fn test_group_by_day_is_stable() {
        let page = vec![
            remote("c", "2024-03-01T12:00:00Z"),
            remote("x", "2024-03-02T08:00:00Z"),
            remote("a", "2024-03-01T09:00:00Z"),
            remote("b", "2024-03-01T18:00:00Z"),
        ];
        let grouped = group_by_day(&page).unwrap();

        assert_eq!(grouped.len(), 2);
        let ids: Vec<_> = grouped[&day("2024-03-01")].iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_group_by_day_rejects_bad_timestamp() {
        let page = vec![remote("a", "2024-03-01T09:00:00Z"), remote("b", "soon")];
        let err = group_by_day(&page).unwrap_err();
        assert!(matches!(err, Error::MalformedListing(_)));
        assert!(err.to_string().contains("item b"));
    }

    #[test]
    fn test_cross_page_grouping() {
        let mut set = CohortSet::new();
        set.add_page(&[remote("p1a", "2024-01-05T10:00:00Z"), remote("p1b", "2024-01-04T10:00:00Z")])
            .unwrap();
        set.add_page(&[remote("p2a", "2024-01-03T10:00:00Z")]).unwrap();
        set.add_page(&[remote("p3a", "2024-01-05T23:00:00Z")]).unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.item_count(), 4);
        let jan5 = set.get(day("2024-01-05")).unwrap();
        assert_eq!(jan5.ids(), vec!["p1a", "p3a"]);
    }

    #[test]
    fn test_repeated_id_kept_once() {
        let mut set = CohortSet::new();
        let first = set
            .add_page(&[remote("a", "2024-03-01T10:00:00Z"), remote("b", "2024-03-01T11:00:00Z")])
            .unwrap();
        let second = set
            .add_page(&[
                remote("b", "2024-03-01T11:00:00Z"),
                remote("c", "2024-03-02T10:00:00Z"),
                remote("c", "2024-03-02T10:00:00Z"),
            ])
            .unwrap();

        assert_eq!((first, second), (2, 1));
        assert_eq!(set.item_count(), 3);
        assert_eq!(set.get(day("2024-03-01")).unwrap().ids(), vec!["a", "b"]);
        assert_eq!(set.get(day("2024-03-02")).unwrap().ids(), vec!["c"]);
    }

    #[test]
    fn test_into_cohorts_ordered_by_day() {
        let mut set = CohortSet::new();
        set.add_page(&[
            remote("a", "2024-03-02T10:00:00Z"),
            remote("b", "2024-02-28T10:00:00Z"),
            remote("c", "2024-03-01T10:00:00Z"),
        ])
        .unwrap();

        let days: Vec<_> = set.into_cohorts().iter().map(|c| c.day.to_string()).collect();
        assert_eq!(days, vec!["2024-02-28", "2024-03-01", "2024-03-02"]);
    }

    #[test]
    fn test_bad_page_adds_nothing() {
        let mut set = CohortSet::new();
        let result = set.add_page(&[remote("a", "2024-03-01T09:00:00Z"), remote("b", "")]);
        assert!(result.is_err());
        assert!(set.is_empty());
    }
}
