//! Pagination Driver.
//!
//! Walks every listing page, accumulates cohorts across pages, then
//! reconciles and fetches them one at a time in ascending day order.
//!
//! Finalization is deferred until the listing is complete so a day that
//! spans several pages always produces exactly one archive.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::cohort::CohortSet;
use super::fetch::ArchiveFetcher;
use super::file::{ensure_dir, unique_archive_path};
use super::progress::ProgressSink;
use super::reconcile::decide;
use super::types::{CohortReport, CohortStatus, SyncOptions, SyncReport};
use crate::error::{Error, Result};
use crate::model::{ArchiveJob, Cohort};
use crate::remote::{MediaLibrary, SearchPage, SearchQuery};
use crate::storage::LedgerStore;

/// Drives one sync run against a media library and a ledger.
pub struct SyncEngine<'a, L, S: ?Sized, P: ?Sized> {
    library: &'a L,
    ledger: &'a S,
    progress: &'a P,
    options: SyncOptions,
    cancel: CancellationToken,
}

/// Cohorts gathered from a complete listing.
struct Listing {
    cohorts: CohortSet,
    pages_read: u32,
    total_pages: u32,
}

impl<'a, L, S, P> SyncEngine<'a, L, S, P>
where
    L: MediaLibrary,
    S: LedgerStore + ?Sized,
    P: ProgressSink + ?Sized,
{
    #[must_use]
    pub fn new(library: &'a L, ledger: &'a S, progress: &'a P, options: SyncOptions) -> Self {
        Self {
            library,
            ledger,
            progress,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort the run when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Execute the run.
    ///
    /// Listing failures are fatal. Archive failures are recorded per cohort
    /// and the run continues with the next day.
    ///
    /// # Errors
    ///
    /// - `AuthRejected` / `Listing` / `Http` if any listing page fails
    /// - `NoMedia` if the first page is empty
    /// - `MalformedListing` if a record has no parsable capture day
    /// - `Interrupted` if cancelled
    /// - `Io` if the output directory cannot be created
    pub async fn run(&self) -> Result<SyncReport> {
        if !self.options.dry_run {
            ensure_dir(&self.options.output_dir)?;
        }

        let listing = self.list_all().await?;
        let items_listed = listing.cohorts.item_count();
        info!(
            pages = listing.pages_read,
            items = items_listed,
            days = listing.cohorts.len(),
            "Listing complete"
        );

        let mut report = SyncReport {
            pages_read: listing.pages_read,
            total_pages: listing.total_pages,
            items_listed,
            cohorts: Vec::with_capacity(listing.cohorts.len()),
        };

        for cohort in listing.cohorts.into_cohorts() {
            if self.cancel.is_cancelled() {
                return Err(Error::Interrupted);
            }
            report.cohorts.push(self.process(&cohort).await?);
        }

        Ok(report)
    }

    async fn list_all(&self) -> Result<Listing> {
        let first = self.search(1).await?;
        if first.is_empty() {
            return Err(Error::NoMedia);
        }

        let total_pages = first.pages.total_pages.max(1);
        debug!(
            total_pages,
            total_items = first.pages.total_items,
            "First listing page received"
        );

        let mut cohorts = CohortSet::new();
        cohorts.add_page(&first.items)?;
        let mut pages_read = 1;

        for page in 2..=total_pages {
            let next = self.search(page).await?;
            if next.is_empty() {
                warn!(page, total_pages, "Listing page was empty; stopping pagination early");
                break;
            }
            cohorts.add_page(&next.items)?;
            pages_read = page;
        }

        Ok(Listing {
            cohorts,
            pages_read,
            total_pages,
        })
    }

    async fn search(&self, page: u32) -> Result<SearchPage> {
        if self.cancel.is_cancelled() {
            return Err(Error::Interrupted);
        }
        let query = SearchQuery::new(page, self.options.per_page, self.options.filter.clone());
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(Error::Interrupted),
            result = self.library.search(&query) => result,
        }
    }

    async fn process(&self, cohort: &Cohort) -> Result<CohortReport> {
        let recorded = self.ledger.get(cohort.day);
        let decision = decide(cohort, &recorded);

        let cross_day_duplicates = cohort
            .items
            .iter()
            .filter(|item| !recorded.contains(&item.id) && self.ledger.contains_identifier(&item.id))
            .count();
        if cross_day_duplicates > 0 {
            info!(
                day = %cohort.day,
                count = cross_day_duplicates,
                "Some items are already recorded under another day"
            );
        }

        let mut report = CohortReport {
            day: cohort.day,
            items: cohort.len(),
            recorded: recorded.len(),
            declared_bytes: cohort.total_size(),
            cross_day_duplicates,
            status: CohortStatus::Skipped,
        };

        if !decision.needs_fetch() {
            info!(day = %cohort.day, items = cohort.len(), "Already downloaded, skipping");
            return Ok(report);
        }

        if self.options.dry_run {
            info!(
                day = %cohort.day,
                items = cohort.len(),
                recorded = recorded.len(),
                "Would download"
            );
            report.status = CohortStatus::Planned;
            return Ok(report);
        }

        let path = unique_archive_path(&self.options.output_dir, cohort.day);
        let job = ArchiveJob::new(cohort, path);
        let fetcher = ArchiveFetcher::new(
            self.library,
            self.ledger,
            self.progress,
            self.options.chunk_size,
            self.cancel.clone(),
        );

        report.status = match fetcher.fetch(&job).await {
            Ok(outcome) => CohortStatus::Fetched(outcome),
            Err(Error::Interrupted) => return Err(Error::Interrupted),
            Err(e) => {
                warn!(day = %cohort.day, error = %e, "Archive download failed; continuing");
                CohortStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        Ok(report)
    }
}
