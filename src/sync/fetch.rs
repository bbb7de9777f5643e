//! Archive Fetcher.
//!
//! Streams one cohort's bulk archive to disk and, only after the file is
//! flushed and synced, records the cohort's identifiers in the ledger.
//! Memory stays bounded by the chunk size regardless of archive size.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::progress::{ProgressSink, format_mb};
use super::types::{FetchOutcome, LedgerUpdate};
use crate::error::{Error, Result};
use crate::model::ArchiveJob;
use crate::remote::{ArchiveBody, MediaLibrary};
use crate::storage::LedgerStore;

/// Downloads archives and reconciles the ledger afterwards.
pub struct ArchiveFetcher<'a, L, S: ?Sized, P: ?Sized> {
    library: &'a L,
    ledger: &'a S,
    progress: &'a P,
    chunk_size: usize,
    cancel: CancellationToken,
}

impl<'a, L, S, P> ArchiveFetcher<'a, L, S, P>
where
    L: MediaLibrary,
    S: LedgerStore + ?Sized,
    P: ProgressSink + ?Sized,
{
    #[must_use]
    pub fn new(
        library: &'a L,
        ledger: &'a S,
        progress: &'a P,
        chunk_size: usize,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            library,
            ledger,
            progress,
            chunk_size: chunk_size.max(1),
            cancel,
        }
    }

    /// Download `job` to `job.path`, then merge its identifiers.
    ///
    /// On any error the ledger is left untouched and a partially written
    /// file may remain at `job.path`. A failed ledger merge after a complete
    /// download is not an error; it is reported in the outcome.
    ///
    /// # Errors
    ///
    /// - `Archive` if the endpoint answers with a non-200 status
    /// - `Http` if the transfer breaks off
    /// - `Io` if the file cannot be written
    /// - `Interrupted` if cancellation is requested before or during the
    ///   transfer
    pub async fn fetch(&self, job: &ArchiveJob) -> Result<FetchOutcome> {
        let ids = job.ids();
        let declared = job.total_size();
        info!(
            day = %job.day,
            items = ids.len(),
            size = %format_mb(declared),
            path = %job.path.display(),
            "Starting archive download"
        );

        if self.cancel.is_cancelled() {
            return Err(Error::Interrupted);
        }
        let mut body = self.library.open_archive(&ids).await?;

        let label = job
            .path
            .file_name()
            .map_or_else(|| job.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.progress.start(&label, declared);
        let written = self.stream_to_file(&mut body, job).await;
        self.progress.finish();
        let bytes_written = written?;

        info!(day = %job.day, bytes = bytes_written, "Archive downloaded");

        let ledger = match self.ledger.merge(job.day, &ids) {
            Ok(outcome) => LedgerUpdate::Merged(outcome),
            Err(e) => {
                warn!(
                    day = %job.day,
                    error = %e,
                    "Archive saved but ledger update failed; day will be downloaded again next run"
                );
                LedgerUpdate::Failed {
                    error: e.to_string(),
                }
            }
        };

        Ok(FetchOutcome {
            path: job.path.clone(),
            bytes_written,
            ledger,
        })
    }

    async fn stream_to_file<B: ArchiveBody>(&self, body: &mut B, job: &ArchiveJob) -> Result<u64> {
        // Never overwrite an archive from an earlier run.
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&job.path)?;
        let mut writer = BufWriter::with_capacity(self.chunk_size, file);
        let mut written: u64 = 0;

        loop {
            let chunk = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(Error::Interrupted),
                chunk = body.next_chunk() => chunk?,
            };
            let Some(chunk) = chunk else { break };

            for piece in chunk.chunks(self.chunk_size) {
                writer.write_all(piece)?;
                let len = piece.len() as u64;
                written += len;
                self.progress.advance(len);
            }
        }

        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(written)
    }
}
