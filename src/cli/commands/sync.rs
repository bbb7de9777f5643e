//! Sync command implementation.
//!
//! Resolves flags against the config file, opens the ledger, builds the
//! HTTP client from the cookie export and drives a [`SyncEngine`] run on a
//! tokio runtime. Ctrl-C cancels the run between chunks.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cli::SyncArgs;
use crate::config::{GpsyncConfig, load_config, resolve_ledger_path};
use crate::error::{Error, Result};
use crate::model::MediaFilter;
use crate::remote::{GoProClient, load_cookie_header};
use crate::storage::SqliteLedger;
use crate::sync::progress::format_mb;
use crate::sync::{
    CohortStatus, DEFAULT_CHUNK_SIZE, DEFAULT_PER_PAGE, LedgerUpdate, NoProgress, ProgressSink,
    SyncEngine, SyncOptions, SyncReport, TerminalProgress,
};
use crate::validate::{normalize_media_kind, parse_date_range, require_positive};

const DEFAULT_OUTPUT_DIR: &str = "downloads";

#[derive(Serialize)]
struct SyncOutput<'a> {
    success: bool,
    dry_run: bool,
    ledger: String,
    output_dir: String,
    fetched: usize,
    skipped: usize,
    planned: usize,
    failed: usize,
    ledger_failures: usize,
    bytes_written: u64,
    #[serde(flatten)]
    report: &'a SyncReport,
}

/// Fully resolved inputs for one run.
#[derive(Debug)]
struct Resolved {
    auth: PathBuf,
    base_url: Option<String>,
    options: SyncOptions,
}

/// Merge flags with config-file defaults and validate them.
fn resolve(args: &SyncArgs, config: GpsyncConfig) -> Result<Resolved> {
    let auth = args.auth.clone().or(config.auth).ok_or_else(|| {
        Error::InvalidArgument(
            "--auth <cookies.json> is required (or set GPSYNC_AUTH / \"auth\" in config.json)"
                .to_string(),
        )
    })?;

    let kind = normalize_media_kind(&args.media_type)?;
    let range = args.date_range.as_deref().map(parse_date_range).transpose()?;

    let per_page = require_positive(
        "per-page",
        args.per_page.or(config.per_page).unwrap_or(DEFAULT_PER_PAGE) as usize,
    )?;
    let chunk_size = require_positive(
        "chunk-size",
        args.chunk_size.or(config.chunk_size).unwrap_or(DEFAULT_CHUNK_SIZE),
    )?;
    let output_dir = args
        .output
        .clone()
        .or(config.output)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let mut options = SyncOptions::new(output_dir);
    options.filter = MediaFilter { range, kind };
    options.per_page = u32::try_from(per_page)
        .map_err(|_| Error::InvalidArgument("per-page is too large".to_string()))?;
    options.chunk_size = chunk_size;
    options.dry_run = args.dry_run;

    Ok(Resolved {
        auth,
        base_url: config.base_url,
        options,
    })
}

/// Execute the sync command.
///
/// # Errors
///
/// Returns any fatal run error, or `SyncIncomplete` after printing the
/// report if some days failed.
pub fn execute(args: &SyncArgs, ledger_path: Option<&PathBuf>, json: bool, quiet: bool) -> Result<()> {
    let resolved = resolve(args, load_config()?)?;

    let cookie_header = load_cookie_header(&resolved.auth)?;
    let client = match &resolved.base_url {
        Some(url) => GoProClient::with_base_url(&cookie_header, url.clone())?,
        None => GoProClient::new(&cookie_header)?,
    };

    let ledger_path = resolve_ledger_path(ledger_path.map(PathBuf::as_path))
        .ok_or_else(|| Error::Config("Could not determine ledger location".into()))?;
    let ledger = SqliteLedger::open(&ledger_path)?;
    debug!(ledger = %ledger_path.display(), base_url = client.base_url(), "Starting sync");

    let output_dir = resolved.options.output_dir.clone();
    let dry_run = resolved.options.dry_run;

    let terminal = TerminalProgress::new();
    let progress: &dyn ProgressSink = if !quiet && !json && std::io::stderr().is_terminal() {
        &terminal
    } else {
        &NoProgress
    };

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

    let report = rt.block_on(async {
        let cancel = CancellationToken::new();
        let watcher = cancel.clone();
        let signal = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current chunk");
                watcher.cancel();
            }
        });

        let engine = SyncEngine::new(&client, &ledger, progress, resolved.options)
            .with_cancellation(cancel);
        let result = engine.run().await;
        signal.abort();
        result
    })?;

    if json {
        let output = SyncOutput {
            success: report.is_clean(),
            dry_run,
            ledger: ledger_path.display().to_string(),
            output_dir: output_dir.display().to_string(),
            fetched: report.fetched(),
            skipped: report.skipped(),
            planned: report.planned(),
            failed: report.failed(),
            ledger_failures: report.ledger_failures(),
            bytes_written: report.bytes_written(),
            report: &report,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if !quiet {
        print_report(&report, &output_dir, dry_run);
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(Error::SyncIncomplete {
            failed: report.failed(),
            unrecorded: report.ledger_failures(),
        })
    }
}

fn print_report(report: &SyncReport, output_dir: &Path, dry_run: bool) {
    println!(
        "Listed {} item(s) across {} day(s) from {} page(s)",
        report.items_listed,
        report.cohorts.len(),
        report.pages_read
    );
    println!();

    for cohort in &report.cohorts {
        let status = match &cohort.status {
            CohortStatus::Skipped => "skipped".dimmed().to_string(),
            CohortStatus::Planned => "would fetch".yellow().to_string(),
            CohortStatus::Fetched(outcome) => match &outcome.ledger {
                LedgerUpdate::Merged(_) => "fetched".green().to_string(),
                LedgerUpdate::Failed { .. } => "fetched, not recorded".yellow().to_string(),
            },
            CohortStatus::Failed { .. } => "failed".red().to_string(),
        };
        println!(
            "  {}  {:>4} item(s)  {:>10}  {}",
            cohort.day,
            cohort.items,
            format_mb(cohort.declared_bytes),
            status
        );
        match &cohort.status {
            CohortStatus::Fetched(outcome) => {
                println!("      -> {}", outcome.path.display());
                if let LedgerUpdate::Failed { error } = &outcome.ledger {
                    println!("      {}", error.yellow());
                }
            }
            CohortStatus::Failed { error } => println!("      {}", error.red()),
            CohortStatus::Skipped | CohortStatus::Planned => {}
        }
        if cohort.cross_day_duplicates > 0 {
            println!(
                "      {} item(s) already recorded under another day",
                cohort.cross_day_duplicates
            );
        }
    }

    println!();
    if dry_run {
        println!(
            "{} {} to fetch, {} skipped",
            "Dry run:".bold(),
            report.planned(),
            report.skipped()
        );
        return;
    }
    println!(
        "{} {} fetched, {} skipped, {} failed ({} written to {})",
        "Done:".bold(),
        report.fetched(),
        report.skipped(),
        report.failed(),
        format_mb(report.bytes_written()),
        output_dir.display()
    );
}
