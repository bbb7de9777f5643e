//! Ledger command implementations.
//!
//! Operator tooling around the download ledger:
//! - `show` - recorded days with identifier counts
//! - `check` - whether an identifier is recorded, and under which day
//! - `import` - merge a legacy JSON ledger
//! - `export` - write the ledger as JSON

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use crate::cli::LedgerCommands;
use crate::config::resolve_ledger_path;
use crate::error::{Error, Result};
use crate::model::CaptureDay;
use crate::storage::{LedgerEntry, LedgerStats, LedgerStore, SqliteLedger, parse_legacy_ledger};
use crate::sync::atomic_write;

#[derive(Serialize)]
struct DayRow {
    day: CaptureDay,
    ids: usize,
}

#[derive(Serialize)]
struct ShowOutput {
    ledger: String,
    stats: LedgerStats,
    days: Vec<DayRow>,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    id: &'a str,
    recorded: bool,
    day: Option<CaptureDay>,
}

#[derive(Serialize, Default)]
struct ImportOutput {
    days: usize,
    ids_seen: usize,
    ids_added: usize,
}

/// Execute ledger commands.
///
/// # Errors
///
/// Returns an error if the ledger cannot be opened or the command fails.
pub fn execute(command: &LedgerCommands, ledger_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let path = resolve_ledger_path(ledger_path.map(PathBuf::as_path))
        .ok_or_else(|| Error::Config("Could not determine ledger location".into()))?;
    let ledger = SqliteLedger::open(&path)?;

    match command {
        LedgerCommands::Show => show(&ledger, &path, json),
        LedgerCommands::Check { id } => check(&ledger, id, json),
        LedgerCommands::Import { path: source } => import(&ledger, source, json),
        LedgerCommands::Export { path: dest } => export(&ledger, dest, json),
    }
}

fn show(ledger: &SqliteLedger, path: &Path, json: bool) -> Result<()> {
    let stats = ledger.stats()?;
    let days: Vec<DayRow> = ledger
        .entries()?
        .into_iter()
        .map(|e| DayRow {
            day: e.day,
            ids: e.ids.len(),
        })
        .collect();

    if json {
        let output = ShowOutput {
            ledger: path.display().to_string(),
            stats,
            days,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if days.is_empty() {
        println!("Ledger is empty ({}).", path.display());
        return Ok(());
    }

    println!("{}", "Day         Items".bold());
    for row in &days {
        println!("{}  {:>5}", row.day, row.ids);
    }
    println!();
    println!(
        "{} day(s), {} item(s) in {}",
        stats.days,
        stats.ids,
        path.display()
    );
    Ok(())
}

fn check(ledger: &SqliteLedger, id: &str, json: bool) -> Result<()> {
    let recorded = ledger.contains_identifier(id);
    let day = if recorded { ledger.day_of(id)? } else { None };

    if json {
        let output = CheckOutput { id, recorded, day };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    match (recorded, day) {
        (true, Some(day)) => println!("{} {id} (recorded under {day})", "recorded".green()),
        (true, None) => println!("{} {id}", "recorded".green()),
        (false, _) => println!("{} {id}", "not recorded".yellow()),
    }
    Ok(())
}

fn import(ledger: &SqliteLedger, source: &Path, json: bool) -> Result<()> {
    let content = fs::read_to_string(source).map_err(|e| {
        Error::InvalidArgument(format!("Cannot read legacy ledger {}: {e}", source.display()))
    })?;
    let entries = parse_legacy_ledger(&content)?;

    let mut output = ImportOutput::default();
    for entry in entries {
        let ids: Vec<String> = entry.ids.into_iter().collect();
        let outcome = ledger.merge(entry.day, &ids)?;
        info!(day = %entry.day, added = outcome.added, total = outcome.total, "Imported day");
        output.days += 1;
        output.ids_seen += ids.len();
        output.ids_added += outcome.added;
    }

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "Imported {} day(s) from {}: {} of {} identifier(s) were new",
            output.days,
            source.display(),
            output.ids_added,
            output.ids_seen
        );
    }
    Ok(())
}

fn export(ledger: &SqliteLedger, dest: &Path, json: bool) -> Result<()> {
    let entries: Vec<LedgerEntry> = ledger.entries()?;
    let mut content = serde_json::to_string_pretty(&entries)?;
    content.push('\n');
    atomic_write(dest, &content)?;

    if json {
        let output = serde_json::json!({
            "success": true,
            "path": dest.display().to_string(),
            "days": entries.len(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Exported {} day(s) to {}", entries.len(), dest.display());
    }
    Ok(())
}
