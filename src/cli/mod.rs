//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// gpsync - Download your GoPro cloud library as one archive per day
#[derive(Parser, Debug)]
#[command(name = "gpsync", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Ledger path (default: ~/.gpsync/ledger.db)
    #[arg(long, global = true, env = "GPSYNC_LEDGER")]
    pub ledger: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download every capture day not yet recorded in the ledger
    Sync(SyncArgs),

    /// Inspect or migrate the download ledger
    Ledger {
        #[command(subcommand)]
        command: LedgerCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print version information
    Version,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Sync
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Browser cookie export (JSON array of {name, value})
    #[arg(long, env = "GPSYNC_AUTH")]
    pub auth: Option<PathBuf>,

    /// Capture date range, inclusive: YYYY-MM-DD,YYYY-MM-DD
    #[arg(long)]
    pub date_range: Option<String>,

    /// Media type: all, videos or photos
    #[arg(long, default_value = "all")]
    pub media_type: String,

    /// Bytes written per streamed chunk (default: 8192)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Listing page size (default: 30)
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Directory archives are written to (default: downloads)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// List and reconcile only; download nothing and leave the ledger alone
    #[arg(long)]
    pub dry_run: bool,
}

// ============================================================================
// Ledger Commands
// ============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum LedgerCommands {
    /// List recorded days with identifier counts
    Show,

    /// Report whether a media identifier is recorded under any day
    Check {
        /// Media identifier
        id: String,
    },

    /// Merge a legacy JSON ledger (gopro_media_db.json) into this one
    Import {
        /// Path to the legacy ledger file
        path: PathBuf,
    },

    /// Write the ledger as JSON: [{"day": ..., "ids": [...]}]
    Export {
        /// Destination file
        path: PathBuf,
    },
}
