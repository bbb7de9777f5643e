//! Transfer progress reporting.
//!
//! The Archive Fetcher reports bytes written to an injected
//! [`ProgressSink`]. The CLI renders a single-line bar on stderr; tests and
//! non-interactive runs use [`NoProgress`].

use std::cell::Cell;
use std::io::Write;

use colored::Colorize;

/// Receives byte-level progress for one archive at a time.
pub trait ProgressSink {
    /// A new transfer begins. `total_bytes` is the declared size and may be
    /// smaller than what is actually written (archives carry overhead).
    fn start(&self, label: &str, total_bytes: u64);

    /// `bytes` more were written to storage.
    fn advance(&self, bytes: u64);

    /// The current transfer ended (successfully or not).
    fn finish(&self);
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn start(&self, _label: &str, _total_bytes: u64) {}
    fn advance(&self, _bytes: u64) {}
    fn finish(&self) {}
}

const BAR_WIDTH: usize = 30;

/// Single-line progress bar on stderr, redrawn on each whole-percent step.
#[derive(Debug, Default)]
pub struct TerminalProgress {
    total: Cell<u64>,
    done: Cell<u64>,
    last_drawn: Cell<Option<u64>>,
}

impl TerminalProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn draw(&self) {
        let total = self.total.get();
        let done = self.done.get();
        let percent = percent(done, total);
        if self.last_drawn.get() == Some(percent) {
            return;
        }
        self.last_drawn.set(Some(percent));

        let filled = usize::try_from(percent).unwrap_or(100) * BAR_WIDTH / 100;
        let bar = format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled));
        let mut stderr = std::io::stderr().lock();
        let _ = write!(
            stderr,
            "\r  [{}] {:>3}% {} / {}",
            bar.cyan(),
            percent,
            format_mb(done),
            format_mb(total)
        );
        let _ = stderr.flush();
    }
}

impl ProgressSink for TerminalProgress {
    fn start(&self, label: &str, total_bytes: u64) {
        self.total.set(total_bytes);
        self.done.set(0);
        self.last_drawn.set(None);
        eprintln!(
            "{} {} ({})",
            "Downloading".green().bold(),
            label,
            format_mb(total_bytes)
        );
        self.draw();
    }

    fn advance(&self, bytes: u64) {
        self.done.set(self.done.get().saturating_add(bytes));
        self.draw();
    }

    fn finish(&self) {
        eprintln!();
    }
}

/// Percentage of `done` over `total`, capped at 100.
#[must_use]
pub fn percent(done: u64, total: u64) -> u64 {
    if total == 0 {
        return 100;
    }
    (done.saturating_mul(100) / total).min(100)
}

/// Human-readable size in MiB with two decimals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 200), 0);
        assert_eq!(percent(50, 200), 25);
        assert_eq!(percent(400, 200), 100);
        assert_eq!(percent(10, 0), 100);
    }

    #[test]
    fn test_format_mb() {
        assert_eq!(format_mb(0), "0.00 MB");
        assert_eq!(format_mb(1024 * 1024 * 3 / 2), "1.50 MB");
    }

    #[test]
    fn test_terminal_progress_accumulates() {
        let progress = TerminalProgress::new();
        progress.start("2024-03-01_1_GoPro.zip", 1000);
        progress.advance(250);
        progress.advance(250);
        assert_eq!(progress.done.get(), 500);
        assert_eq!(progress.last_drawn.get(), Some(50));
        progress.finish();
    }
}
