//! File operations for sync.
//!
//! - Atomic writes: write to temp file, sync to disk, then rename
//! - Collision-free archive paths: `{day}_{n}_GoPro.zip`, first unused `n`

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::CaptureDay;

/// Suffix of every archive file name.
pub const ARCHIVE_SUFFIX: &str = "GoPro.zip";

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file (same path with `.tmp` appended)
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let mut temp_name = path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Archive file name for `day` with disambiguation counter `n`.
#[must_use]
pub fn archive_file_name(day: CaptureDay, n: u32) -> String {
    format!("{day}_{n}_{ARCHIVE_SUFFIX}")
}

/// First unused archive path for `day` inside `dir`.
///
/// Starts at `{day}_1_GoPro.zip` and increments the counter while a file
/// exists at the candidate path. Only the filesystem is consulted, never
/// the ledger; an existing file is never returned.
#[must_use]
pub fn unique_archive_path(dir: &Path, day: CaptureDay) -> PathBuf {
    let mut n = 1;
    loop {
        let candidate = dir.join(archive_file_name(day, n));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Create the downloads directory if it does not exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(s: &str) -> CaptureDay {
        s.parse().unwrap()
    }

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");

        atomic_write(&path, "[]\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[]\n");
        assert!(!temp_dir.path().join("ledger.json.tmp").exists());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("ledger.json");

        atomic_write(&path, "old").unwrap();
        atomic_write(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(archive_file_name(day("2024-03-01"), 1), "2024-03-01_1_GoPro.zip");
    }

    #[test]
    fn test_unique_archive_path_starts_at_one() {
        let temp_dir = TempDir::new().unwrap();
        let path = unique_archive_path(temp_dir.path(), day("2024-03-01"));
        assert_eq!(path, temp_dir.path().join("2024-03-01_1_GoPro.zip"));
    }

    #[test]
    fn test_unique_archive_path_skips_existing() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("2024-03-01_1_GoPro.zip");
        let second = temp_dir.path().join("2024-03-01_2_GoPro.zip");
        fs::write(&first, b"keep me").unwrap();
        fs::write(&second, b"me too").unwrap();

        let path = unique_archive_path(temp_dir.path(), day("2024-03-01"));

        assert_eq!(path, temp_dir.path().join("2024-03-01_3_GoPro.zip"));
        assert_eq!(fs::read(&first).unwrap(), b"keep me");
    }

    #[test]
    fn test_unique_archive_path_other_days_ignored() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("2024-03-02_1_GoPro.zip"), b"x").unwrap();

        let path = unique_archive_path(temp_dir.path(), day("2024-03-01"));
        assert!(path.ends_with("2024-03-01_1_GoPro.zip"));
    }
}
