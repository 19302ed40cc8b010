//! Clean: delete the relocated build tree
//!
//! Deleting a root that does not exist is a successful no-op. Any other
//! failure is returned to the caller untouched; nothing is retried.

use chrono::{DateTime, Utc};
use outdir_core::error::{Error, Result};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Options for a clean run
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    /// Measure what would be removed without deleting anything
    pub dry_run: bool,
}

/// Outcome of a clean run
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    /// Directory that was cleaned
    pub root: PathBuf,
    /// Whether the root existed when the run started
    pub existed: bool,
    /// Nothing was deleted
    pub dry_run: bool,
    /// Files below the root (would be) removed
    pub files_removed: u64,
    /// Total size of those files
    pub bytes_removed: u64,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
}

/// Delete everything under (and including) `root`
pub fn clean(root: &Path) -> Result<CleanReport> {
    clean_with(root, CleanOptions::default())
}

/// Delete `root` with explicit options
pub fn clean_with(root: &Path, options: CleanOptions) -> Result<CleanReport> {
    let metadata = match std::fs::symlink_metadata(root) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(root = %root.display(), "nothing to clean");
            return Ok(report(root, false, options, (0, 0)));
        }
        Err(e) => return Err(Error::delete_failed(root, e)),
    };

    let totals = if metadata.is_dir() {
        tally(root)
    } else {
        (1, metadata.len())
    };

    if options.dry_run {
        return Ok(report(root, true, options, totals));
    }

    let removed = if metadata.is_dir() {
        std::fs::remove_dir_all(root)
    } else {
        std::fs::remove_file(root)
    };
    match removed {
        Ok(()) => {}
        // Something else removed it between the stat and the delete.
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(Error::delete_failed(root, e)),
    }

    info!(
        root = %root.display(),
        files = totals.0,
        bytes = totals.1,
        "removed build tree"
    );
    Ok(report(root, true, options, totals))
}

fn report(root: &Path, existed: bool, options: CleanOptions, totals: (u64, u64)) -> CleanReport {
    CleanReport {
        root: root.to_path_buf(),
        existed,
        dry_run: options.dry_run,
        files_removed: totals.0,
        bytes_removed: totals.1,
        finished_at: Utc::now(),
    }
}

/// Count files and bytes below `root`; unreadable entries are skipped
fn tally(root: &Path) -> (u64, u64) {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .fold((0, 0), |(files, bytes), entry| {
            let len = entry.metadata().map(|m| m.len()).unwrap_or(0);
            (files + 1, bytes + len)
        })
}
