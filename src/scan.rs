//! Directory scanning and recency ranking.
//!
//! Turns `(directory, extensions, index)` into the one file the selector will
//! decode. Nothing is cached: every call lists the directory again and stats
//! every matching entry, so the answer always reflects the directory as it is
//! right now.
//!
//! ## Ordering
//!
//! Candidates are ordered by modification time, newest first. Files with the
//! same timestamp (common on filesystems with one-second resolution) are
//! ordered by path, ascending, so rank `k` is stable across calls.
//!
//! ## Check order
//!
//! The checks below run in a fixed order. `validate` relies on it to report
//! the same first failure that `select` would raise:
//!
//! 1. empty path
//! 2. path does not exist
//! 3. path is not a directory
//! 4. no file matches the extension set
//! 5. index is past the last match

use crate::extensions::ExtensionSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Folder path cannot be empty")]
    EmptyPath,
    #[error("Folder path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("No image files found in folder: {}", .0.display())]
    NoMatch(PathBuf),
    #[error("Index {index} is out of range. Only {count} image(s) found in folder.")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A matching file and its modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl Candidate {
    /// Modification time as fractional seconds since the Unix epoch.
    ///
    /// Times before the epoch come out negative.
    pub fn timestamp(&self) -> f64 {
        match self.modified.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs_f64(),
            Err(e) => -e.duration().as_secs_f64(),
        }
    }
}

/// Check that `dir` names an existing directory.
pub fn check_directory(dir: &Path) -> Result<(), ScanError> {
    if dir.as_os_str().is_empty() {
        return Err(ScanError::EmptyPath);
    }
    if !dir.exists() {
        return Err(ScanError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }
    Ok(())
}

/// List every regular file in `dir` matching `extensions`, newest first.
///
/// Each directory entry appears at most once, even when it matches several
/// suffixes. Entries that disappear or cannot be stat'ed between listing and
/// ranking are skipped.
pub fn collect_candidates(
    dir: &Path,
    extensions: &ExtensionSet,
) -> Result<Vec<Candidate>, ScanError> {
    check_directory(dir)?;

    let mut candidates: Vec<Candidate> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !extensions.matches(&name.to_string_lossy()) {
            continue;
        }
        let path = entry.path();
        // fs::metadata follows symlinks, so a link to an image ranks by its target
        let modified = match fs::metadata(&path).and_then(|m| {
            if m.is_file() {
                m.modified().map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(Some(t)) => t,
            Ok(None) => continue,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        candidates.push(Candidate { path, modified });
    }

    candidates.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.path.cmp(&b.path))
    });

    debug!(
        dir = %dir.display(),
        extensions = %extensions,
        matches = candidates.len(),
        "scanned directory"
    );
    Ok(candidates)
}

/// Pick the candidate at `index` (0 = most recently modified).
pub fn pick(dir: &Path, extensions: &ExtensionSet, index: usize) -> Result<Candidate, ScanError> {
    let mut candidates = collect_candidates(dir, extensions)?;
    if candidates.is_empty() {
        return Err(ScanError::NoMatch(dir.to_path_buf()));
    }
    let count = candidates.len();
    if index >= count {
        return Err(ScanError::IndexOutOfRange { index, count });
    }
    Ok(candidates.swap_remove(index))
}
