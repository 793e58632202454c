//! Per-file dependency records and the reference-directive scanner.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tsinc_common::normalize_path;

use crate::error::ScanError;

/// Matches `/// <reference path="..." />` directives at line starts.
///
/// Both quote styles are accepted, and whitespace is tolerated anywhere
/// the hand-written directives in the wild put it.
static REFERENCE_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*///\s*<\s*reference\s*path\s*=\s*["']([^"']+)["']"#).unwrap()
});

/// Dependency information for a single source file.
///
/// `dependencies` holds absolute, normalized paths in the order their
/// directives appear in the source text, and is valid exactly as of
/// `last_scanned`: when the file's on-disk write time still equals the
/// stamp, a rescan is skipped entirely. The effective-modified-time
/// slot is a per-session memo and is never persisted.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub(crate) path: PathBuf,
    pub(crate) last_scanned: DateTime<Utc>,
    pub(crate) dependencies: Vec<PathBuf>,
    pub(crate) effective_modified_time: Option<DateTime<Utc>>,
}

impl FileRecord {
    /// Creates an empty record for `path` that has never been scanned.
    ///
    /// The scan stamp starts at the Unix epoch, which no real source
    /// file's write time matches, so the first `update` always scans.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            last_scanned: DateTime::UNIX_EPOCH,
            dependencies: Vec::new(),
            effective_modified_time: None,
        }
    }

    /// Rebuilds a record from its persisted parts.
    pub fn from_parts(
        path: PathBuf,
        last_scanned: DateTime<Utc>,
        dependencies: Vec<PathBuf>,
    ) -> Self {
        Self {
            path,
            last_scanned,
            dependencies,
            effective_modified_time: None,
        }
    }

    /// The file this record describes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the dependency list was last extracted.
    pub fn last_scanned(&self) -> DateTime<Utc> {
        self.last_scanned
    }

    /// The files this file depends on, in directive order.
    pub fn dependencies(&self) -> &[PathBuf] {
        &self.dependencies
    }

    /// The memoized effective modified time, if one has been computed
    /// within the owning graph's lifetime.
    pub fn effective_modified_time(&self) -> Option<DateTime<Utc>> {
        self.effective_modified_time
    }

    /// Refreshes the dependency list from the file's current content.
    ///
    /// Skipped entirely, with no I/O, when `current_write_time` equals
    /// the recorded scan stamp. Otherwise the full content is read,
    /// every reference directive is resolved against the file's own
    /// directory into a normalized absolute path, and the dependency
    /// list is replaced in text order. Returns `Ok(true)` when the
    /// record was rescanned. Read failures propagate; the caller
    /// decides what a failed scan means for freshness.
    pub fn update(&mut self, current_write_time: DateTime<Utc>) -> Result<bool, ScanError> {
        if self.last_scanned == current_write_time {
            return Ok(false);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| ScanError::Read {
            path: self.path.clone(),
            source,
        })?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new(""));

        self.dependencies.clear();
        for capture in REFERENCE_DIRECTIVE.captures_iter(&content) {
            let referenced = Path::new(&capture[1]);
            self.dependencies.push(normalize_path(&dir.join(referenced)));
        }

        self.last_scanned = current_write_time;
        Ok(true)
    }
}
