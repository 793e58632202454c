//! The dependency graph and its memoized effective-modified-time query.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use tsinc_common::{modified_time, PathKey};

use crate::error::ScanError;
use crate::record::FileRecord;

/// Session-scoped dependency graph over a batch of source files.
///
/// Records are created lazily the first time a path is queried, so the
/// graph only ever holds files that some decision actually touched. The
/// modified flag tracks whether any record was created or updated since
/// the graph was loaded; an unchanged cache is never rewritten.
///
/// One graph instance belongs to one build invocation. Lookup-or-create
/// and the provisional memo write below are plain check-then-act
/// sequences with no internal locking; the graph must not be shared
/// across threads.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    pub(crate) records: BTreeMap<PathKey, FileRecord>,
    pub(crate) modified: bool,
}

impl DependencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files currently tracked.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no files are tracked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if any record was created or updated since load.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Looks up the record for `path`, if one exists.
    pub fn record(&self, path: &Path) -> Option<&FileRecord> {
        self.records.get(&PathKey::new(path))
    }

    /// Iterates over all records in key order.
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.values()
    }

    /// Fetches the record for `path`, creating an empty one on first use.
    ///
    /// Creation marks the graph modified. The returned record's
    /// dependencies may be stale; [`FileRecord::update`] refreshes them.
    pub fn lookup_or_create(&mut self, path: &Path) -> &mut FileRecord {
        let key = PathKey::new(path);
        if !self.records.contains_key(&key) {
            self.modified = true;
        }
        self.records
            .entry(key)
            .or_insert_with(|| FileRecord::new(path))
    }

    /// Computes the effective modified time of `path`: the most recent
    /// write time of the file itself or any of its transitive
    /// dependencies.
    ///
    /// The memo slot is written with the file's own write time *before*
    /// any dependency is visited. A dependency cycle that re-enters this
    /// path reads that provisional value instead of recursing forever;
    /// this write order is the termination guarantee, not an
    /// optimization to be reordered. Once set, the memo is never
    /// recomputed for the lifetime of the graph instance.
    ///
    /// A path that cannot be stat'd has no determinable freshness, so
    /// the error propagates; the same goes for a file that cannot be
    /// read while rescanning its directives.
    pub fn effective_modified_time(&mut self, path: &Path) -> Result<DateTime<Utc>, ScanError> {
        if let Some(memoized) = self.lookup_or_create(path).effective_modified_time {
            return Ok(memoized);
        }

        let own_time = modified_time(path).map_err(|source| ScanError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        let record = self.lookup_or_create(path);
        record.effective_modified_time = Some(own_time);
        let rescanned = record.update(own_time)?;
        let dependencies = record.dependencies.clone();
        if rescanned {
            self.modified = true;
        }

        let mut newest = own_time;
        for dependency in &dependencies {
            let dependency_time = self.effective_modified_time(dependency)?;
            if dependency_time > newest {
                newest = dependency_time;
            }
        }

        self.lookup_or_create(path).effective_modified_time = Some(newest);
        Ok(newest)
    }
}
