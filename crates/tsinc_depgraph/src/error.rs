//! Error types for dependency scanning and cache persistence.

use std::path::PathBuf;

/// Errors raised while refreshing a file's dependency information.
///
/// These propagate out of the effective-modified-time computation
/// unchanged; the decision layer catches them at its boundary and
/// converts them into a "must recompile" answer. Nothing inside the
/// graph swallows them.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The file's write time could not be read.
    #[error("could not stat {path}: {source}")]
    Stat {
        /// The file whose metadata was requested.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file's content could not be read while extracting directives.
    #[error("could not read {path}: {source}")]
    Read {
        /// The file being scanned.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised while loading or saving the persisted dependency cache.
///
/// A load error aborts the entire load and the caller falls back to an
/// empty graph; a save error leaves the on-disk cache untouched.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// An I/O failure while opening, creating, or writing the cache file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The cache file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An I/O failure while reading from the cache stream.
    #[error("cache read error at line {line}: {source}")]
    Stream {
        /// The 1-based line at which reading failed.
        line: usize,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The cache text did not match the expected line format.
    #[error("cache parse error at line {line}: {reason}")]
    Parse {
        /// The 1-based line at which parsing failed.
        line: usize,
        /// Description of the mismatch.
        reason: String,
    },
}
