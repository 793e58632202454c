//! Filesystem timestamp helpers.

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};

/// Reads the last-write time of `path` as a UTC timestamp.
///
/// Errors are returned to the caller rather than mapped to a default:
/// a file whose write time cannot be read has no determinable
/// freshness, and the caller owns that policy.
pub fn modified_time(path: &Path) -> io::Result<DateTime<Utc>> {
    let metadata = std::fs::metadata(path)?;
    Ok(DateTime::<Utc>::from(metadata.modified()?))
}
