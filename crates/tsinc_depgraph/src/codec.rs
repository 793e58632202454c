//! Line-oriented persistence for the dependency graph.
//!
//! The on-disk format trades generality for load latency: a record
//! count, then for each record its path, RFC 3339 scan stamp,
//! dependency count, and dependency paths, one item per line. Parsing
//! is strict and positional; any deviation aborts the whole load so the
//! caller can fall back to an empty graph instead of trusting a
//! half-read cache.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tsinc_common::PathKey;

use crate::error::CodecError;
use crate::graph::DependencyGraph;
use crate::record::FileRecord;

impl DependencyGraph {
    /// Loads a graph from the cache file at `path`.
    ///
    /// Any I/O or parse failure aborts the load; the caller substitutes
    /// an empty graph and proceeds with a full scan.
    pub fn load(path: &Path) -> Result<Self, CodecError> {
        let file = File::open(path).map_err(|source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses a graph from a buffered reader.
    ///
    /// The freshly parsed graph reports `is_modified() == false`.
    /// Content past the declared record count is ignored.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, CodecError> {
        let mut lines = LineReader::new(reader);
        let record_count = lines.next_count("record count")?;

        let mut graph = DependencyGraph::new();
        for _ in 0..record_count {
            let path = PathBuf::from(lines.next_line("record path")?);

            let stamp_text = lines.next_line("scan time")?;
            let last_scanned = DateTime::parse_from_rfc3339(&stamp_text)
                .map(|stamp| stamp.with_timezone(&Utc))
                .map_err(|e| lines.parse_error(format!("invalid scan time: {e}")))?;

            let dependency_count = lines.next_count("dependency count")?;
            let mut dependencies = Vec::with_capacity(dependency_count);
            for _ in 0..dependency_count {
                dependencies.push(PathBuf::from(lines.next_line("dependency path")?));
            }

            let key = PathKey::new(&path);
            let record = FileRecord::from_parts(path, last_scanned, dependencies);
            if graph.records.insert(key, record).is_some() {
                return Err(lines.parse_error("duplicate record path".to_string()));
            }
        }

        graph.modified = false;
        Ok(graph)
    }

    /// Saves the graph to the cache file at `path`.
    ///
    /// The parent directory is created if it does not exist yet.
    pub fn save(&self, path: &Path) -> Result<(), CodecError> {
        let io_error = |source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        self.write_to(&mut writer).map_err(io_error)?;
        writer.flush().map_err(io_error)
    }

    /// Writes the graph in the line-oriented cache format.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.records.len())?;
        for record in self.records.values() {
            writeln!(writer, "{}", record.path.display())?;
            writeln!(
                writer,
                "{}",
                record.last_scanned.to_rfc3339_opts(SecondsFormat::Nanos, true)
            )?;
            writeln!(writer, "{}", record.dependencies.len())?;
            for dependency in &record.dependencies {
                writeln!(writer, "{}", dependency.display())?;
            }
        }
        Ok(())
    }
}

/// Sequential line reader that tracks position for error reporting.
struct LineReader<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }

    fn next_line(&mut self, expected: &str) -> Result<String, CodecError> {
        let mut buffer = String::new();
        let read = self
            .reader
            .read_line(&mut buffer)
            .map_err(|source| CodecError::Stream {
                line: self.line + 1,
                source,
            })?;
        self.line += 1;
        if read == 0 {
            return Err(self.parse_error(format!("unexpected end of file, expected {expected}")));
        }
        while buffer.ends_with('\n') || buffer.ends_with('\r') {
            buffer.pop();
        }
        Ok(buffer)
    }

    fn next_count(&mut self, expected: &str) -> Result<usize, CodecError> {
        let text = self.next_line(expected)?;
        text.trim()
            .parse()
            .map_err(|_| self.parse_error(format!("invalid {expected}: '{text}'")))
    }

    fn parse_error(&self, reason: String) -> CodecError {
        CodecError::Parse {
            line: self.line,
            reason,
        }
    }
}
