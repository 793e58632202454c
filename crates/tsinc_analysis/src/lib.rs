//! Recompile decisions for batches of TypeScript sources.
//!
//! Builds on the dependency graph to answer, per input file, "is the
//! compiled output up to date?" — and drives a whole batch end to end:
//! resolve output paths, collect the stale subset, hand it to the
//! compiler callback, and persist the refreshed dependency cache.

#![warn(missing_docs)]

pub mod consider;
pub mod driver;
pub mod log;
pub mod output;

pub use consider::{consider, recompile_set};
pub use driver::{compile_incremental, BatchError, BatchOptions, BatchOutcome};
pub use log::{BuildLog, ConsoleLog, Importance, LogEntry, MemoryLog};
pub use output::{common_prefix, output_for, output_mapping, OutputTarget};
