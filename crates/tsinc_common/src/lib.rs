//! Shared foundational types for the tsinc build tool.
//!
//! This crate provides case-insensitive path keys, lexical path
//! normalization, and filesystem timestamp helpers used by the
//! dependency graph and the recompile decision layer.

#![warn(missing_docs)]

pub mod path;
pub mod time;

pub use path::{normalize_path, PathKey};
pub use time::modified_time;
