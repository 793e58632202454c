//! Shared helpers for CLI commands: project root resolution, source
//! discovery, and input path preparation.

use std::path::{Path, PathBuf};

use tsinc_analysis::BatchOptions;
use tsinc_common::normalize_path;

use crate::config::ProjectConfig;
use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing
/// `tsinc.toml`.
///
/// Returns the directory containing `tsinc.toml`, or an error if none
/// is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join("tsinc.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find tsinc.toml in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir,
/// dir → itself). Otherwise walks up from the current directory looking
/// for `tsinc.toml`. The result is always absolute so that every input
/// path derived from it is absolute too.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let root = if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        } else {
            p
        }
    } else {
        find_project_root(&std::env::current_dir()?)?
    };
    absolute_path(&root)
}

/// Discovers TypeScript source files in the given directory (recursive).
///
/// Returns every `.ts` file — declaration files included, since they
/// participate in the batch even though they produce no output — sorted
/// by path.
pub fn discover_source_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files)?;
    files.sort();
    Ok(files)
}

/// Recursively walks a directory collecting TypeScript source files.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if is_typescript_source(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Returns `true` for files with a `.ts` extension.
pub fn is_typescript_source(path: &Path) -> bool {
    matches!(path.extension().and_then(|ext| ext.to_str()), Some("ts"))
}

/// Converts a possibly-relative path into a normalized absolute one
/// without requiring the file to exist.
pub fn absolute_path(path: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    Ok(normalize_path(&std::path::absolute(path)?))
}

/// Builds the driver options from the configuration, anchoring every
/// configured path at the project root.
pub fn batch_options(config: &ProjectConfig, project_dir: &Path) -> BatchOptions {
    BatchOptions {
        out_dir: config.build.out_dir.as_deref().map(|p| anchor(project_dir, p)),
        out_file: config.build.out_file.as_deref().map(|p| anchor(project_dir, p)),
        cache_file: config
            .build
            .dependency_cache
            .as_deref()
            .map(|p| anchor(project_dir, p)),
    }
}

fn anchor(project_dir: &Path, relative: &str) -> PathBuf {
    normalize_path(&project_dir.join(relative))
}
