//! End-to-end incremental batch driver.
//!
//! Owns the session lifecycle around one compiler invocation:
//! 1. Validate the output configuration
//! 2. Load the persisted dependency cache (or start cold)
//! 3. Resolve the input → output mapping
//! 4. Collect the stale subset via the dependency graph
//! 5. Hand the subset to the compile callback, exactly once
//! 6. Persist the cache if anything in it changed
//!
//! Cache trouble never fails the batch: a cache that cannot be read
//! degrades to a full scan, a cache that cannot be written degrades to
//! a cold start next time, and both merely surface warnings.

use std::path::{Path, PathBuf};

use tsinc_common::PathKey;
use tsinc_depgraph::DependencyGraph;

use crate::consider::recompile_set;
use crate::log::BuildLog;
use crate::output::{output_mapping, OutputTarget};

/// Options for one incremental batch.
#[derive(Clone, Debug, Default)]
pub struct BatchOptions {
    /// Directory receiving compiled outputs. Mutually exclusive with
    /// `out_file`.
    pub out_dir: Option<PathBuf>,

    /// Single merged output file. Mutually exclusive with `out_dir`.
    pub out_file: Option<PathBuf>,

    /// Path of the persisted dependency cache. When absent, caching is
    /// disabled and the dependency graph lives only for this run.
    pub cache_file: Option<PathBuf>,
}

/// Fatal errors for a batch. Everything else degrades.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Both an output directory and a merged output file were supplied.
    #[error("out_dir and out_file are mutually exclusive; configure only one")]
    ConflictingOutputs,
}

/// Result of one incremental batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Whether the compile callback reported success.
    pub success: bool,

    /// The inputs that were handed to the compiler, in input order.
    pub recompiled: Vec<PathBuf>,

    /// The full input → output mapping, in input order, regardless of
    /// which inputs were actually recompiled this run.
    pub mapping: Vec<(PathBuf, Option<PathBuf>)>,
}

impl BatchOutcome {
    /// The complete list of output paths the batch produces, reported
    /// whether or not each file was rebuilt this run.
    pub fn generated(&self) -> Vec<&Path> {
        self.mapping
            .iter()
            .filter_map(|(_, output)| output.as_deref())
            .collect()
    }
}

/// Runs one incremental batch over `inputs`.
///
/// `compile` is invoked exactly once with the stale subset (possibly
/// empty); its result becomes the batch's own success. The cache is
/// saved on every path past validation, but only when the graph
/// actually changed, so an untouched cache file is never rewritten.
pub fn compile_incremental(
    inputs: &[PathBuf],
    options: &BatchOptions,
    log: &dyn BuildLog,
    compile: impl FnOnce(&[PathBuf]) -> bool,
) -> Result<BatchOutcome, BatchError> {
    let target = resolve_target(options)?;
    let mut graph = load_graph(options.cache_file.as_deref(), log);

    let mapping = output_mapping(inputs, &target);
    let outputs: std::collections::HashMap<PathKey, Option<PathBuf>> = mapping
        .iter()
        .map(|(input, output)| (PathKey::new(input), output.clone()))
        .collect();
    let output_for = move |path: &Path| outputs.get(&PathKey::new(path)).cloned().flatten();

    let recompiled = recompile_set(&mut graph, inputs, log, &output_for);
    let success = compile(&recompiled);

    if let Some(cache_file) = options.cache_file.as_deref() {
        if graph.is_modified() {
            if let Err(error) = graph.save(cache_file) {
                log.warning(&format!(
                    "could not save dependency cache {}: {error}",
                    cache_file.display()
                ));
            }
        }
    }

    Ok(BatchOutcome {
        success,
        recompiled,
        mapping,
    })
}

/// Resolves the output target, rejecting conflicting settings.
fn resolve_target(options: &BatchOptions) -> Result<OutputTarget, BatchError> {
    match (&options.out_dir, &options.out_file) {
        (Some(_), Some(_)) => Err(BatchError::ConflictingOutputs),
        (Some(dir), None) => Ok(OutputTarget::Directory(dir.clone())),
        (None, Some(file)) => Ok(OutputTarget::SingleFile(file.clone())),
        (None, None) => Ok(OutputTarget::InPlace),
    }
}

/// Loads the cache, degrading to an empty graph on any failure.
fn load_graph(cache_file: Option<&Path>, log: &dyn BuildLog) -> DependencyGraph {
    let Some(cache_file) = cache_file else {
        return DependencyGraph::new();
    };
    match DependencyGraph::load(cache_file) {
        Ok(graph) => graph,
        Err(error) => {
            log.warning(&format!(
                "could not load dependency cache {}: {error}; starting with a full scan",
                cache_file.display()
            ));
            DependencyGraph::new()
        }
    }
}
