//! `tsinc build` — incremental compile of stale sources.
//!
//! Orchestrates one build session:
//! 1. Resolve the project root and load `tsinc.toml`
//! 2. Discover the input files (or take them from the command line)
//! 3. Run the incremental decision pass against the dependency cache
//! 4. Invoke the TypeScript compiler on the stale subset
//! 5. Persist the refreshed cache

use std::path::Path;

use tsinc_analysis::{compile_incremental, ConsoleLog};

use crate::pipeline::{
    absolute_path, batch_options, discover_source_files, resolve_project_root,
};
use crate::{compiler, config, BuildArgs, GlobalArgs};

/// Runs the `tsinc build` command.
///
/// Returns exit code 0 on success, 1 on a failed or misconfigured
/// build.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = config::load_config(&project_dir)?;

    if !global.quiet {
        if config.project.version.is_empty() {
            eprintln!("   Building {}", config.project.name);
        } else {
            eprintln!(
                "   Building {} v{}",
                config.project.name, config.project.version
            );
        }
    }

    let inputs = if args.files.is_empty() {
        let src_dir = project_dir.join(&config.build.src_dir);
        if src_dir.is_dir() {
            discover_source_files(&src_dir)?
        } else {
            Vec::new()
        }
    } else {
        args.files
            .iter()
            .map(|file| absolute_path(Path::new(file)))
            .collect::<Result<Vec<_>, _>>()?
    };

    if inputs.is_empty() {
        eprintln!(
            "error: no TypeScript sources found in {}",
            project_dir.join(&config.build.src_dir).display()
        );
        return Ok(1);
    }

    let options = batch_options(&config, &project_dir);
    let log = ConsoleLog::new(global.quiet, global.verbose);

    let out_dir = options.out_dir.clone();
    let out_file = options.out_file.clone();
    let compiler_config = &config.compiler;
    let quiet = global.quiet;

    let outcome = compile_incremental(&inputs, &options, &log, |stale| {
        compiler::compile(
            compiler_config,
            out_dir.as_deref(),
            out_file.as_deref(),
            stale,
            quiet,
        )
    })?;

    if !global.quiet {
        eprintln!(
            "   Recompiled {} of {} file(s)",
            outcome.recompiled.len(),
            inputs.len()
        );
        eprintln!("   Outputs: {} file(s)", outcome.generated().len());
        if outcome.success {
            eprintln!("   Build complete.");
        }
    }

    Ok(if outcome.success { 0 } else { 1 })
}
