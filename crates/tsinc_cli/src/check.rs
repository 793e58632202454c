//! `tsinc check` — dry-run staleness report.
//!
//! Runs the same decision pass as `tsinc build` but never invokes the
//! compiler; the stale set is printed as text or JSON instead. The
//! refreshed dependency cache is still persisted, so a later build
//! starts warm.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tsinc_analysis::{compile_incremental, ConsoleLog};

use crate::pipeline::{batch_options, discover_source_files, resolve_project_root};
use crate::{config, CheckArgs, GlobalArgs, ReportFormat};

/// Machine-readable staleness report for `--format json`.
#[derive(Serialize)]
struct CheckReport<'a> {
    /// Total number of inputs considered.
    total: usize,
    /// Inputs that would be recompiled, in input order.
    stale: &'a [PathBuf],
    /// Every output path the batch produces.
    outputs: Vec<&'a Path>,
}

/// Runs the `tsinc check` command.
///
/// Returns exit code 0 whether or not anything is stale; staleness is
/// the report, not an error.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = config::load_config(&project_dir)?;

    let src_dir = project_dir.join(&config.build.src_dir);
    let inputs = if src_dir.is_dir() {
        discover_source_files(&src_dir)?
    } else {
        Vec::new()
    };

    if inputs.is_empty() {
        eprintln!("error: no TypeScript sources found in {}", src_dir.display());
        return Ok(1);
    }

    let options = batch_options(&config, &project_dir);
    let log = ConsoleLog::new(global.quiet, global.verbose);
    let outcome = compile_incremental(&inputs, &options, &log, |_| true)?;

    match args.format {
        ReportFormat::Text => {
            for path in &outcome.recompiled {
                println!("{}", path.display());
            }
            if !global.quiet {
                eprintln!(
                    "   {} of {} file(s) out of date",
                    outcome.recompiled.len(),
                    inputs.len()
                );
            }
        }
        ReportFormat::Json => {
            let report = CheckReport {
                total: inputs.len(),
                stale: &outcome.recompiled,
                outputs: outcome.generated(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(0)
}
