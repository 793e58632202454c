//! Per-file and whole-batch recompile decisions.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tsinc_common::modified_time;
use tsinc_depgraph::{DependencyGraph, ScanError};

use crate::log::{BuildLog, Importance};

/// Decides whether `path` must be recompiled.
///
/// The decision, in order: an input whose output path cannot be
/// resolved is always recompiled — the user listed it for a reason, and
/// guessing "skip" would silently drop it from the build. An output
/// that does not exist forces a rebuild. Otherwise the file's effective
/// modified time (its own write time or that of any transitive
/// dependency, whichever is newest) is compared against the output's
/// write time, and only a strictly newer input forces a rebuild.
///
/// Every I/O failure along the way — stat failures, unreadable sources
/// while scanning directives — is caught here and answered with `true`:
/// a file whose freshness cannot be determined is rebuilt rather than
/// silently skipped. This function never fails for ordinary I/O
/// trouble.
pub fn consider(
    path: &Path,
    graph: &mut DependencyGraph,
    log: &dyn BuildLog,
    output_for: &dyn Fn(&Path) -> Option<PathBuf>,
) -> bool {
    match try_consider(path, graph, log, output_for) {
        Ok(stale) => stale,
        Err(error) => {
            log.message(
                Importance::Low,
                &format!(
                    "Error accessing {}, assuming recompilation. ({error})",
                    path.display()
                ),
            );
            true
        }
    }
}

fn try_consider(
    path: &Path,
    graph: &mut DependencyGraph,
    log: &dyn BuildLog,
    output_for: &dyn Fn(&Path) -> Option<PathBuf>,
) -> Result<bool, ScanError> {
    let output = match output_for(path) {
        Some(output) => output,
        None => {
            log.message(
                Importance::Low,
                &format!(
                    "Recompile '{}' because it has no resolved output file.",
                    path.display()
                ),
            );
            return Ok(true);
        }
    };

    if !output.exists() {
        log.message(
            Importance::Low,
            &format!(
                "Recompile '{}' because output file '{}' does not exist.",
                path.display(),
                output.display()
            ),
        );
        return Ok(true);
    }

    let effective = graph.effective_modified_time(path)?;
    let output_time = modified_time(&output).map_err(|source| ScanError::Stat {
        path: output.clone(),
        source,
    })?;

    if effective > output_time {
        log.message(
            Importance::Low,
            &format!(
                "Recompile '{}' because output file '{}' is out of date.",
                path.display(),
                output.display()
            ),
        );
        return Ok(true);
    }

    Ok(false)
}

/// Applies [`consider`] to every input, in order, and returns the
/// subset that must be recompiled, preserving the inputs' relative
/// order.
///
/// The graph's memoization is scoped to the whole batch, so a
/// dependency shared by many inputs is scanned and stat'd once no
/// matter how many inputs reference it.
pub fn recompile_set(
    graph: &mut DependencyGraph,
    inputs: &[PathBuf],
    log: &dyn BuildLog,
    output_for: &dyn Fn(&Path) -> Option<PathBuf>,
) -> Vec<PathBuf> {
    let started = Instant::now();
    log.message(Importance::Low, "Finding changed files");

    let mut stale = Vec::new();
    for input in inputs {
        if consider(input, graph, log, output_for) {
            stale.push(input.clone());
        }
    }

    log.message(
        Importance::Low,
        &format!("  Done in {}ms", started.elapsed().as_millis()),
    );
    stale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::MemoryLog;
    use chrono::{DateTime, TimeDelta, Utc};

    fn write_source(dir: &Path, name: &str, references: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut content = String::new();
        for referenced in references {
            content.push_str(&format!("/// <reference path=\"{referenced}\" />\n"));
        }
        content.push_str("\nvar x = 10;\n");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn write_output(path: &Path) {
        std::fs::write(path, "").unwrap();
    }

    fn set_mtime(path: &Path, time: DateTime<Utc>) {
        let file = std::fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(time.into()).unwrap();
    }

    /// Timestamps used by the decision tables: `None` means the file
    /// does not exist.
    fn stamp(current: DateTime<Utc>, offset_hours: i64) -> DateTime<Utc> {
        current + TimeDelta::hours(offset_hours)
    }

    #[test]
    fn standalone_decision_table() {
        // (input offset, output offset or None, expected decision)
        let cases: &[(i64, Option<i64>, bool)] = &[
            (0, None, true),      // output missing
            (0, Some(0), false),  // same time
            (-1, Some(0), false), // output newer
            (1, Some(0), true),   // input newer
        ];

        for (i, (input_offset, output_offset, expected)) in cases.iter().enumerate() {
            let dir = tempfile::tempdir().unwrap();
            let current = Utc::now();

            let input = write_source(dir.path(), "a.ts", &[]);
            set_mtime(&input, stamp(current, *input_offset));

            let output = dir.path().join("a.js");
            if let Some(offset) = output_offset {
                write_output(&output);
                set_mtime(&output, stamp(current, *offset));
            }

            let output_clone = output.clone();
            let output_for = move |_: &Path| Some(output_clone.clone());

            let log = MemoryLog::new();
            let mut graph = DependencyGraph::new();
            let result = consider(&input, &mut graph, &log, &output_for);

            assert_eq!(result, *expected, "mismatch in case {i}");
        }
    }

    #[test]
    fn dependency_decision_table() {
        // (top in, top out, base in, base out, recompile top, recompile base)
        // Offsets in hours from a common instant; None = file missing.
        let cases: &[(i64, Option<i64>, i64, Option<i64>, bool, bool)] = &[
            (0, None, 0, Some(0), true, false),
            (0, Some(-1), 0, Some(0), true, false),
            (0, Some(1), 0, None, false, true),
            (0, Some(0), 1, Some(0), true, true),
            (0, Some(0), -1, Some(-1), false, false),
            (0, Some(1), 1, Some(0), false, true),
        ];

        for (i, (top_in, top_out, base_in, base_out, expect_top, expect_base)) in
            cases.iter().enumerate()
        {
            let dir = tempfile::tempdir().unwrap();
            let current = Utc::now();

            let base = write_source(dir.path(), "base.ts", &[]);
            set_mtime(&base, stamp(current, *base_in));
            let base_output = dir.path().join("base.js");
            if let Some(offset) = base_out {
                write_output(&base_output);
                set_mtime(&base_output, stamp(current, *offset));
            }

            let top = write_source(dir.path(), "top.ts", &["base.ts"]);
            set_mtime(&top, stamp(current, *top_in));
            let top_output = dir.path().join("top.js");
            if let Some(offset) = top_out {
                write_output(&top_output);
                set_mtime(&top_output, stamp(current, *offset));
            }

            let outputs = [
                (top.clone(), top_output.clone()),
                (base.clone(), base_output.clone()),
            ];
            let output_for = move |path: &Path| {
                outputs
                    .iter()
                    .find(|(input, _)| input.as_path() == path)
                    .map(|(_, output)| output.clone())
            };

            let log = MemoryLog::new();
            let mut graph = DependencyGraph::new();
            let top_result = consider(&top, &mut graph, &log, &output_for);
            let base_result = consider(&base, &mut graph, &log, &output_for);
            let stale = recompile_set(
                &mut graph,
                &[base.clone(), top.clone()],
                &log,
                &output_for,
            );

            assert_eq!(top_result, *expect_top, "top mismatch in case {i}");
            assert_eq!(base_result, *expect_base, "base mismatch in case {i}");
            assert_eq!(stale.contains(&top), *expect_top, "set/top mismatch in case {i}");
            assert_eq!(stale.contains(&base), *expect_base, "set/base mismatch in case {i}");
        }
    }

    #[test]
    fn unresolved_output_always_recompiles() {
        let log = MemoryLog::new();
        let mut graph = DependencyGraph::new();
        let result = consider(
            Path::new("/src/anything.ts"),
            &mut graph,
            &log,
            &|_| None,
        );
        assert!(result);
        assert!(log.messages()[0].contains("no resolved output"));
    }

    #[test]
    fn io_failure_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        // The input does not exist, so the freshness check cannot stat it.
        let input = dir.path().join("ghost.ts");
        let output = dir.path().join("ghost.js");
        write_output(&output);

        let output_clone = output.clone();
        let log = MemoryLog::new();
        let mut graph = DependencyGraph::new();
        let result = consider(&input, &mut graph, &log, &move |_| {
            Some(output_clone.clone())
        });

        assert!(result);
        assert!(log.messages().iter().any(|m| m.contains("assuming recompilation")));
    }

    #[test]
    fn recompile_set_preserves_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_source(dir.path(), "a.ts", &[]);
        let b = write_source(dir.path(), "b.ts", &[]);
        let c = write_source(dir.path(), "c.ts", &[]);

        // Outputs exist only for b; a and c are stale.
        let now = Utc::now();
        let b_output = dir.path().join("b.js");
        write_output(&b_output);
        set_mtime(&b, now - TimeDelta::hours(1));
        set_mtime(&b_output, now);

        let output_for = |path: &Path| Some(path.with_extension("js"));

        let log = MemoryLog::new();
        let mut graph = DependencyGraph::new();
        let inputs = vec![c.clone(), a.clone(), b.clone()];
        let stale = recompile_set(&mut graph, &inputs, &log, &output_for);

        assert_eq!(stale, vec![c, a]);
    }
}
