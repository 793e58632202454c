//! External TypeScript compiler invocation.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::CompilerSection;

/// Runs the configured compiler over `inputs`.
///
/// Returns `true` when the compiler exits successfully. An empty input
/// set is vacuously successful and the tool is not spawned at all.
/// Spawn failures are reported on stderr and count as a failed build,
/// not a panic.
pub fn compile(
    config: &CompilerSection,
    out_dir: Option<&Path>,
    out_file: Option<&Path>,
    inputs: &[PathBuf],
    quiet: bool,
) -> bool {
    if inputs.is_empty() {
        if !quiet {
            eprintln!("   Everything up to date");
        }
        return true;
    }

    let program = resolve_tool(config);
    let mut command = Command::new(&program);
    if let Some(dir) = out_dir {
        command.arg("--outDir").arg(dir);
    }
    if let Some(file) = out_file {
        command.arg("--out").arg(file);
    }
    command.args(&config.args);
    command.args(inputs);

    if !quiet {
        eprintln!(
            "   Compiling {} file(s) with {}",
            inputs.len(),
            program.display()
        );
    }

    match command.status() {
        Ok(status) => status.success(),
        Err(e) => {
            eprintln!("error: could not run {}: {e}", program.display());
            false
        }
    }
}

/// Resolves the compiler executable from the configured tool directory
/// and executable name.
pub fn resolve_tool(config: &CompilerSection) -> PathBuf {
    match &config.tool_path {
        Some(dir) => Path::new(dir).join(&config.tool_exe),
        None => PathBuf::from(&config.tool_exe),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_resolution_prefers_the_configured_directory() {
        let config = CompilerSection {
            tool_exe: "tsc".to_string(),
            tool_path: Some("/opt/ts/bin".to_string()),
            args: Vec::new(),
        };
        assert_eq!(resolve_tool(&config), PathBuf::from("/opt/ts/bin/tsc"));
    }

    #[test]
    fn tool_resolution_falls_back_to_path_lookup() {
        let config = CompilerSection::default();
        assert_eq!(resolve_tool(&config), PathBuf::from("tsc"));
    }

    #[test]
    fn empty_input_set_succeeds_without_spawning() {
        // The configured tool does not exist; an empty batch must not try it.
        let config = CompilerSection {
            tool_exe: "definitely-not-a-real-compiler".to_string(),
            tool_path: None,
            args: Vec::new(),
        };
        assert!(compile(&config, None, None, &[], true));
    }

    #[test]
    fn missing_tool_fails_the_build() {
        let config = CompilerSection {
            tool_exe: "definitely-not-a-real-compiler".to_string(),
            tool_path: None,
            args: Vec::new(),
        };
        let inputs = vec![PathBuf::from("/src/a.ts")];
        assert!(!compile(&config, None, None, &inputs, true));
    }

    #[test]
    fn true_binary_counts_as_success() {
        // `true` ignores its arguments and exits 0, standing in for a
        // well-behaved compiler.
        let config = CompilerSection {
            tool_exe: "true".to_string(),
            tool_path: None,
            args: Vec::new(),
        };
        let inputs = vec![PathBuf::from("/src/a.ts")];
        assert!(compile(&config, Some(Path::new("/out")), None, &inputs, true));
    }

    #[test]
    fn false_binary_counts_as_failure() {
        let config = CompilerSection {
            tool_exe: "false".to_string(),
            tool_path: None,
            args: Vec::new(),
        };
        let inputs = vec![PathBuf::from("/src/a.ts")];
        assert!(!compile(&config, None, None, &inputs, true));
    }
}
