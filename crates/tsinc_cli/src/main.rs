//! tsinc CLI — incremental build driver for the TypeScript compiler.
//!
//! Provides `tsinc build` to recompile only the sources whose outputs
//! are stale, and `tsinc check` to report what would be recompiled
//! without invoking the compiler.

#![warn(missing_docs)]

mod build;
mod check;
mod compiler;
mod config;
mod pipeline;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// tsinc — incremental TypeScript recompilation.
#[derive(Parser, Debug)]
#[command(name = "tsinc", version, about = "Incremental TypeScript build driver")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show per-file recompilation rationale.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `tsinc.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the sources whose outputs are stale.
    Build(BuildArgs),
    /// Report which sources would be recompiled, without compiling.
    Check(CheckArgs),
}

/// Arguments for the `tsinc build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Specific input files. When omitted, the configured source
    /// directory is searched for `.ts` files.
    pub files: Vec<String>,
}

/// Arguments for the `tsinc check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Output format for the staleness report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Staleness report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print per-file rationale.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
