//! `tsinc.toml` loading and validation.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading or validating a `tsinc.toml`
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Both an output directory and a merged output file were configured.
    #[error("build.out_dir and build.out_file are mutually exclusive; configure only one")]
    ConflictingOutputs,
}

/// Parsed `tsinc.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// `[project]` section.
    #[serde(default)]
    pub project: ProjectSection,

    /// `[build]` section.
    #[serde(default)]
    pub build: BuildSection,

    /// `[compiler]` section.
    #[serde(default)]
    pub compiler: CompilerSection,
}

/// The `[project]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectSection {
    /// Project name (required).
    #[serde(default)]
    pub name: String,

    /// Project version string.
    #[serde(default)]
    pub version: String,
}

/// The `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Directory searched for `.ts` sources, relative to the project
    /// root.
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Directory receiving compiled `.js` outputs. Mutually exclusive
    /// with `out_file`.
    pub out_dir: Option<String>,

    /// Single merged output file. Mutually exclusive with `out_dir`.
    pub out_file: Option<String>,

    /// Path of the persisted dependency cache, relative to the project
    /// root. When absent, dependency caching is disabled.
    pub dependency_cache: Option<String>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            out_dir: None,
            out_file: None,
            dependency_cache: None,
        }
    }
}

/// The `[compiler]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerSection {
    /// Compiler executable name.
    #[serde(default = "default_tool_exe")]
    pub tool_exe: String,

    /// Directory containing the compiler executable. When absent, the
    /// executable is resolved through `PATH`.
    pub tool_path: Option<String>,

    /// Extra arguments appended to every compiler invocation.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            tool_exe: default_tool_exe(),
            tool_path: None,
            args: Vec::new(),
        }
    }
}

fn default_src_dir() -> String {
    "src".to_string()
}

fn default_tool_exe() -> String {
    "tsc".to_string()
}

/// Loads and validates a `tsinc.toml` configuration from a project
/// directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join("tsinc.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `tsinc.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates required fields and mutually exclusive settings.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.build.out_dir.is_some() && config.build.out_file.is_some() {
        return Err(ConfigError::ConflictingOutputs);
    }
    Ok(())
}
