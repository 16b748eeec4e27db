use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub runner: RunnerSection,
    #[serde(default)]
    pub macros: MacroConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub templates_dir: String,
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,
    /// Command that receives one rendered query on stdin.
    #[serde(default = "default_query_command")]
    pub query_command: String,
    /// Environments offered as a single-choice question before provisioning.
    #[serde(default)]
    pub environments: Vec<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RunnerSection {
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub diagnostic: bool,
    #[serde(default)]
    pub debug_log: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MacroConfig {
    /// Extension (without the dot) of files scanned for macros.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Marker after which macros belong to function bodies and are ignored.
    #[serde(default = "default_functions_marker")]
    pub functions_marker: String,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self { extension: default_extension(), functions_marker: default_functions_marker() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_scripts_dir() -> String {
    "scripts".to_string()
}

fn default_query_command() -> String {
    "psql -v ON_ERROR_STOP=1".to_string()
}

fn default_extension() -> String {
    "sql".to_string()
}

fn default_functions_marker() -> String {
    "FUNCTIONS".to_string()
}

/// Flags that change how external commands are run and recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Echo every command and append a transcript to the debug log.
    pub debug: bool,
    /// Never erase echoed output.
    pub diagnostic: bool,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub templates_dir: PathBuf,
    pub scripts_dir: PathBuf,
    pub query_command: String,
    pub environments: Vec<String>,
    pub runner: RunnerConfig,
    pub debug_log: PathBuf,
    pub macros: MacroConfig,
    pub logging: LoggingConfig,
}

impl ResolvedConfig {
    /// Apply command-line overrides for the runner flags.
    #[must_use]
    pub fn with_runner_overrides(mut self, debug: bool, diagnostic: bool) -> Self {
        self.runner.debug |= debug;
        self.runner.diagnostic |= diagnostic;
        self
    }
}
