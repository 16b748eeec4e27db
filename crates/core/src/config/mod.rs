//! Configuration loading and resolved settings.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path};
pub use types::{ResolvedConfig, RunnerConfig};
