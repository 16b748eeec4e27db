use crate::config::types::{
    ConfigFile, LoggingConfig, MacroConfig, Profile, ResolvedConfig, RunnerConfig,
    RunnerSection,
};
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("no profiles defined in config")]
    NoProfiles,

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and resolve the configuration.
    ///
    /// An explicit `config_path` must exist. Without one, the default location
    /// is tried and the built-in defaults are used when nothing is there.
    pub fn load(
        config_path: Option<&Path>,
        profile_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = default_config_path();
                if !default.exists() {
                    tracing::debug!(
                        "no config at {}, using built-in defaults",
                        default.display()
                    );
                    return Self::builtin(profile_override);
                }
                default
            }
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        Self::resolve_file(cf, profile_override)
    }

    fn resolve_file(
        cf: ConfigFile,
        profile_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }
        if cf.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        let active = profile_override
            .map(ToOwned::to_owned)
            .or(cf.profile.clone())
            .unwrap_or_else(|| "default".to_string());

        let prof = cf
            .profiles
            .get(&active)
            .ok_or_else(|| ConfigError::ProfileNotFound(active.clone()))?;

        Self::resolve_profile(&active, prof, &cf.runner, &cf.macros, &cf.logging)
    }

    fn builtin(profile_override: Option<&str>) -> Result<ResolvedConfig, ConfigError> {
        let active = profile_override.unwrap_or("default");
        if active != "default" {
            return Err(ConfigError::ProfileNotFound(active.to_string()));
        }
        let prof = Profile {
            templates_dir: "templates".to_string(),
            scripts_dir: "scripts".to_string(),
            query_command: "psql -v ON_ERROR_STOP=1".to_string(),
            environments: Vec::new(),
        };
        Self::resolve_profile(
            active,
            &prof,
            &RunnerSection::default(),
            &MacroConfig::default(),
            &LoggingConfig::default(),
        )
    }

    fn resolve_profile(
        active: &str,
        prof: &Profile,
        runner: &RunnerSection,
        macros: &MacroConfig,
        log_cfg: &LoggingConfig,
    ) -> Result<ResolvedConfig, ConfigError> {
        let templates_dir = expand_path(&prof.templates_dir)?;
        let sub =
            |s: &str| s.replace("{{templates_dir}}", &templates_dir.to_string_lossy());

        let scripts_dir = expand_path(&sub(&prof.scripts_dir))?;

        let debug_log = match &runner.debug_log {
            Some(file) => expand_path(&sub(&file.to_string_lossy()))?,
            None => default_debug_log_path(),
        };

        let logging = if let Some(ref file) = log_cfg.file {
            let expanded_file = expand_path(&sub(&file.to_string_lossy()))?;
            LoggingConfig {
                level: log_cfg.level.clone(),
                file_level: log_cfg.file_level.clone(),
                file: Some(expanded_file),
            }
        } else {
            log_cfg.clone()
        };

        Ok(ResolvedConfig {
            active_profile: active.to_string(),
            templates_dir,
            scripts_dir,
            query_command: prof.query_command.clone(),
            environments: prof.environments.clone(),
            runner: RunnerConfig { debug: runner.debug, diagnostic: runner.diagnostic },
            debug_log,
            macros: macros.clone(),
            logging,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("provisio").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("provisio").join("config.toml")
}

/// Default transcript location: the platform state dir, then local data, then tmp.
pub fn default_debug_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(env::temp_dir)
        .join("provisio")
        .join("debug.log")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}
