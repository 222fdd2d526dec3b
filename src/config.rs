use crate::core::{HospitalError, Result};
use crate::results_grid::OutputFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Database file used when nothing else is configured.
pub const DEFAULT_DATABASE_PATH: &str = "HospitalInfo.db";

/// Top-level configuration structure parsed from a TOML file.
///
/// Every section is optional; missing values fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub output: OutputConfig,
    pub input: InputConfig,
}

/// Database location.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

/// How result sets are printed.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Validation of console input.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Reject experience values that are not a whole number of years
    pub strict_experience: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            strict_experience: true,
        }
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = hospitaldb::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| HospitalError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    parse_config(&content)
}

/// Parses configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| HospitalError::Config(e.to_string()))
}

/// Location of the per-user configuration file, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hospitaldb").join("config.toml"))
}

/// Resolves the configuration for a run.
///
/// An explicit path must exist. Without one the per-user file is used when
/// present, and the built-in defaults otherwise.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        debug!("Loading configuration from {:?}", path);
        return load_config(path);
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            debug!("Loading configuration from {:?}", path);
            load_config(path)
        }
        _ => {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}
