//! JSON config file adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document on disk. The path
//! comes from `MNEMON_CONFIG`, defaulting to `mnemon.json` in the working
//! directory. Fields missing from the file take their default values.
//!
//! Validation runs on both load and save; an out-of-range file is
//! rejected whole rather than clamped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

pub const CONFIG_ENV: &str = "MNEMON_CONFIG";
pub const DEFAULT_PATH: &str = "mnemon.json";

pub struct JsonFileConfig {
    path: PathBuf,
}

impl JsonFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `MNEMON_CONFIG`, or [`DEFAULT_PATH`].
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATH));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::IoError,
        })?;
        let config: SystemConfig =
            serde_json::from_str(&text).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        info!("Config: loaded {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        fs::write(&self.path, text).map_err(|_| ConfigError::IoError)?;
        info!("Config: saved {}", self.path.display());
        Ok(())
    }
}
