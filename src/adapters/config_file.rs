//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document.  Missing keys
//! fall back to their defaults, so a file only needs to name what differs
//! from the reference plant.  Configuration is validated on both load and
//! save; an out-of-range value never reaches the supervisor.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SupervisorConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SupervisorConfig, ConfigError> {
        let config = match fs::read_to_string(&self.path) {
            Ok(text) => {
                let cfg: SupervisorConfig = serde_json::from_str(&text)
                    .map_err(|e| ConfigError::Corrupted(e.to_string()))?;
                info!("Config: loaded {}", self.path.display());
                cfg
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("Config: {} not found, using defaults", self.path.display());
                SupervisorConfig::default()
            }
            Err(e) => return Err(ConfigError::IoError(e.kind())),
        };
        config.validate()?;
        Ok(config)
    }

    fn save(&self, config: &SupervisorConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        fs::write(&self.path, text).map_err(|e| ConfigError::IoError(e.kind()))?;
        info!("Config: saved {}", self.path.display());
        Ok(())
    }
}
