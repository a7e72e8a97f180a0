//! `ctxdb.toml` loading.
//!
//! ```toml
//! [database]
//! key = "prisma"
//! scoped = false
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Both tables are optional; missing values take the defaults shown above.

use std::io;
use std::path::Path;
use std::sync::Arc;

use ctxdb_core::logging::{init_logger, LogLevel};
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::options::BindingSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config failed validation: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub database: BindingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub level: LogLevel,
}

pub struct SettingsLoader {
    settings: Arc<Settings>,
}

impl SettingsLoader {
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(Self {
            settings: Arc::new(settings),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn binding(&self) -> &BindingSettings {
        &self.settings.database
    }

    /// Install the process logger at the configured level.
    pub fn init_logging(&self) -> bool {
        init_logger(self.settings.logging.level)
    }
}
