//! Configuration management for EasyPass
//!
//! Application config (where data lives, how loud logging is). User-facing
//! preferences such as clipboard timeout live in `settings.json` instead and
//! are owned by the credential store.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths::Paths;
use crate::DEFAULT_APP_NAME;

/// Environment variable overriding the data directory
pub const ENV_DATA_DIR: &str = "EASYPASS_DATA_DIR";

/// Environment variable overriding the log filter
pub const ENV_LOG: &str = "EASYPASS_LOG";

/// Global EasyPass configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Application name, used as the data directory name
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Explicit data directory (skips platform resolution)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// tracing filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            data_dir: None,
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Load the config file from the default data directory, then apply
    /// environment overrides
    pub fn discover() -> Result<Self> {
        let paths = Paths::new(DEFAULT_APP_NAME);
        let mut config = Self::load(&paths.config_file())?;
        config.apply_overrides(
            std::env::var(ENV_DATA_DIR).ok(),
            std::env::var(ENV_LOG).ok(),
        );
        Ok(config)
    }

    /// Apply override values; empty strings are ignored
    pub fn apply_overrides(&mut self, data_dir: Option<String>, log_filter: Option<String>) {
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(filter) = log_filter.filter(|f| !f.trim().is_empty()) {
            self.log_filter = filter;
        }
    }

    /// Paths this config points at
    pub fn paths(&self) -> Paths {
        match &self.data_dir {
            Some(dir) => Paths::with_data_dir(dir),
            None => Paths::new(&self.app_name),
        }
    }
}
