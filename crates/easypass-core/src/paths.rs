//! Standard paths used by EasyPass
//!
//! The data directory follows the per-user application data convention of
//! each desktop platform:
//! - Linux:   ~/.config/<app>
//! - macOS:   ~/Library/Application Support/<app>
//! - Windows: ~/AppData/Roaming/<app>
//!
//! Anything else is treated like Linux.

use std::fs;
use std::path::{Path, PathBuf};

/// Operating system family, as far as data directory layout is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Other
        }
    }

    /// Directory under the home directory holding per-application data
    fn app_data_root(&self) -> &'static [&'static str] {
        match self {
            Platform::MacOs => &["Library", "Application Support"],
            Platform::Windows => &["AppData", "Roaming"],
            Platform::Linux | Platform::Other => &[".config"],
        }
    }
}

/// Standard EasyPass paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// Data directory holding entries, settings and the legacy store
    pub data: PathBuf,
}

impl Paths {
    /// Resolve paths for `app_name` on the current platform
    pub fn new(app_name: &str) -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
        Self::resolve(Platform::current(), &home, app_name)
    }

    /// Resolve paths for an explicit platform and home directory
    pub fn resolve(platform: Platform, home: &Path, app_name: &str) -> Self {
        let mut data = home.to_path_buf();
        for part in platform.app_data_root() {
            data.push(part);
        }
        data.push(app_name);

        Self { data }
    }

    /// Use an explicit data directory
    pub fn with_data_dir(data: impl Into<PathBuf>) -> Self {
        Self { data: data.into() }
    }

    /// Path of the application config file
    pub fn config_file(&self) -> PathBuf {
        self.data.join("config.json")
    }

    /// Create the data directory if it does not exist yet.
    ///
    /// Failure is logged and reported as `false`; file operations against
    /// the directory will fail later on their own error paths.
    pub fn ensure_data_dir(&self) -> bool {
        match fs::create_dir_all(&self.data) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    path = %self.data.display(),
                    error = %e,
                    "failed to create data directory"
                );
                false
            }
        }
    }
}
