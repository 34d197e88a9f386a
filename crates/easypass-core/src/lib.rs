//! EasyPass Core - Shared functionality for the EasyPass credential vault
//!
//! Platform paths, application configuration and display formatting.

pub mod config;
pub mod format;
pub mod paths;

pub use config::Config;
pub use paths::{Paths, Platform};

/// Application name used when nothing else is configured
pub const DEFAULT_APP_NAME: &str = "easypass";
