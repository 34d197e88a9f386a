//! User settings
//!
//! Stored as `settings.json`. A document that does not parse as a complete
//! [`Settings`] value is replaced by the defaults as a whole; fields are
//! never merged one by one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Process-wide user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Seconds before a copied secret is cleared from the clipboard
    pub clear_clipboard_after: u32,
    pub show_descriptions: bool,
    pub confirm_delete: bool,
    pub theme: String,
    pub auto_lock: bool,
    /// Minutes of inactivity before locking
    pub auto_lock_timeout: u32,
}

/// Fresh default settings
pub fn default_settings() -> Settings {
    Settings {
        clear_clipboard_after: 20,
        show_descriptions: true,
        confirm_delete: true,
        theme: "light".to_string(),
        auto_lock: false,
        auto_lock_timeout: 5,
    }
}

impl Default for Settings {
    fn default() -> Self {
        default_settings()
    }
}

impl Settings {
    /// Names accepted by [`Settings::set`], in camelCase
    pub const KEYS: [&'static str; 6] = [
        "clearClipboardAfter",
        "showDescriptions",
        "confirmDelete",
        "theme",
        "autoLock",
        "autoLockTimeout",
    ];

    /// Update one field from text. Accepts camelCase or kebab-case keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let normalized: String = key
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        let invalid = || SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match normalized.as_str() {
            "clearclipboardafter" => {
                self.clear_clipboard_after = value.trim().parse().map_err(|_| invalid())?;
            }
            "showdescriptions" => self.show_descriptions = parse_bool(value).ok_or_else(invalid)?,
            "confirmdelete" => self.confirm_delete = parse_bool(value).ok_or_else(invalid)?,
            "theme" => {
                let theme = value.trim();
                if theme.is_empty() {
                    return Err(invalid());
                }
                self.theme = theme.to_string();
            }
            "autolock" => self.auto_lock = parse_bool(value).ok_or_else(invalid)?,
            "autolocktimeout" => {
                self.auto_lock_timeout = value.trim().parse().map_err(|_| invalid())?;
            }
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
