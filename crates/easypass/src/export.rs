//! Export envelope
//!
//! Portable format for moving entries between installations:
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "exportDate": "2024-03-01T12:00:00.000Z",
//!   "entries": [ { "id": 1, "name": "...", "secret": "...", "description": "" } ]
//! }
//! ```
//!
//! Entries are validated on the way out and again on the way in.

use chrono::{DateTime, Utc};
use easypass_core::format;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entry::Entry;
use crate::error::{StoreError, StoreResult};
use crate::validate::validate_entries;

/// Format version written into every export
pub const EXPORT_VERSION: &str = "1.0.0";

/// Versioned wrapper around an entry collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub version: String,
    pub export_date: String,
    pub entries: Vec<Entry>,
}

impl ExportEnvelope {
    /// Wrap `entries` (after validation) with the current format version
    pub fn new(entries: &Value, exported_at: DateTime<Utc>) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            export_date: format::iso_timestamp(exported_at),
            entries: validate_entries(entries),
        }
    }
}

/// Serialize entries into export text (2-space indented JSON)
pub fn to_export_text(entries: &Value, exported_at: DateTime<Utc>) -> StoreResult<String> {
    let envelope = ExportEnvelope::new(entries, exported_at);
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Parse export text and return its validated entries.
///
/// Only `entries` is required. `version` and `exportDate` are informational
/// and not checked, so files from newer writers still import.
pub fn from_export_text(text: &str) -> StoreResult<Vec<Entry>> {
    let document: Value = serde_json::from_str(text)?;

    let entries = document
        .get("entries")
        .ok_or(StoreError::InvalidEnvelope("missing entries"))?;

    if !entries.is_array() {
        return Err(StoreError::InvalidEnvelope("entries is not a list"));
    }

    Ok(validate_entries(entries))
}
