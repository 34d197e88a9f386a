//! CredentialStore - durable, validated access to entries and settings
//!
//! The store remembers only its data directory. Each call reads or writes
//! the backends to completion and returns; callers hold the loaded
//! collection in memory and save it back after every change.
//!
//! Lookup walks the backend chain in priority order (file, then legacy).
//! The first backend holding a resource answers. If that is not the
//! primary, the validated value is copied forward so later loads read the
//! file directly. Writes go to the primary and are mirrored into the
//! legacy store.

use chrono::Utc;
use easypass_core::{format, Paths};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backend::{FileBackend, LegacyBackend, Resource, StorageBackend};
use crate::entry::Entry;
use crate::error::{StoreError, StoreResult};
use crate::export;
use crate::settings::{default_settings, Settings};
use crate::validate::validate_entries;

/// Which representation the store is currently serving from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    File,
    Legacy,
}

/// Snapshot of on-disk usage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub entries_size: u64,
    pub settings_size: u64,
    pub total_size: u64,
    /// Time the snapshot was taken (not file mtimes)
    pub last_modified: String,
    pub storage_type: StorageType,
}

/// File-backed credential store with legacy fallback
pub struct CredentialStore {
    data_dir: PathBuf,
    file: FileBackend,
    legacy: LegacyBackend,
}

impl CredentialStore {
    /// Open the store in the data directory of `paths`, creating it if needed
    pub fn open(paths: &Paths) -> Self {
        paths.ensure_data_dir();

        Self {
            data_dir: paths.data.clone(),
            file: FileBackend::new(&paths.data),
            legacy: LegacyBackend::new(&paths.data),
        }
    }

    /// Backends in priority order
    fn chain(&self) -> [&dyn StorageBackend; 2] {
        [&self.file, &self.legacy]
    }

    /// Resolved data directory
    pub fn data_directory_path(&self) -> &Path {
        &self.data_dir
    }

    // ---- entries ----

    /// Load all entries; empty on any failure
    pub fn load_entries(&self) -> Vec<Entry> {
        degrade("load entries", self.try_load_entries(), Vec::new)
    }

    /// Validate and save entries; `false` on failure
    pub fn save_entries<T: Serialize + ?Sized>(&self, entries: &T) -> bool {
        degrade("save entries", self.try_save_entries(entries), || false)
    }

    pub(crate) fn try_load_entries(&self) -> StoreResult<Vec<Entry>> {
        let (rank, text) = match self.lookup(Resource::Entries)? {
            Some(found) => found,
            None => return Ok(Vec::new()),
        };

        let value: Value = serde_json::from_str(&text)?;
        let entries = validate_entries(&value);

        if rank > 0 {
            let canonical = serde_json::to_string_pretty(&entries)?;
            self.migrate(Resource::Entries, rank, &canonical);
        }

        debug!(count = entries.len(), "loaded entries");
        Ok(entries)
    }

    pub(crate) fn try_save_entries<T: Serialize + ?Sized>(&self, entries: &T) -> StoreResult<bool> {
        let value = serde_json::to_value(entries)?;
        let validated = validate_entries(&value);
        let text = serde_json::to_string_pretty(&validated)?;

        self.write_through(Resource::Entries, &text)?;
        debug!(count = validated.len(), "saved entries");
        Ok(true)
    }

    // ---- settings ----

    /// Load settings; defaults when absent or unreadable
    pub fn load_settings(&self) -> Settings {
        degrade("load settings", self.try_load_settings(), default_settings)
    }

    /// Save settings; `false` on failure
    pub fn save_settings(&self, settings: &Settings) -> bool {
        degrade("save settings", self.try_save_settings(settings), || false)
    }

    /// Fresh default settings
    pub fn default_settings(&self) -> Settings {
        default_settings()
    }

    pub(crate) fn try_load_settings(&self) -> StoreResult<Settings> {
        let (rank, text) = match self.lookup(Resource::Settings)? {
            Some(found) => found,
            None => return Ok(default_settings()),
        };

        let settings: Settings = serde_json::from_str(&text)?;

        if rank > 0 {
            let canonical = serde_json::to_string_pretty(&settings)?;
            self.migrate(Resource::Settings, rank, &canonical);
        }

        Ok(settings)
    }

    pub(crate) fn try_save_settings(&self, settings: &Settings) -> StoreResult<bool> {
        let text = serde_json::to_string_pretty(settings)?;
        self.write_through(Resource::Settings, &text)?;
        debug!("saved settings");
        Ok(true)
    }

    // ---- export / import ----

    /// Export entries as envelope text; `None` on failure
    pub fn export_entries<T: Serialize + ?Sized>(&self, entries: &T) -> Option<String> {
        degrade("export entries", self.try_export_entries(entries).map(Some), || None)
    }

    /// Parse envelope text into validated entries; `None` if it is not an export
    pub fn import_entries(&self, text: &str) -> Option<Vec<Entry>> {
        degrade("import entries", export::from_export_text(text).map(Some), || None)
    }

    pub(crate) fn try_export_entries<T: Serialize + ?Sized>(&self, entries: &T) -> StoreResult<String> {
        let value = serde_json::to_value(entries)?;
        export::to_export_text(&value, Utc::now())
    }

    // ---- maintenance ----

    /// Remove both resources from every backend. Missing data is not an error.
    pub fn clear_all_data(&self) -> bool {
        let mut ok = true;

        for backend in self.chain() {
            for resource in Resource::ALL {
                if let Err(e) = backend.remove(resource) {
                    warn!(
                        backend = backend.name(),
                        resource = resource.file_name(),
                        kind = e.kind(),
                        error = %e,
                        "failed to clear data"
                    );
                    ok = false;
                }
            }
        }

        if ok {
            info!(dir = %self.data_dir.display(), "cleared all data");
        }
        ok
    }

    /// Current on-disk usage; `None` on I/O failure
    pub fn storage_stats(&self) -> Option<StorageStats> {
        degrade("storage stats", self.try_storage_stats().map(Some), || None)
    }

    pub(crate) fn try_storage_stats(&self) -> StoreResult<StorageStats> {
        let entries_size = self.file.size(Resource::Entries)?;
        let settings_size = self.file.size(Resource::Settings)?;

        let on_disk =
            self.file.contains(Resource::Entries)? || self.file.contains(Resource::Settings)?;
        let storage_type = if !on_disk && self.legacy.has_any()? {
            StorageType::Legacy
        } else {
            StorageType::File
        };

        Ok(StorageStats {
            entries_size,
            settings_size,
            total_size: entries_size + settings_size,
            last_modified: format::iso_timestamp(Utc::now()),
            storage_type,
        })
    }

    // ---- chain plumbing ----

    /// First backend holding `resource`, with its rank in the chain
    fn lookup(&self, resource: Resource) -> StoreResult<Option<(usize, String)>> {
        for (rank, backend) in self.chain().into_iter().enumerate() {
            if let Some(text) = backend.load(resource)? {
                debug!(
                    backend = backend.name(),
                    resource = resource.file_name(),
                    "resource found"
                );
                return Ok(Some((rank, text)));
            }
        }
        Ok(None)
    }

    /// Copy `contents` into every backend ranked above `from_rank`.
    ///
    /// A failed copy is logged; the loaded value is still returned to the
    /// caller and the copy is retried on the next load.
    fn migrate(&self, resource: Resource, from_rank: usize, contents: &str) {
        let chain = self.chain();
        let source = chain[from_rank].name();

        for backend in &chain[..from_rank] {
            match backend.save(resource, contents) {
                Ok(()) => info!(
                    from = source,
                    to = backend.name(),
                    resource = resource.file_name(),
                    "migrated resource"
                ),
                Err(e) => warn!(
                    from = source,
                    to = backend.name(),
                    resource = resource.file_name(),
                    error = %e,
                    "migration failed"
                ),
            }
        }
    }

    /// Write to the primary backend, then mirror to the rest.
    ///
    /// Only the primary write decides success.
    fn write_through(&self, resource: Resource, contents: &str) -> StoreResult<()> {
        for (rank, backend) in self.chain().into_iter().enumerate() {
            match backend.save(resource, contents) {
                Ok(()) => {}
                Err(e) if rank == 0 => return Err(e),
                Err(e) => warn!(
                    backend = backend.name(),
                    resource = resource.file_name(),
                    error = %e,
                    "mirror write failed"
                ),
            }
        }
        Ok(())
    }
}

/// Collapse an internal outcome into the public safe default
fn degrade<T>(operation: &str, result: StoreResult<T>, fallback: impl FnOnce() -> T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log_failure(operation, &e);
            fallback()
        }
    }
}

fn log_failure(operation: &str, error: &StoreError) {
    warn!(operation, kind = error.kind(), error = %error, "storage operation failed");
}
