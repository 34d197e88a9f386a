//! easypass - Local credential vault
//!
//! Named secrets (name, secret, description) kept as plain JSON files in a
//! per-user data directory. An older SQLite key-value store is still read
//! when the files are missing and migrated forward on first use.
//!
//! Every store operation answers with a safe default on failure (empty
//! list, default settings, `false`, `None`) and logs the cause.

pub mod backend;
pub mod collection;
pub mod entry;
pub mod error;
pub mod export;
pub mod settings;
pub mod store;
pub mod validate;

pub use backend::{FileBackend, LegacyBackend, Resource, StorageBackend};
pub use collection::{EntryDraft, EntryError, Placement};
pub use entry::Entry;
pub use error::{StoreError, StoreResult};
pub use export::{ExportEnvelope, EXPORT_VERSION};
pub use settings::{default_settings, Settings, SettingsError};
pub use store::{CredentialStore, StorageStats, StorageType};
pub use validate::validate_entries;
