//! Storage backends
//!
//! The store reads and writes two resources (entries and settings) through
//! an ordered chain of backends:
//! - File: one pretty-printed JSON file per resource (current format)
//! - Legacy: SQLite key-value table left behind by earlier versions
//!
//! Backends move raw text. Parsing and validation stay in the store.

use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};

/// A logical resource persisted by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Entries,
    Settings,
}

impl Resource {
    pub const ALL: [Resource; 2] = [Resource::Entries, Resource::Settings];

    /// File name inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Resource::Entries => "entries.json",
            Resource::Settings => "settings.json",
        }
    }

    /// Key in the legacy key-value store
    pub fn legacy_key(&self) -> &'static str {
        match self {
            Resource::Entries => "entries",
            Resource::Settings => "settings",
        }
    }
}

/// A place resources can be loaded from and saved to
pub trait StorageBackend {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Whether the backend currently holds the resource
    fn contains(&self, resource: Resource) -> StoreResult<bool>;

    /// Raw text of the resource, `None` if absent
    fn load(&self, resource: Resource) -> StoreResult<Option<String>>;

    /// Replace the resource with `contents`
    fn save(&self, resource: Resource, contents: &str) -> StoreResult<()>;

    /// Remove the resource; absence is not an error
    fn remove(&self, resource: Resource) -> StoreResult<()>;
}

/// JSON files in the data directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Path of the file holding `resource`
    pub fn path(&self, resource: Resource) -> PathBuf {
        self.dir.join(resource.file_name())
    }

    /// On-disk size in bytes, 0 if the file does not exist
    pub fn size(&self, resource: Resource) -> StoreResult<u64> {
        let path = self.path(resource);
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

impl StorageBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    fn contains(&self, resource: Resource) -> StoreResult<bool> {
        let path = self.path(resource);
        path.try_exists().map_err(|e| StoreError::io(path, e))
    }

    fn load(&self, resource: Resource) -> StoreResult<Option<String>> {
        let path = self.path(resource);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn save(&self, resource: Resource, contents: &str) -> StoreResult<()> {
        let path = self.path(resource);
        fs::write(&path, contents).map_err(|e| StoreError::io(path, e))
    }

    fn remove(&self, resource: Resource) -> StoreResult<()> {
        let path = self.path(resource);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

/// SQLite key-value store used by earlier versions
///
/// The database is opened per call. Reads never create it: a missing
/// database file holds no keys.
#[derive(Debug, Clone)]
pub struct LegacyBackend {
    db_path: PathBuf,
}

impl LegacyBackend {
    /// Database file name inside the data directory
    pub const FILE_NAME: &'static str = "legacy.sqlite";

    pub fn new(dir: &Path) -> Self {
        Self {
            db_path: dir.join(Self::FILE_NAME),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn exists(&self) -> StoreResult<bool> {
        self.db_path
            .try_exists()
            .map_err(|e| StoreError::io(&self.db_path, e))
    }

    fn open(&self) -> StoreResult<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(conn)
    }

    /// Whether any key is stored
    pub fn has_any(&self) -> StoreResult<bool> {
        if !self.exists()? {
            return Ok(false);
        }
        let conn = self.open()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
        Ok(count > 0)
    }
}

impl StorageBackend for LegacyBackend {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn contains(&self, resource: Resource) -> StoreResult<bool> {
        Ok(self.load(resource)?.is_some())
    }

    fn load(&self, resource: Resource) -> StoreResult<Option<String>> {
        if !self.exists()? {
            return Ok(None);
        }

        let conn = self.open()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![resource.legacy_key()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, resource: Resource, contents: &str) -> StoreResult<()> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![resource.legacy_key(), contents],
        )?;
        Ok(())
    }

    fn remove(&self, resource: Resource) -> StoreResult<()> {
        if !self.exists()? {
            return Ok(());
        }

        let conn = self.open()?;
        conn.execute(
            "DELETE FROM kv WHERE key = ?1",
            params![resource.legacy_key()],
        )?;
        Ok(())
    }
}
