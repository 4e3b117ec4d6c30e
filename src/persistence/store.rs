//! Durable key-value slot holding the serialized session.
//!
//! The engine never reaches for a global: it is handed a `SessionStore` and
//! only ever reads, writes or clears the one slot. `MemoryStore` backs tests
//! (and can simulate a full quota); `FileStore` keeps the slot in a JSON file
//! under the user's data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Application directory under the platform data dir.
pub const APP_DIR: &str = "values-sort";

/// File name of the session slot.
pub const SESSION_FILENAME: &str = "session.json";

/// Errors raised by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded: {needed} bytes needed, capacity is {capacity}")]
    QuotaExceeded { needed: usize, capacity: usize },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One slot of durable storage for the whole session record.
pub trait SessionStore {
    /// Read the slot. `Ok(None)` when nothing has been written.
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replace the slot contents.
    fn write(&mut self, contents: &str) -> Result<(), StoreError>;

    /// Remove the slot. Clearing an empty slot is not an error.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-memory slot.
///
/// ## Example
///
/// ```
/// use values_sort::persistence::{MemoryStore, SessionStore};
///
/// let mut store = MemoryStore::with_capacity(4);
/// assert!(store.write("too long").is_err());
/// assert!(store.write("ok").is_ok());
/// assert_eq!(store.contents(), Some("ok"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Option<String>,
    capacity: Option<usize>,
    writes: usize,
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes longer than `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Pre-fill the slot (builder pattern).
    #[must_use]
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.slot = Some(contents.into());
        self
    }

    /// Current slot contents.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    /// Number of successful writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl SessionStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), StoreError> {
        if let Some(capacity) = self.capacity {
            if contents.len() > capacity {
                return Err(StoreError::QuotaExceeded {
                    needed: contents.len(),
                    capacity,
                });
            }
        }
        self.slot = Some(contents.to_string());
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.slot = None;
        Ok(())
    }
}

/// Slot stored as a single JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous record intact.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store the slot at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/values-sort/session.json`, falling back to the working
    /// directory when the platform has no data dir.
    #[must_use]
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(SESSION_FILENAME);
        path
    }

    /// Path of the slot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl SessionStore for FileStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), bytes = contents.len(), "session file written");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
