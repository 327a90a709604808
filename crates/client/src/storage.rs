//! Durable client storage.
//!
//! The browser-storage equivalent: one JSON document per key under a
//! configured directory, surviving restarts. Writes go through a temp file
//! and an atomic rename so a crash never leaves a half-written document.
//!
//! Loads and saves are best-effort, matching web-storage semantics: a missing
//! or corrupt document reads as absent, and a failed write is logged rather
//! than propagated - no store operation fails because the disk did.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur preparing or writing durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handle to the durable storage directory.
///
/// Cheaply cloneable; every store holds one.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<StorageInner>,
}

struct StorageInner {
    dir: PathBuf,
}

impl Storage {
    /// Open (creating if needed) the storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            inner: Arc::new(StorageInner { dir }),
        })
    }

    /// Load the document stored under `key`.
    ///
    /// A missing, unreadable, or unparseable document reads as `None`.
    #[must_use]
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path(key);
        let text = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(key, %error, "discarding corrupt storage document");
                None
            }
        }
    }

    /// Persist `value` under `key`, best-effort.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(error) = self.try_save(key, value) {
            tracing::warn!(key, %error, "failed to persist storage document");
        }
    }

    /// Remove the document stored under `key`, best-effort.
    pub fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.path(key));
    }

    fn try_save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(value)?;
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn path(&self, key: &str) -> PathBuf {
        self.inner.dir.join(format!("{key}.json"))
    }
}
