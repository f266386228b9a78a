//! Persisted session storage
//!
//! The session survives restarts as a single string under the well-known
//! key [`TOKEN_KEY`]. Presence of that key is the only thing consulted on
//! restore.
//!
//! Two backends:
//!
//! - [`FileTokenStore`] keeps a small JSON document on disk
//! - [`MemoryTokenStore`] keeps everything in process, for tests and
//!   short-lived embedders

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::shared::error::StorageError;

/// Storage key of the session token
pub const TOKEN_KEY: &str = "token";

/// Durable key/value storage for the session token
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Persist `token`, replacing any previous value
    fn save(&self, token: &str) -> Result<(), StorageError>;

    /// Erase the persisted token
    fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredDocument {
    #[serde(default)]
    entries: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

/// JSON file backend
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // serialises read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<StoredDocument, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(StoredDocument::default()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, mut document: StoredDocument) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        document.updated_at = Some(chrono::Utc::now().to_rfc3339());

        // write-then-rename so a crash never leaves half a document behind
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&document)?)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        let document = self.read_document()?;
        Ok(document
            .entries
            .get(TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .cloned())
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut document = self.read_document()?;
        document.entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_document(document)?;
        tracing::debug!(path = %self.path.display(), "session token persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        if !self.path.exists() {
            return Ok(());
        }
        let mut document = match self.read_document() {
            Ok(document) => document,
            // an unreadable document is as good as erased once replaced
            Err(StorageError::Serialization { .. }) => StoredDocument::default(),
            Err(e) => return Err(e),
        };
        document.entries.remove(TOKEN_KEY);
        self.write_document(document)?;
        tracing::debug!(path = %self.path.display(), "session token erased");
        Ok(())
    }
}

/// In-process backend
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `token` already persisted
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        store.entries.lock().insert(TOKEN_KEY.to_string(), token.into());
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .get(TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .cloned())
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(TOKEN_KEY.to_string(), token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.entries.lock().remove(TOKEN_KEY);
        Ok(())
    }
}
