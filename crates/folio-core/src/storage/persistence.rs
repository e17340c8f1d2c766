//! Content document persistence
//!
//! Saves and loads the content document as pretty-printed JSON. Writes
//! are atomic (write to temp file, then rename) so the document is never
//! left half-written.
//!
//! Loading always goes through `merge_with_defaults`: whatever subset of
//! fields the stored file carries, the returned document is structurally
//! complete. An unparseable file is backed up to `content.json.corrupt`
//! and treated as absent, so the store self-heals with the seeded
//! defaults without destroying the evidence.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::Config;
use crate::document::{merge_with_defaults, Document, StoredDocument};
use crate::storage::error::{StorageError, StorageResult};

/// Persistence layer for the content document
pub struct ContentPersistence {
    config: Config,
}

impl ContentPersistence {
    /// Create a new persistence handler with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if a document exists on disk
    pub fn exists(&self) -> bool {
        self.config.document_path().exists()
    }

    /// Load the document from disk
    ///
    /// Returns `None` if the file doesn't exist, or if it exists but
    /// cannot be parsed (the unparseable file is backed up first).
    /// Returns an error only for I/O failures.
    pub fn load(&self) -> StorageResult<Option<Document>> {
        let path = self.config.document_path();

        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)
            .map_err(|e| StorageError::from_io(e, path.clone()))?;

        match serde_json::from_str::<StoredDocument>(&raw) {
            Ok(stored) => Ok(Some(merge_with_defaults(stored))),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    %err,
                    "content document is unreadable, backing it up and reseeding"
                );
                self.backup_corrupt(&path)?;
                Ok(None)
            }
        }
    }

    /// Save the document to disk using an atomic write
    pub fn save(&self, doc: &Document) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(doc)?;
        atomic_write(&self.config.document_path(), json.as_bytes())
    }

    /// Load the existing document or seed the starter document
    ///
    /// If a document exists on disk it is loaded and returned. Otherwise
    /// (including after a corrupt-file backup) the starter document is
    /// created, persisted, and returned.
    pub fn load_or_seed(&self) -> StorageResult<Document> {
        if let Some(doc) = self.load()? {
            return Ok(doc);
        }

        let doc = Document::starter();
        self.save(&doc)?;
        Ok(doc)
    }

    /// Copy an unparseable document aside before reseeding
    fn backup_corrupt(&self, path: &Path) -> StorageResult<()> {
        let backup = corrupt_backup_path(path);
        fs::copy(path, &backup).map_err(|e| StorageError::from_io(e, backup))?;
        Ok(())
    }
}

/// Path the corrupt backup is written to: `<file>.corrupt`
pub fn corrupt_backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt");
    PathBuf::from(name)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
pub fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: temp_path,
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
