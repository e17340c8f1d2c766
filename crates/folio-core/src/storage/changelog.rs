//! Change log
//!
//! A capped, newest-first audit trail of every applied update. Each
//! record keeps the event and action names, the requesting agent, and a
//! truncated JSON snapshot of the payload. The log is persisted beside
//! the content document; a log that fails to load degrades to empty
//! rather than blocking the store.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::error::StorageResult;
use crate::storage::persistence::atomic_write;
use crate::update::UpdateEnvelope;

/// Maximum number of change records kept
pub const CHANGELOG_CAP: usize = 500;

/// Maximum characters kept of a payload snapshot
pub const SUMMARY_MAX_CHARS: usize = 240;

/// One audit record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub recorded_at: DateTime<Utc>,
    /// Requesting agent string from the envelope
    pub agent: String,
    /// Event name, e.g. `certificate_updated`
    pub event: String,
    /// Action within the event, e.g. `create`
    pub action: String,
    /// Truncated JSON snapshot of the update payload
    pub summary: String,
}

impl ChangeRecord {
    /// Build a record for an applied envelope
    pub fn for_envelope(envelope: &UpdateEnvelope) -> Self {
        let payload = serde_json::to_string(&envelope.update).unwrap_or_default();
        Self {
            recorded_at: envelope.recorded_at,
            agent: envelope.agent.clone(),
            event: envelope.update.event().to_string(),
            action: envelope.update.action().to_string(),
            summary: truncate(&payload, SUMMARY_MAX_CHARS),
        }
    }
}

/// Capped newest-first record list, optionally persisted to disk
#[derive(Debug, Default)]
pub struct ChangeLog {
    records: Vec<ChangeRecord>,
    path: Option<PathBuf>,
}

impl ChangeLog {
    /// Create an in-memory change log
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a change log that persists to disk
    ///
    /// Existing records are loaded if the file is present; a file that
    /// fails to load is logged and treated as empty.
    pub fn with_path(path: PathBuf) -> Self {
        let mut log = Self {
            records: Vec::new(),
            path: Some(path.clone()),
        };

        if path.exists() {
            if let Err(err) = log.load() {
                warn!(path = %path.display(), %err, "failed to load change log, starting empty");
            }
        }

        log
    }

    /// Append a record (newest first), enforce the cap, and persist
    pub fn append(&mut self, record: ChangeRecord) -> StorageResult<()> {
        self.records.insert(0, record);
        self.records.truncate(CHANGELOG_CAP);
        self.save()
    }

    /// All records, newest first
    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn load(&mut self) -> StorageResult<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        let raw = fs::read_to_string(path)
            .map_err(|e| crate::storage::error::StorageError::from_io(e, path.clone()))?;
        self.records = serde_json::from_str(&raw)?;
        self.records.truncate(CHANGELOG_CAP);
        Ok(())
    }

    fn save(&self) -> StorageResult<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        let json = serde_json::to_string(&self.records)?;
        atomic_write(path, json.as_bytes())
    }
}

/// Truncate to a maximum number of characters, marking the cut
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
