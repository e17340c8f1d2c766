//! Pulse file fallback
//!
//! When stores live in different processes there is no shared hub, so a
//! persisted update is announced by writing a uniquely-named envelope
//! file into the pulse directory. Other processes follow the directory
//! with a [`PulseWatcher`] and absorb each envelope they see.
//!
//! Pulses are signals, not storage: stale files are swept on every
//! write, and receivers re-read the content document rather than
//! trusting a pulse as the source of truth.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::warn;
use uuid::Uuid;

use crate::storage::error::{StorageError, StorageResult};
use crate::update::UpdateEnvelope;

/// Age after which a pulse file is considered stale and swept
pub const PULSE_TTL: Duration = Duration::from_secs(5);

/// How many recently seen envelope ids a watcher remembers, to drop the
/// duplicate create/modify notifications one write can produce
const SEEN_WINDOW: usize = 64;

/// Write one pulse file for an envelope, sweeping stale pulses first
///
/// Returns the path of the written pulse.
pub fn write_pulse(dir: &Path, envelope: &UpdateEnvelope) -> StorageResult<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| StorageError::CreateDirectory {
        path: dir.to_path_buf(),
        source: e,
    })?;

    sweep_stale(dir, PULSE_TTL);

    let path = dir.join(format!("pulse-{}.json", envelope.id));
    let json = envelope.encode()?;
    fs::write(&path, json).map_err(|e| StorageError::from_io(e, path.clone()))?;

    Ok(path)
}

/// Remove pulse files older than `ttl`; returns how many were removed.
///
/// Best-effort: unreadable entries are skipped.
pub fn sweep_stale(dir: &Path, ttl: Duration) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !is_pulse_file(&path) {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        let stale = modified
            .elapsed()
            .map(|age| age >= ttl)
            .unwrap_or(false);
        if stale && fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }
    removed
}

fn is_pulse_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.starts_with("pulse-") && name.ends_with(".json"))
        .unwrap_or(false)
}

/// Follows a pulse directory and hands each received envelope to a
/// callback. Watching stops when the watcher is dropped.
pub struct PulseWatcher {
    _watcher: RecommendedWatcher,
}

impl PulseWatcher {
    /// Watch `dir` for new pulse files
    ///
    /// The callback runs on the watcher's thread; duplicate filesystem
    /// notifications for one pulse are deduplicated by envelope id.
    pub fn spawn<F>(dir: PathBuf, mut on_pulse: F) -> Result<Self>
    where
        F: FnMut(UpdateEnvelope) + Send + 'static,
    {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create pulse directory {:?}", dir))?;

        let mut seen: VecDeque<Uuid> = VecDeque::with_capacity(SEEN_WINDOW);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    warn!(%err, "pulse watcher error");
                    return;
                }
            };

            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                return;
            }

            for path in event.paths {
                if !is_pulse_file(&path) {
                    continue;
                }
                // The pulse may already have been swept; that's fine
                let Ok(raw) = fs::read_to_string(&path) else {
                    continue;
                };
                match UpdateEnvelope::decode(&raw) {
                    Ok(envelope) => {
                        if seen.contains(&envelope.id) {
                            continue;
                        }
                        if seen.len() == SEEN_WINDOW {
                            seen.pop_front();
                        }
                        seen.push_back(envelope.id);
                        on_pulse(envelope);
                    }
                    Err(err) => {
                        warn!(path = %path.display(), %err, "ignoring malformed pulse file");
                    }
                }
            }
        })
        .context("Failed to create pulse watcher")?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch pulse directory {:?}", dir))?;

        Ok(Self { _watcher: watcher })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::{SkillOp, Update};
    use tempfile::TempDir;

    fn envelope() -> UpdateEnvelope {
        UpdateEnvelope::new(
            Uuid::new_v4(),
            "test",
            Update::Skills(SkillOp::AddCategory {
                category: "databases".to_string(),
            }),
        )
    }

    #[test]
    fn test_write_pulse_creates_unique_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("pulses");

        let first = envelope();
        let second = envelope();
        let path_a = write_pulse(&dir, &first).unwrap();
        let path_b = write_pulse(&dir, &second).unwrap();

        assert_ne!(path_a, path_b);

        let raw = fs::read_to_string(&path_a).unwrap();
        let decoded = UpdateEnvelope::decode(&raw).unwrap();
        assert_eq!(decoded.id, first.id);
    }

    #[test]
    fn test_sweep_removes_stale_pulses() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("pulses");

        write_pulse(&dir, &envelope()).unwrap();
        write_pulse(&dir, &envelope()).unwrap();

        // With a zero TTL everything just written is already stale
        let removed = sweep_stale(&dir, Duration::ZERO);
        assert_eq!(removed, 2);
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_sweep_ignores_other_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("pulses");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("notes.txt"), "keep me").unwrap();

        let removed = sweep_stale(&dir, Duration::ZERO);
        assert_eq!(removed, 0);
        assert!(dir.join("notes.txt").exists());
    }

    #[test]
    fn test_watcher_receives_pulse() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("pulses");

        let (tx, rx) = crossbeam_channel::unbounded();
        let _watcher = PulseWatcher::spawn(dir.clone(), move |env| {
            let _ = tx.send(env);
        })
        .unwrap();

        let sent = envelope();
        write_pulse(&dir, &sent).unwrap();

        let received = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("watcher should deliver the pulse");
        assert_eq!(received.id, sent.id);
    }
}
