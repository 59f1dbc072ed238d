//! Registry of live player processes

use chrono::{DateTime, Local};
use serde::Serialize;
use soundcue_util::PlaybackId;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

/// Public view of one registry entry
#[derive(Debug, Clone, Serialize)]
pub struct ActivePlayback {
    pub id: PlaybackId,
    pub file_path: PathBuf,
    pub pid: Option<u32>,
    pub started_at: DateTime<Local>,
}

/// Handle kept for each live player
#[derive(Debug)]
pub(crate) struct RegistryEntry {
    /// Distinguishes this playback from a later one that reuses its id
    pub serial: u64,
    /// Tells the observing task to terminate the player
    pub stop_tx: oneshot::Sender<()>,
    pub file_path: PathBuf,
    pub pid: Option<u32>,
    pub started_at: DateTime<Local>,
}

/// Map from playback id to live player, shared with the observing tasks
///
/// Every key belongs to a player that was spawned and has not yet been seen
/// to exit. The lock is never held across an await.
#[derive(Debug, Clone, Default)]
pub(crate) struct Registry {
    entries: Arc<Mutex<HashMap<PlaybackId, RegistryEntry>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the map half-updated,
    // so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<PlaybackId, RegistryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, id: PlaybackId, entry: RegistryEntry) {
        self.lock().insert(id, entry);
    }

    /// Remove and return the entry for `id`
    pub fn take(&self, id: &PlaybackId) -> Option<RegistryEntry> {
        self.lock().remove(id)
    }

    /// Remove `id` only if it still belongs to playback `serial`
    pub fn remove_if_current(&self, id: &PlaybackId, serial: u64) -> bool {
        let mut entries = self.lock();
        match entries.get(id) {
            Some(entry) if entry.serial == serial => {
                entries.remove(id);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, id: &PlaybackId) -> bool {
        self.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Snapshot of the ids present right now
    pub fn ids(&self) -> Vec<PlaybackId> {
        self.lock().keys().cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<ActivePlayback> {
        let mut active: Vec<ActivePlayback> = self
            .lock()
            .iter()
            .map(|(id, entry)| ActivePlayback {
                id: id.clone(),
                file_path: entry.file_path.clone(),
                pid: entry.pid,
                started_at: entry.started_at,
            })
            .collect();
        active.sort_by_key(|a| a.started_at);
        active
    }
}
