//! Player: launches playbacks and tracks them until they end

use chrono::Local;
use soundcue_config::{DEFAULT_VOLUME, PlayerSettings};
use soundcue_host::{SystemLauncher, builder_for_platform};
use soundcue_host_api::{CommandBuilder, HostPlatform, PlayerProcess, ProcessLauncher};
use soundcue_util::PlaybackId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::outcome::{Finished, Playback, PlaybackOutcome};
use crate::registry::{ActivePlayback, Registry, RegistryEntry};

/// Plays audio files through an external player and tracks the live ones
///
/// `play`, `stop` and `stop_all` only do bookkeeping plus a non-blocking
/// spawn or signal; they never wait on a player. They must be called from
/// within a Tokio runtime. Dropping the `Player` stops everything it still
/// tracks.
pub struct Player {
    builder: Arc<dyn CommandBuilder>,
    launcher: Arc<dyn ProcessLauncher>,
    registry: Registry,
    default_volume: f64,
    next_serial: AtomicU64,
}

impl Player {
    /// Player for the configured platform, launching real processes
    pub fn new(settings: &PlayerSettings) -> Self {
        let builder = builder_for_platform(
            settings.platform,
            &settings.afplay_program,
            &settings.powershell_program,
        );
        Self::with_parts(builder, Arc::new(SystemLauncher::new()), settings.default_volume)
    }

    pub fn with_parts(
        builder: Arc<dyn CommandBuilder>,
        launcher: Arc<dyn ProcessLauncher>,
        default_volume: f64,
    ) -> Self {
        Self {
            builder,
            launcher,
            registry: Registry::new(),
            default_volume: normalize_volume(default_volume),
            next_serial: AtomicU64::new(1),
        }
    }

    pub fn platform(&self) -> HostPlatform {
        self.builder.platform()
    }

    pub fn default_volume(&self) -> f64 {
        self.default_volume
    }

    /// Start playing `file_path` at `volume` (0.0 to 1.0) and return its id.
    ///
    /// Returns immediately. A player that fails to start is not reported
    /// here; its id is simply never (or no longer) active.
    pub fn play(&self, file_path: impl AsRef<Path>, volume: f64) -> PlaybackId {
        self.play_tracked(file_path, volume).id
    }

    /// `play` at the configured default volume
    pub fn play_default(&self, file_path: impl AsRef<Path>) -> PlaybackId {
        self.play(file_path, self.default_volume)
    }

    /// Like `play`, but also return a signal that resolves when playback ends.
    pub fn play_tracked(&self, file_path: impl AsRef<Path>, volume: f64) -> Playback {
        let file_path = resolve_path(file_path.as_ref());
        let volume = self.builder.adjust_volume(normalize_volume(volume));
        let command = self.builder.build(&file_path, volume);

        let id = PlaybackId::generate();
        let (done_tx, finished) = Finished::channel();

        let process = match self.launcher.launch(&command) {
            Ok(process) => process,
            Err(e) => {
                warn!(id = %id, program = %command.program, error = %e, "Player failed to start");
                let _ = done_tx.send(PlaybackOutcome::SpawnError(e.to_string()));
                return Playback { id, finished };
            }
        };

        let pid = process.pid();
        let serial = self.next_serial.fetch_add(1, Ordering::SeqCst);
        let (stop_tx, stop_rx) = oneshot::channel();

        self.registry.insert(
            id.clone(),
            RegistryEntry {
                serial,
                stop_tx,
                file_path: file_path.clone(),
                pid,
                started_at: Local::now(),
            },
        );

        info!(
            id = %id,
            pid = ?pid,
            file = %file_path.display(),
            volume = volume,
            "Playback started"
        );

        tokio::spawn(observe(
            process,
            stop_rx,
            done_tx,
            self.registry.clone(),
            id.clone(),
            serial,
        ));

        Playback { id, finished }
    }

    /// Terminate playback `id`.
    ///
    /// Returns false if `id` is not active. The entry is removed before the
    /// player has actually exited, so only one `stop` per id returns true.
    pub fn stop(&self, id: &PlaybackId) -> bool {
        let Some(entry) = self.registry.take(id) else {
            debug!(id = %id, "Stop requested for inactive playback");
            return false;
        };

        // The observer may have just finished on its own; nothing to signal then.
        let _ = entry.stop_tx.send(());
        info!(id = %id, pid = ?entry.pid, "Playback stop requested");
        true
    }

    /// Stop every playback active at the time of the call.
    ///
    /// Returns how many of them this call stopped; ids a concurrent `stop`
    /// got to first are not counted.
    pub fn stop_all(&self) -> usize {
        let ids = self.registry.ids();
        if !ids.is_empty() {
            info!(count = ids.len(), "Stopping all playbacks");
        }
        ids.iter().filter(|id| self.stop(id)).count()
    }

    pub fn is_active(&self, id: &PlaybackId) -> bool {
        self.registry.contains(id)
    }

    pub fn active_count(&self) -> usize {
        self.registry.len()
    }

    /// Active playbacks, oldest first
    pub fn active(&self) -> Vec<ActivePlayback> {
        self.registry.snapshot()
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// Wait for the player to exit or for a stop request, then clean up.
async fn observe(
    mut process: Box<dyn PlayerProcess>,
    mut stop_rx: oneshot::Receiver<()>,
    done_tx: oneshot::Sender<PlaybackOutcome>,
    registry: Registry,
    id: PlaybackId,
    serial: u64,
) {
    // A dropped stop sender (entry replaced by an id collision) is not a stop
    // request; the branch is disabled and the player runs to its end.
    let outcome = tokio::select! {
        result = process.wait() => match result {
            Ok(status) => PlaybackOutcome::Exited(status),
            Err(e) => PlaybackOutcome::SpawnError(e.to_string()),
        },
        Ok(()) = &mut stop_rx => {
            if let Err(e) = process.terminate() {
                warn!(id = %id, error = %e, "Failed to terminate player");
            }
            match process.wait().await {
                Ok(status) => debug!(id = %id, status = ?status, "Stopped player exited"),
                Err(e) => warn!(id = %id, error = %e, "Failed to wait for stopped player"),
            }
            PlaybackOutcome::Stopped
        }
    };

    registry.remove_if_current(&id, serial);

    match &outcome {
        PlaybackOutcome::Exited(status) if status.is_success() => {
            info!(id = %id, "Playback finished");
        }
        PlaybackOutcome::Exited(status) => {
            warn!(id = %id, status = ?status, "Player exited with failure");
        }
        PlaybackOutcome::Stopped => {
            info!(id = %id, "Playback stopped");
        }
        PlaybackOutcome::SpawnError(error) => {
            warn!(id = %id, error = %error, "Player errored");
        }
    }

    let _ = done_tx.send(outcome);
}

/// Absolute form of `path` against the current directory.
///
/// Falls back to the path as given; a bad path then fails in the player.
fn resolve_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|e| {
        debug!(path = %path.display(), error = %e, "Could not make path absolute");
        path.to_path_buf()
    })
}

/// Clamp to 0.0..=1.0; NaN becomes the default volume.
fn normalize_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        DEFAULT_VOLUME
    } else {
        volume.clamp(0.0, 1.0)
    }
}
