//! Playback completion

use soundcue_host_api::ExitStatus;
use soundcue_util::PlaybackId;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// How a playback ended
///
/// Every variant means "finished" to the caller; the distinction is kept for
/// logging and exit codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The player exited on its own
    Exited(ExitStatus),

    /// `stop` was called while the player was running
    Stopped,

    /// The player could not be started or could not be observed
    SpawnError(String),
}

impl PlaybackOutcome {
    /// Whether this ended without a player failure
    pub fn is_clean(&self) -> bool {
        match self {
            PlaybackOutcome::Exited(status) => status.is_success(),
            PlaybackOutcome::Stopped => true,
            PlaybackOutcome::SpawnError(_) => false,
        }
    }
}

/// Resolves once, when the playback it belongs to is over
///
/// Never fails. If the task observing the player goes away without reporting
/// (runtime shutdown), this resolves to `PlaybackOutcome::Stopped`.
#[derive(Debug)]
pub struct Finished {
    rx: oneshot::Receiver<PlaybackOutcome>,
}

impl Finished {
    pub(crate) fn channel() -> (oneshot::Sender<PlaybackOutcome>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }
}

impl Future for Finished {
    type Output = PlaybackOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(PlaybackOutcome::Stopped))
    }
}

/// A started playback: its id plus its completion signal
#[derive(Debug)]
pub struct Playback {
    pub id: PlaybackId,
    pub finished: Finished,
}
