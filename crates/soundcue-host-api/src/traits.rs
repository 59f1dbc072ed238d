//! Host adapter traits

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::{ExitStatus, HostPlatform, PlayerCommand};

/// Errors from host adapter operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Stop failed: {0}")]
    StopFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// Builds the command line that plays one file on a given platform
///
/// One implementation exists per player family; the registry picks one at
/// construction and never branches on the platform again.
pub trait CommandBuilder: Send + Sync {
    /// Platform this builder targets
    fn platform(&self) -> HostPlatform;

    /// Map a normalized 0.0..=1.0 volume onto the player's own scale
    fn adjust_volume(&self, volume: f64) -> f64;

    /// Build the command for an absolute file path and an already-adjusted volume
    fn build(&self, file_path: &Path, volume: f64) -> PlayerCommand;
}

/// A launched player process
#[async_trait]
pub trait PlayerProcess: Send {
    /// OS process id, if there is one
    fn pid(&self) -> Option<u32>;

    /// Ask the process to terminate. Does not wait for it to exit.
    fn terminate(&mut self) -> HostResult<()>;

    /// Wait for the process to exit. Cancel-safe.
    async fn wait(&mut self) -> HostResult<ExitStatus>;
}

/// Starts player processes
pub trait ProcessLauncher: Send + Sync {
    /// Start `command`. Must not block on the child.
    fn launch(&self, command: &PlayerCommand) -> HostResult<Box<dyn PlayerProcess>>;
}
