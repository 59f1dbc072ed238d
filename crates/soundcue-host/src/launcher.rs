//! Host process launcher

use soundcue_host_api::{HostResult, PlayerCommand, PlayerProcess, ProcessLauncher};

use crate::process::ManagedProcess;

/// Launches real OS processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, command: &PlayerCommand) -> HostResult<Box<dyn PlayerProcess>> {
        let process = ManagedProcess::spawn(command)?;
        Ok(Box::new(process))
    }
}
