//! Mock launcher for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::{ExitStatus, HostError, HostResult, PlayerCommand, PlayerProcess, ProcessLauncher};

/// Signal number reported for a terminated mock process
const MOCK_SIGTERM: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockControl {
    Running,
    Exit(i32),
    Terminated,
}

/// Record of one launch
#[derive(Debug, Clone)]
pub struct MockLaunch {
    pub mock_id: u64,
    pub command: PlayerCommand,
    pub running: bool,
    pub terminate_calls: u32,
}

type Launches = Arc<Mutex<HashMap<u64, MockLaunch>>>;

/// Mock launcher for unit/integration testing
///
/// Processes never exit on their own unless an auto-exit delay is configured
/// or `simulate_exit` is called.
pub struct MockLauncher {
    next_id: AtomicU64,
    launches: Launches,
    controls: Mutex<HashMap<u64, Arc<watch::Sender<MockControl>>>>,

    /// Configure launch to fail
    pub fail_spawn: Arc<Mutex<bool>>,

    /// Auto-exit delay (simulates the clip reaching its end)
    pub auto_exit_delay: Arc<Mutex<Option<Duration>>>,
}

impl MockLauncher {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            launches: Arc::new(Mutex::new(HashMap::new())),
            controls: Mutex::new(HashMap::new()),
            fail_spawn: Arc::new(Mutex::new(false)),
            auto_exit_delay: Arc::new(Mutex::new(None)),
        }
    }

    /// Set auto-exit behavior
    pub fn set_auto_exit(&self, delay: Option<Duration>) {
        *self.auto_exit_delay.lock().unwrap() = delay;
    }

    /// Make subsequent launches fail
    pub fn set_fail_spawn(&self, fail: bool) {
        *self.fail_spawn.lock().unwrap() = fail;
    }

    /// All launches so far, oldest first
    pub fn launches(&self) -> Vec<MockLaunch> {
        let mut launches: Vec<MockLaunch> =
            self.launches.lock().unwrap().values().cloned().collect();
        launches.sort_by_key(|l| l.mock_id);
        launches
    }

    /// Commands launched so far, oldest first
    pub fn commands(&self) -> Vec<PlayerCommand> {
        self.launches().into_iter().map(|l| l.command).collect()
    }

    /// Number of processes that have not been observed to exit
    pub fn running_count(&self) -> usize {
        self.launches
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.running)
            .count()
    }

    /// Simulate a process exiting on its own with `code`
    pub fn simulate_exit(&self, mock_id: u64, code: i32) {
        if let Some(control) = self.controls.lock().unwrap().get(&mock_id) {
            control.send_replace(MockControl::Exit(code));
        }
    }
}

impl Default for MockLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLauncher for MockLauncher {
    fn launch(&self, command: &PlayerCommand) -> HostResult<Box<dyn PlayerProcess>> {
        if *self.fail_spawn.lock().unwrap() {
            return Err(HostError::SpawnFailed(format!(
                "Mock spawn failure for {}",
                command.program
            )));
        }

        let mock_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = watch::channel(MockControl::Running);
        let tx = Arc::new(tx);

        self.launches.lock().unwrap().insert(
            mock_id,
            MockLaunch {
                mock_id,
                command: command.clone(),
                running: true,
                terminate_calls: 0,
            },
        );
        self.controls.lock().unwrap().insert(mock_id, tx.clone());

        let exit_at = self
            .auto_exit_delay
            .lock()
            .unwrap()
            .map(|delay| Instant::now() + delay);

        Ok(Box::new(MockProcess {
            mock_id,
            exit_at,
            control_tx: tx,
            control_rx: rx,
            launches: self.launches.clone(),
        }))
    }
}

/// Process handle handed out by `MockLauncher`
pub struct MockProcess {
    mock_id: u64,
    exit_at: Option<Instant>,
    control_tx: Arc<watch::Sender<MockControl>>,
    control_rx: watch::Receiver<MockControl>,
    launches: Launches,
}

#[async_trait]
impl PlayerProcess for MockProcess {
    fn pid(&self) -> Option<u32> {
        None
    }

    fn terminate(&mut self) -> HostResult<()> {
        if let Some(launch) = self.launches.lock().unwrap().get_mut(&self.mock_id) {
            launch.terminate_calls += 1;
        }
        self.control_tx.send_if_modified(|control| {
            if *control == MockControl::Running {
                *control = MockControl::Terminated;
                true
            } else {
                false
            }
        });
        Ok(())
    }

    async fn wait(&mut self) -> HostResult<ExitStatus> {
        let exit_at = self.exit_at;
        let auto_exit = async move {
            match exit_at {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        let status = tokio::select! {
            control = async {
                self.control_rx
                    .wait_for(|c| *c != MockControl::Running)
                    .await
                    .map(|c| *c)
            } => {
                match control {
                    Ok(MockControl::Exit(code)) => ExitStatus::with_code(code),
                    Ok(_) => ExitStatus::signaled(MOCK_SIGTERM),
                    Err(_) => return Err(HostError::Internal("mock control closed".into())),
                }
            }
            _ = auto_exit => ExitStatus::success(),
        };

        if let Some(launch) = self.launches.lock().unwrap().get_mut(&self.mock_id) {
            launch.running = false;
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> PlayerCommand {
        PlayerCommand::new("afplay").arg("/tmp/ding.wav").arg("-v").arg("1")
    }

    #[tokio::test]
    async fn mock_launch_and_terminate() {
        let launcher = MockLauncher::new();

        let mut process = launcher.launch(&command()).unwrap();
        assert_eq!(launcher.running_count(), 1);
        assert_eq!(launcher.commands(), vec![command()]);

        process.terminate().unwrap();
        let status = process.wait().await.unwrap();

        assert_eq!(status, ExitStatus::signaled(MOCK_SIGTERM));
        assert_eq!(launcher.running_count(), 0);
        assert_eq!(launcher.launches()[0].terminate_calls, 1);
    }

    #[tokio::test]
    async fn mock_spawn_failure() {
        let launcher = MockLauncher::new();
        launcher.set_fail_spawn(true);

        let result = launcher.launch(&command());
        assert!(matches!(result, Err(HostError::SpawnFailed(_))));
        assert!(launcher.launches().is_empty());
    }

    #[tokio::test]
    async fn mock_auto_exit() {
        let launcher = MockLauncher::new();
        launcher.set_auto_exit(Some(Duration::from_millis(20)));

        let mut process = launcher.launch(&command()).unwrap();
        let status = process.wait().await.unwrap();

        assert!(status.is_success());
        assert_eq!(launcher.running_count(), 0);
    }

    #[tokio::test]
    async fn mock_simulated_exit_code() {
        let launcher = MockLauncher::new();
        let mut process = launcher.launch(&command()).unwrap();
        let mock_id = launcher.launches()[0].mock_id;

        launcher.simulate_exit(mock_id, 3);
        let status = process.wait().await.unwrap();

        assert_eq!(status, ExitStatus::with_code(3));
    }
}
