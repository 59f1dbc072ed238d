//! Process management utilities

use async_trait::async_trait;
use soundcue_host_api::{ExitStatus, HostError, HostResult, PlayerCommand, PlayerProcess};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tracing::debug;

/// Hides the console window a scripting host would otherwise flash
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Managed player child process
pub struct ManagedProcess {
    child: Child,
    pid: Option<u32>,
    program: String,
}

impl ManagedProcess {
    /// Spawn `command` with stdout/stderr drained in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(command: &PlayerCommand) -> HostResult<Self> {
        if command.program.is_empty() {
            return Err(HostError::SpawnFailed("Empty program".into()));
        }

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);

        // A player that logs to a full pipe would stall, so output is read
        // rather than discarded.
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        cmd.kill_on_drop(true);

        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        let mut child = cmd.spawn().map_err(|e| {
            HostError::SpawnFailed(format!("Failed to spawn {}: {}", command.program, e))
        })?;

        let pid = child.id();

        if let Some(stdout) = child.stdout.take() {
            drain_output(stdout, pid, "stdout");
        }
        if let Some(stderr) = child.stderr.take() {
            drain_output(stderr, pid, "stderr");
        }

        debug!(pid = ?pid, program = %command.program, "Process spawned");

        Ok(Self {
            child,
            pid,
            program: command.program.clone(),
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Send SIGTERM to the process
    #[cfg(unix)]
    pub fn terminate(&mut self) -> HostResult<()> {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        // Already reaped
        let Some(pid) = self.child.id() else {
            return Ok(());
        };

        match signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            Ok(()) => {
                debug!(pid = pid, program = %self.program, "Sent SIGTERM");
                Ok(())
            }
            Err(nix::errno::Errno::ESRCH) => {
                // Process already gone
                Ok(())
            }
            Err(e) => Err(HostError::StopFailed(format!(
                "Failed to send SIGTERM: {}",
                e
            ))),
        }
    }

    /// Terminate the process (`TerminateProcess`)
    #[cfg(not(unix))]
    pub fn terminate(&mut self) -> HostResult<()> {
        match self.child.start_kill() {
            Ok(()) => {
                debug!(pid = ?self.pid, program = %self.program, "Requested termination");
                Ok(())
            }
            // Already exited
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(HostError::StopFailed(format!(
                "Failed to terminate process: {}",
                e
            ))),
        }
    }

    /// Wait for the process to exit
    pub async fn wait(&mut self) -> HostResult<ExitStatus> {
        self.child
            .wait()
            .await
            .map(ExitStatus::from)
            .map_err(|e| HostError::Internal(format!("Wait failed: {}", e)))
    }
}

#[async_trait]
impl PlayerProcess for ManagedProcess {
    fn pid(&self) -> Option<u32> {
        ManagedProcess::pid(self)
    }

    fn terminate(&mut self) -> HostResult<()> {
        ManagedProcess::terminate(self)
    }

    async fn wait(&mut self) -> HostResult<ExitStatus> {
        ManagedProcess::wait(self).await
    }
}

fn drain_output<R>(stream: R, pid: Option<u32>, name: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    debug!(pid = ?pid, stream = name, line = %line.trim_end(), "Player output");
                }
                Err(e) => {
                    // The read end must stay open or the player dies on its next write
                    debug!(pid = ?pid, stream = name, error = %e, "Failed to read player output, discarding the rest");
                    let _ = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await;
                    break;
                }
            }
        }
    });
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn command(argv: &[&str]) -> PlayerCommand {
        argv[1..]
            .iter()
            .fold(PlayerCommand::new(argv[0]), |cmd, arg| cmd.arg(*arg))
    }

    #[tokio::test]
    async fn spawn_simple_process() {
        let mut proc = ManagedProcess::spawn(&command(&["true"])).unwrap();
        assert!(proc.pid().is_some());

        let status = proc.wait().await.unwrap();
        assert!(status.is_success());
    }

    #[tokio::test]
    async fn nonzero_exit_is_reported() {
        let mut proc = ManagedProcess::spawn(&command(&["sh", "-c", "exit 3"])).unwrap();
        let status = proc.wait().await.unwrap();
        assert_eq!(status, ExitStatus::with_code(3));
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let result = ManagedProcess::spawn(&command(&["/nonexistent/soundcue-player"]));
        assert!(matches!(result, Err(HostError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn empty_program_fails_to_spawn() {
        let result = ManagedProcess::spawn(&PlayerCommand::new(""));
        assert!(matches!(result, Err(HostError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn terminate_sleeping_process() {
        let mut proc = ManagedProcess::spawn(&command(&["sleep", "60"])).unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        proc.terminate().unwrap();

        let status = tokio::time::timeout(Duration::from_secs(5), proc.wait())
            .await
            .expect("process should exit after SIGTERM")
            .unwrap();
        assert_eq!(status, ExitStatus::signaled(15));
    }

    #[tokio::test]
    async fn terminate_after_exit_is_harmless() {
        let mut proc = ManagedProcess::spawn(&command(&["true"])).unwrap();
        proc.wait().await.unwrap();
        proc.terminate().unwrap();
    }

    #[tokio::test]
    async fn chatty_process_does_not_stall() {
        // Well past a pipe buffer's worth of output on both streams
        let script = "i=0; while [ $i -lt 4000 ]; do echo 'some player diagnostic line'; \
                      echo 'warning line' >&2; i=$((i+1)); done";
        let mut proc = ManagedProcess::spawn(&command(&["sh", "-c", script])).unwrap();

        let status = tokio::time::timeout(Duration::from_secs(20), proc.wait())
            .await
            .expect("process should not block on a full pipe")
            .unwrap();
        assert!(status.is_success());
    }

    #[tokio::test]
    async fn non_utf8_output_does_not_kill_player() {
        // A player that keeps writing after an undecodable line must not hit a closed pipe
        let script = "printf 'bad \\377 byte\\n'; sleep 0.5; echo still playing; \
                      echo 'still warning' >&2; sleep 0.2; exit 0";
        let mut proc = ManagedProcess::spawn(&command(&["sh", "-c", script])).unwrap();

        let status = tokio::time::timeout(Duration::from_secs(10), proc.wait())
            .await
            .expect("process should exit")
            .unwrap();
        assert!(status.is_success(), "player was killed: {status:?}");
    }
}
