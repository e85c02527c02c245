//! Command execution.
//!
//! [`CommandRunner::run`] is infallible by signature: spawn errors, signals
//! and timeouts are all encoded in the returned [`CommandResult`] so the
//! execution engine can feed them to the repair loop like any other failure.

use std::{path::Path, process::Stdio, time::Duration};

pub mod scripted;

pub use scripted::ScriptedRunner;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;

use crate::models::{CommandResult, ExitKind};

/// Executes shell command strings.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` with `cwd` as working directory.
    async fn run(&self, command: &str, cwd: &Path) -> CommandResult;
}

/// Runs commands through the platform shell with a wall-clock timeout.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(command: &str) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str, cwd: &Path) -> CommandResult {
        debug!("Running `{command}` in {}", cwd.display());

        let child = match Self::command(command).current_dir(cwd).spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to start `{command}`: {e}");
                return CommandResult::spawn_failed(format!("Failed to start command: {e}"));
            }
        };

        // Dropping the future on timeout drops the child, which kills it.
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let exit = match output.status.code() {
                    Some(code) => ExitKind::Code(code),
                    None => ExitKind::Signal,
                };
                CommandResult {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    exit,
                }
            }
            Ok(Err(e)) => CommandResult::spawn_failed(format!("Failed to collect output: {e}")),
            Err(_) => {
                warn!(
                    "`{command}` exceeded {}s and was killed",
                    self.timeout.as_secs()
                );
                CommandResult {
                    stdout: String::new(),
                    stderr: format!("Command timed out after {}s", self.timeout.as_secs()),
                    exit: ExitKind::TimedOut,
                }
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_captures_output_and_exit_code() {
        let dir = TempDir::new().unwrap();
        let runner = ShellRunner::new(Duration::from_secs(10));

        let result = runner.run("echo out; echo err >&2; exit 3", dir.path()).await;

        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
        assert_eq!(result.exit, ExitKind::Code(3));
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let runner = ShellRunner::new(Duration::from_secs(10));

        let result = runner.run("cat marker.txt", dir.path()).await;

        assert!(result.is_success());
        assert_eq!(result.stdout, "here");
    }

    #[tokio::test]
    async fn test_timeout_kills_command() {
        let dir = TempDir::new().unwrap();
        let runner = ShellRunner::new(Duration::from_millis(200));

        let result = runner.run("sleep 5", dir.path()).await;

        assert_eq!(result.exit, ExitKind::TimedOut);
        assert!(result.stderr.contains("timed out"));
    }

    #[tokio::test]
    async fn test_missing_directory_is_a_failed_result() {
        let dir = TempDir::new().unwrap();
        let runner = ShellRunner::new(Duration::from_secs(10));

        let result = runner.run("true", &dir.path().join("missing")).await;

        assert_eq!(result.exit, ExitKind::SpawnFailed);
        assert!(result.stderr.starts_with("Failed to start command"));
    }
}
