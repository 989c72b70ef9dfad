//! Dry-run (check mode) validation of a playbook

use std::process::Stdio;
use std::time::Duration;

use playdeck_api_types::CheckRequest;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::RunnerConfig;
use crate::scratch::{extra_vars_arg, ScratchDir};

/// Result of a check-mode invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Whether the command exited successfully
    pub valid: bool,
    /// Combined stdout and stderr, or the reason the command could not run
    pub message: String,
}

/// Runs the playbook command with `--check` against scratch copies of the payloads
#[derive(Debug, Clone)]
pub struct PlaybookChecker {
    config: RunnerConfig,
}

impl PlaybookChecker {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Check `request` without creating a run
    ///
    /// A command that cannot be started counts as an invalid playbook. Only
    /// a failure to write the scratch files is returned as an error.
    pub async fn check(&self, request: &CheckRequest) -> ExecutionResult<CheckOutcome> {
        if let Some(field) = request.missing_field() {
            return Err(ExecutionError::missing_field(field));
        }

        let scratch = ScratchDir::create(
            self.config.scratch_dir.as_deref(),
            &request.playbook,
            &request.inventory,
        )
        .await
        .map_err(|e| ExecutionError::ResourceCreation(e.to_string()))?;

        let mut command = Command::new(&self.config.playbook_command);
        command
            .arg("--check")
            .arg("-i")
            .arg(&scratch.inventory)
            .arg(&scratch.playbook);
        if let Some(vars) = extra_vars_arg(request.variables.as_ref()) {
            command.arg("-e").arg(vars);
        }
        command
            .current_dir(scratch.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                debug!("Check command could not start: {}", e);
                return Ok(CheckOutcome {
                    valid: false,
                    message: format!("Failed to start command: {e}"),
                });
            }
        };

        let stdout = child.stdout.take().map(|pipe| tokio::spawn(read_all(pipe)));
        let stderr = child.stderr.take().map(|pipe| tokio::spawn(read_all(pipe)));
        let status = child.wait().await;

        let deadline = Instant::now() + self.config.output_drain;
        let mut message = String::from_utf8_lossy(&collect(stdout, deadline).await).into_owned();
        message.push_str(&String::from_utf8_lossy(&collect(stderr, deadline).await));

        let outcome = match status {
            Ok(status) => CheckOutcome {
                valid: status.success(),
                message,
            },
            Err(e) => CheckOutcome {
                valid: false,
                message: format!("failed to wait for command: {e}"),
            },
        };

        info!(valid = outcome.valid, "Playbook check finished");
        Ok(outcome)
    }
}

async fn read_all<R>(mut pipe: R) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Err(e) = pipe.read_to_end(&mut buf).await {
        warn!("Failed to read check output: {}", e);
    }
    buf
}

/// Output read by `reader`, or nothing if the pipe is still open at `deadline`
async fn collect(reader: Option<JoinHandle<Vec<u8>>>, deadline: Instant) -> Vec<u8> {
    let Some(mut reader) = reader else {
        return Vec::new();
    };
    match tokio::time::timeout_at(deadline, &mut reader).await {
        Ok(Ok(buf)) => buf,
        Ok(Err(e)) => {
            warn!("Check output reader failed: {}", e);
            Vec::new()
        }
        Err(_) => {
            warn!("Check output still open after process exit, closing it");
            reader.abort();
            Vec::new()
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_support::script;
    use playdeck_api_types::RunRequest;
    use tempfile::TempDir;

    fn checker(command: impl Into<String>) -> PlaybookChecker {
        PlaybookChecker::new(RunnerConfig {
            playbook_command: command.into(),
            scratch_dir: None,
            output_drain: Duration::from_millis(200),
        })
    }

    #[tokio::test]
    async fn test_passing_check() {
        let bin = TempDir::new().unwrap();
        let cmd = script(&bin, "fake-playbook", r#"echo "$1 $2"; cat "$4""#);
        let outcome = checker(cmd.to_string_lossy())
            .check(&RunRequest::new("- hosts: all", "localhost"))
            .await
            .unwrap();
        assert!(outcome.valid);
        assert_eq!(outcome.message, "--check -i\n- hosts: all");
    }

    #[tokio::test]
    async fn test_failing_check_reports_output() {
        let bin = TempDir::new().unwrap();
        let cmd = script(&bin, "fake-playbook", r#"echo "syntax error" >&2; exit 4"#);
        let outcome = checker(cmd.to_string_lossy())
            .check(&RunRequest::new("bad: [", "localhost"))
            .await
            .unwrap();
        assert!(!outcome.valid);
        assert_eq!(outcome.message, "syntax error\n");
    }

    #[tokio::test]
    async fn test_check_returns_when_background_child_keeps_stderr_open() {
        let bin = TempDir::new().unwrap();
        let cmd = script(&bin, "fake-playbook", "sleep 5 >/dev/null & echo ok; exit 0");

        let outcome = tokio::time::timeout(
            Duration::from_secs(2),
            checker(cmd.to_string_lossy()).check(&RunRequest::new("- hosts: all", "localhost")),
        )
        .await
        .expect("check should finish once the process exits")
        .unwrap();
        assert!(outcome.valid);
        assert_eq!(outcome.message, "ok\n");
    }

    #[tokio::test]
    async fn test_missing_executable_is_invalid() {
        let outcome = checker("/nonexistent/playdeck-fake-playbook")
            .check(&RunRequest::new("p", "i"))
            .await
            .unwrap();
        assert!(!outcome.valid);
        assert!(outcome.message.starts_with("Failed to start command:"));
    }

    #[tokio::test]
    async fn test_empty_request_rejected() {
        let err = checker("true").check(&RunRequest::default()).await.unwrap_err();
        assert!(matches!(err, ExecutionError::InvalidInput(_)));
    }
}
