//! Process runner
//!
//! A run goes through these steps on a background task:
//!
//! 1. Write the playbook and inventory into a fresh scratch directory.
//! 2. Spawn the playbook command with both output pipes captured.
//! 3. Mark the run as running and forward every stdout and stderr line to the
//!    event broadcaster and the run log, one reader task per pipe.
//! 4. Wait for the exit status, then give the readers a bounded window to
//!    drain what is left in the pipes. Background children may keep a pipe
//!    open past the exit; their readers are aborted when the window closes.
//! 5. Move the run to its terminal state, publish the terminal event and emit
//!    a notification.
//!
//! Failures at any step end the run as failed, so no run is left pending or
//! running. Dropping a subscriber never stops the process.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use playdeck_api_types::{LogLevel, NotificationKind, RecordId, Run, RunRequest};
use playdeck_interfaces::NotificationSink;
use playdeck_storage::{RunLogRecorder, RunRegistry, RunTransition, TransitionOutcome};
use serde_json::{Map, Value as JsonValue};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{ExecutionError, ExecutionResult};
use crate::events::{EventBroadcaster, EventStream, RunEvent};
use crate::scratch::{extra_vars_arg, ScratchDir};

/// Process runner settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Executable invoked as `<command> -i <inventory> <playbook> [-e <vars>]`
    pub playbook_command: String,
    /// Parent for scratch directories; the system temp dir when `None`
    pub scratch_dir: Option<PathBuf>,
    /// How long output is still read after the process has exited
    pub output_drain: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            playbook_command: "ansible-playbook".to_string(),
            scratch_dir: None,
            output_drain: DEFAULT_OUTPUT_DRAIN,
        }
    }
}

const DEFAULT_OUTPUT_DRAIN: Duration = Duration::from_secs(1);

/// A started run
pub struct RunHandle {
    /// The run as created, still pending
    pub run: Run,
    /// Live events, ending after the terminal event
    pub events: EventStream,
    completion: JoinHandle<ExecutionResult<Run>>,
}

impl RunHandle {
    /// Wait for the run to finish and return its terminal record
    pub async fn wait(self) -> ExecutionResult<Run> {
        self.completion
            .await
            .map_err(|e| ExecutionError::Process(format!("run task aborted: {e}")))?
    }
}

/// How a run ended, before it is recorded
#[derive(Debug)]
enum Outcome {
    Succeeded,
    /// The process ran and exited unsuccessfully
    Exited(String),
    /// The process never ran
    NotStarted(String),
}

/// Which pipe a line came from
#[derive(Debug, Clone, Copy)]
enum Pipe {
    Stdout,
    Stderr,
}

impl Pipe {
    fn event(self, line: String) -> RunEvent {
        match self {
            Pipe::Stdout => RunEvent::Output(line),
            Pipe::Stderr => RunEvent::Error(line),
        }
    }

    fn level(self) -> LogLevel {
        match self {
            Pipe::Stdout => LogLevel::Info,
            Pipe::Stderr => LogLevel::Error,
        }
    }
}

/// Launches playbook runs and supervises them to completion
#[derive(Clone)]
pub struct ProcessRunner {
    config: Arc<RunnerConfig>,
    runs: Arc<RunRegistry>,
    logs: Arc<RunLogRecorder>,
    events: Arc<EventBroadcaster>,
    notifications: Arc<dyn NotificationSink>,
}

impl ProcessRunner {
    pub fn new(
        config: RunnerConfig,
        runs: Arc<RunRegistry>,
        logs: Arc<RunLogRecorder>,
        events: Arc<EventBroadcaster>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            runs,
            logs,
            events,
            notifications,
        }
    }

    /// Validate `request`, create a pending run and start it in the background
    ///
    /// Invalid requests are rejected without creating a run. The returned
    /// stream is subscribed before the process starts, so it sees every line.
    pub fn start(&self, request: RunRequest) -> ExecutionResult<RunHandle> {
        if let Some(field) = request.missing_field() {
            return Err(ExecutionError::missing_field(field));
        }

        let run = self.runs.create(&request.playbook, &request.inventory);
        let events = self.events.open(run.id);
        info!(run_id = run.id, "Run accepted");

        let runner = self.clone();
        let run_id = run.id;
        let completion = tokio::spawn(async move { runner.execute(run_id, request).await });

        Ok(RunHandle {
            run,
            events,
            completion,
        })
    }

    async fn execute(self, run_id: RecordId, request: RunRequest) -> ExecutionResult<Run> {
        let outcome = match ScratchDir::create(
            self.config.scratch_dir.as_deref(),
            &request.playbook,
            &request.inventory,
        )
        .await
        {
            Ok(scratch) => self.run_process(run_id, &scratch, request.variables.as_ref()).await,
            Err(e) => Outcome::NotStarted(format!("Failed to create scratch directory: {e}")),
        };
        self.finish(run_id, outcome)
    }

    async fn run_process(
        &self,
        run_id: RecordId,
        scratch: &ScratchDir,
        variables: Option<&Map<String, JsonValue>>,
    ) -> Outcome {
        let mut command = Command::new(&self.config.playbook_command);
        command.arg("-i").arg(&scratch.inventory).arg(&scratch.playbook);
        if let Some(vars) = extra_vars_arg(variables) {
            command.arg("-e").arg(vars);
        }
        command
            .current_dir(scratch.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => return Outcome::NotStarted(format!("Failed to start command: {e}")),
        };

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            if let Err(e) = child.start_kill() {
                warn!(run_id, "Failed to kill process without pipes: {}", e);
            }
            let _ = child.wait().await;
            return Outcome::NotStarted("Failed to create output pipes".to_string());
        };

        if let Err(e) = self.runs.transition(run_id, RunTransition::Start) {
            warn!(run_id, "Could not mark run as running: {}", e);
        }
        info!(run_id, pid = child.id(), "Process started");

        let readers = [
            tokio::spawn(self.clone().forward_lines(run_id, stdout, Pipe::Stdout)),
            tokio::spawn(self.clone().forward_lines(run_id, stderr, Pipe::Stderr)),
        ];

        let status = child.wait().await;
        drain_readers(run_id, readers, self.config.output_drain).await;

        match status {
            Ok(status) if status.success() => Outcome::Succeeded,
            Ok(status) => Outcome::Exited(status.to_string()),
            Err(e) => Outcome::Exited(format!("failed to wait for command: {e}")),
        }
    }

    /// Forward every line of `reader` until end of file
    ///
    /// Lines are split on `\n` and decoded lossily, so non-UTF-8 output never
    /// stops the reader and the pipe is always drained.
    async fn forward_lines<R>(self, run_id: RecordId, reader: R, pipe: Pipe)
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    debug!(run_id, ?pipe, "{}", line);
                    self.logs.append(run_id, line.clone(), pipe.level());
                    self.events.publish(run_id, pipe.event(line));
                }
                Err(e) => {
                    warn!(run_id, ?pipe, "Failed to read process output: {}", e);
                    break;
                }
            }
        }
    }

    /// Record the terminal state, publish the terminal event and close the stream
    fn finish(&self, run_id: RecordId, outcome: Outcome) -> ExecutionResult<Run> {
        let transition = match &outcome {
            Outcome::Succeeded => RunTransition::Complete,
            Outcome::Exited(reason) | Outcome::NotStarted(reason) => RunTransition::fail(reason.clone()),
        };

        let result = self.runs.transition(run_id, transition);
        match &result {
            Ok(TransitionOutcome::Applied(run)) => {
                self.report(run, outcome);
            }
            Ok(TransitionOutcome::AlreadyTerminal(run)) => {
                warn!(run_id, status = %run.status, "Run was already finished");
            }
            Err(e) => {
                error!(run_id, "Failed to record run outcome: {}", e);
            }
        }
        self.events.close(run_id);

        Ok(result?.run().clone())
    }

    fn report(&self, run: &Run, outcome: Outcome) {
        match outcome {
            Outcome::Succeeded => {
                info!(run_id = run.id, "Run completed");
                self.logs.append(run.id, RunEvent::Completed.to_line(), LogLevel::Info);
                self.events.publish(run.id, RunEvent::Completed);
                self.notifications.emit(
                    NotificationKind::Success,
                    format!("Task #{} completed successfully", run.id),
                );
            }
            Outcome::Exited(reason) => {
                warn!(run_id = run.id, %reason, "Run failed");
                self.logs
                    .append(run.id, format!("Command failed: {reason}"), LogLevel::Error);
                self.events.publish(run.id, RunEvent::Failed(reason));
                self.notifications
                    .emit(NotificationKind::Error, format!("Task #{} failed", run.id));
            }
            Outcome::NotStarted(reason) => {
                error!(run_id = run.id, %reason, "Run could not start");
                self.logs.append(run.id, reason.clone(), LogLevel::Error);
                self.events.publish(run.id, RunEvent::Error(reason));
                self.notifications
                    .emit(NotificationKind::Error, format!("Task #{} failed", run.id));
            }
        }
    }
}

/// Wait up to `window` for the output readers, then abort the stragglers
///
/// A reader still running after the window belongs to a pipe held open by
/// something other than the exited process.
async fn drain_readers(run_id: RecordId, mut readers: [JoinHandle<()>; 2], window: Duration) {
    let [stdout, stderr] = &mut readers;
    let drained = tokio::time::timeout(window, async {
        let (stdout_done, stderr_done) = tokio::join!(stdout, stderr);
        for done in [stdout_done, stderr_done] {
            if let Err(e) = done {
                error!(run_id, "Output reader task failed: {}", e);
            }
        }
    })
    .await;

    if drained.is_err() {
        warn!(
            run_id,
            window_ms = window.as_millis() as u64,
            "Output still open after process exit, closing it"
        );
        for reader in &readers {
            reader.abort();
        }
    }
}
