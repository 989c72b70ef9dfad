//! Run registry: single source of truth for run lifecycle state

use chrono::Utc;
use parking_lot::RwLock;
use playdeck_api_types::{IdSequence, RecordId, Run, RunStatus};
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// A lifecycle step requested by the runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTransition {
    /// The process was spawned
    Start,
    /// The process exited successfully
    Complete,
    /// The run failed; `reason` becomes the run's output summary
    Fail { reason: String },
}

impl RunTransition {
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail {
            reason: reason.into(),
        }
    }

    pub fn target(&self) -> RunStatus {
        match self {
            RunTransition::Start => RunStatus::Running,
            RunTransition::Complete => RunStatus::Complete,
            RunTransition::Fail { .. } => RunStatus::Failed,
        }
    }
}

/// What a call to [`RunRegistry::transition`] did
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The transition was applied; carries the updated run
    Applied(Run),
    /// The run was already terminal and was left untouched
    AlreadyTerminal(Run),
}

impl TransitionOutcome {
    pub fn was_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }

    pub fn run(&self) -> &Run {
        match self {
            TransitionOutcome::Applied(run) | TransitionOutcome::AlreadyTerminal(run) => run,
        }
    }
}

struct RunTable {
    ids: IdSequence,
    runs: Vec<Run>,
}

impl RunTable {
    fn position(&self, id: RecordId) -> Option<usize> {
        self.runs.binary_search_by_key(&id, |run| run.id).ok()
    }
}

/// In-memory table of runs
///
/// All operations take the lock exactly once, so concurrent readers see a run
/// either before or after a transition. Runs are never removed.
pub struct RunRegistry {
    table: RwLock<RunTable>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(RunTable {
                ids: IdSequence::new(),
                runs: Vec::new(),
            }),
        }
    }

    /// Record a new pending run for the given payloads
    pub fn create(&self, playbook: impl Into<String>, inventory: impl Into<String>) -> Run {
        let mut table = self.table.write();
        let run = Run::pending(table.ids.next_id(), playbook, inventory);
        table.runs.push(run.clone());
        debug!(run_id = run.id, "Run created");
        run
    }

    /// Move a run forward in its lifecycle
    ///
    /// Terminal runs are never modified: the call returns
    /// [`TransitionOutcome::AlreadyTerminal`] instead. Backward or skipping
    /// moves (e.g. completing a pending run) are rejected.
    pub fn transition(&self, id: RecordId, transition: RunTransition) -> StorageResult<TransitionOutcome> {
        let mut table = self.table.write();
        let idx = table
            .position(id)
            .ok_or_else(|| StorageError::not_found("Run", id))?;
        let run = &mut table.runs[idx];

        if run.is_terminal() {
            return Ok(TransitionOutcome::AlreadyTerminal(run.clone()));
        }

        let target = transition.target();
        if !run.status.can_transition_to(target) {
            return Err(StorageError::InvalidTransition {
                id,
                from: run.status,
                to: target,
            });
        }

        run.status = target;
        match transition {
            RunTransition::Start => {}
            RunTransition::Complete => {
                run.progress = 100;
                run.end_time = Some(Utc::now());
            }
            RunTransition::Fail { reason } => {
                run.output = reason;
                run.end_time = Some(Utc::now());
            }
        }

        debug!(run_id = id, status = %target, "Run transitioned");
        Ok(TransitionOutcome::Applied(run.clone()))
    }

    pub fn get(&self, id: RecordId) -> StorageResult<Run> {
        let table = self.table.read();
        table
            .position(id)
            .map(|idx| table.runs[idx].clone())
            .ok_or_else(|| StorageError::not_found("Run", id))
    }

    /// Every run in creation order, including in-flight ones
    pub fn list(&self) -> Vec<Run> {
        self.table.read().runs.clone()
    }

    pub fn len(&self) -> usize {
        self.table.read().runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RunRegistry {
    fn default() -> Self {
        Self::new()
    }
}
