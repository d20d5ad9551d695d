//! Execution state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Overall pipeline execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// The run has not started
    NotStarted,
    /// Steps are currently executing
    Running,
    /// Every step exited zero (terminal)
    Succeeded,
    /// A step exited non-zero (terminal)
    Failed,
}

impl ExecutionStatus {
    /// Check if the status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Succeeded | ExecutionStatus::Failed)
    }
}

/// The first step that exited non-zero, recorded as the cause of a
/// failed run. Carries enough to reproduce the step by hand.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("step {index} ({command}) exited with code {}", .exit_code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
pub struct StepFailure {
    /// Zero-based index of the failing step
    pub index: usize,

    /// Rendered command line of the failing step
    pub command: String,

    /// Exit code reported by the child process; `None` when the child was
    /// killed by a signal and no code is available
    pub exit_code: Option<i32>,
}

/// Transient per-run state
///
/// Created when a run starts, mutated only by the runner as steps
/// complete, and consumed into the final report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    /// Unique execution ID
    pub execution_id: Uuid,

    /// Current execution status
    pub status: ExecutionStatus,

    /// Index of the step currently executing (or about to)
    pub current_step_index: usize,

    /// Set when the run stopped early instead of finishing its steps
    pub terminated: bool,

    /// Cause of termination, when a step failed
    pub failure: Option<StepFailure>,

    /// When execution started
    pub started_at: Option<DateTime<Utc>>,

    /// When execution succeeded or failed
    pub completed_at: Option<DateTime<Utc>>,
}

impl PipelineState {
    /// Create a fresh state for one run
    pub fn new() -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            status: ExecutionStatus::NotStarted,
            current_step_index: 0,
            terminated: false,
            failure: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Mark the run as started
    pub fn start(&mut self) {
        if self.status == ExecutionStatus::NotStarted {
            self.status = ExecutionStatus::Running;
            self.started_at = Some(Utc::now());
        }
    }

    /// Mark the run as succeeded. No-op once the state is terminal.
    pub fn complete(&mut self) {
        if self.status == ExecutionStatus::Running {
            self.status = ExecutionStatus::Succeeded;
            self.completed_at = Some(Utc::now());
        }
    }

    /// Mark the run as failed with its cause. No-op once the state is
    /// terminal.
    pub fn fail(&mut self, failure: StepFailure) {
        if self.status == ExecutionStatus::Running {
            self.status = ExecutionStatus::Failed;
            self.terminated = true;
            self.failure = Some(failure);
            self.completed_at = Some(Utc::now());
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}
