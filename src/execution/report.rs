//! Execution reports - the record a run leaves behind

use crate::core::{ExecutionStatus, PipelineState, StepFailure};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record of a single executed step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// Zero-based position in the pipeline
    pub index: usize,

    /// Step label
    pub name: String,

    /// Rendered command line
    pub command: String,

    /// Exit code the child reported (`None` when killed by a signal)
    pub exit_code: Option<i32>,

    /// Wall-clock duration of the child process
    pub duration_ms: u64,

    /// Tail of the captured stderr, kept only when the step failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr_tail: Option<String>,
}

/// Final outcome of one pipeline run
///
/// Carries enough to reproduce and diagnose a failing step by hand:
/// its index, command line, and exit code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Unique execution ID
    pub execution_id: Uuid,

    /// Pipeline name
    pub pipeline: String,

    /// True when every step exited zero
    pub success: bool,

    /// Number of steps that ran to completion with exit status zero
    pub steps_run: usize,

    /// Total steps configured
    pub total_steps: usize,

    /// Cause of the failure, when there was one
    pub failure: Option<StepFailure>,

    /// When execution started
    pub started_at: DateTime<Utc>,

    /// When execution finished, either way
    pub completed_at: DateTime<Utc>,

    /// Per-step records in execution order
    pub steps: Vec<StepRecord>,
}

impl ExecutionReport {
    /// Assemble the report from the consumed run state
    pub(crate) fn from_state(
        pipeline: &str,
        state: PipelineState,
        records: Vec<StepRecord>,
        total_steps: usize,
    ) -> Self {
        let success = state.status == ExecutionStatus::Succeeded;
        let steps_run = match &state.failure {
            Some(failure) => failure.index,
            None => total_steps,
        };

        ExecutionReport {
            execution_id: state.execution_id,
            pipeline: pipeline.to_string(),
            success,
            steps_run,
            total_steps,
            failure: state.failure,
            started_at: state.started_at.unwrap_or_else(Utc::now),
            completed_at: state.completed_at.unwrap_or_else(Utc::now),
            steps: records,
        }
    }

    /// Terminal status this report represents
    pub fn status(&self) -> ExecutionStatus {
        if self.success {
            ExecutionStatus::Succeeded
        } else {
            ExecutionStatus::Failed
        }
    }
}
