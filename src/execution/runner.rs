//! Pipeline runner - the fail-fast control loop

use crate::core::{EnvironmentContext, Pipeline, PipelineState, StepFailure};
use crate::execution::executor::{CommandExecutor, CommandOutput, EnvironmentError, ExecutionResult};
use crate::execution::report::{ExecutionReport, StepRecord};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// Lines of stderr preserved in the failing step's record
const STDERR_TAIL_LINES: usize = 20;

/// Errors that abort a run before a failure report can be produced
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A step's command could not be located or launched at all
    #[error("step {index} ({command}): {source}")]
    Environment {
        index: usize,
        command: String,
        #[source]
        source: EnvironmentError,
    },
}

/// Events emitted while a pipeline runs
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        execution_id: Uuid,
        pipeline_name: String,
        total_steps: usize,
    },
    StepStarted {
        index: usize,
        name: String,
        command: String,
    },
    StepOutput {
        index: usize,
        name: String,
        output: CommandOutput,
    },
    StepCompleted {
        index: usize,
        name: String,
        duration_ms: u64,
    },
    StepFailed {
        index: usize,
        name: String,
        exit_code: Option<i32>,
    },
    PipelineCompleted {
        execution_id: Uuid,
        success: bool,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Executes a pipeline's steps in order, stopping at the first failure
///
/// The runner holds no state across runs: invoking [`run`](Self::run)
/// twice on the same pipeline re-executes every step against a fresh
/// [`PipelineState`].
pub struct PipelineRunner<E> {
    executor: E,
    event_handlers: Vec<EventHandler>,
}

impl<E: CommandExecutor> PipelineRunner<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Execute every step in configured order
    ///
    /// Each step runs to completion before the next starts. A non-zero
    /// exit stops the run immediately and yields a `success = false`
    /// report naming the failing step; a command that cannot be launched
    /// yields [`RunnerError::Environment`] instead.
    pub async fn run(
        &self,
        pipeline: &Pipeline,
        ctx: &EnvironmentContext,
    ) -> Result<ExecutionReport, RunnerError> {
        let mut state = PipelineState::new();
        state.start();

        info!(
            "Starting pipeline {} ({}) with {} steps",
            pipeline.name(),
            state.execution_id,
            pipeline.len()
        );
        self.emit(ExecutionEvent::PipelineStarted {
            execution_id: state.execution_id,
            pipeline_name: pipeline.name().to_string(),
            total_steps: pipeline.len(),
        });

        let mut records = Vec::with_capacity(pipeline.len());

        for (index, step) in pipeline.steps().iter().enumerate() {
            state.current_step_index = index;

            info!("Running step {}: {}", index, step.command_line());
            self.emit(ExecutionEvent::StepStarted {
                index,
                name: step.name.clone(),
                command: step.command_line(),
            });

            let step_ctx = ctx.for_step(step);
            let started = std::time::Instant::now();
            let result = self
                .executor
                .execute(&step.command, &step.args, &step_ctx)
                .await
                .map_err(|source| {
                    error!("Step {} could not be launched: {}", index, source);
                    RunnerError::Environment {
                        index,
                        command: step.command_line(),
                        source,
                    }
                })?;
            let duration_ms = started.elapsed().as_millis() as u64;

            self.emit(ExecutionEvent::StepOutput {
                index,
                name: step.name.clone(),
                output: result.output().clone(),
            });

            match result {
                ExecutionResult::Success { .. } => {
                    info!("Step {} completed in {}ms", index, duration_ms);
                    records.push(StepRecord {
                        index,
                        name: step.name.clone(),
                        command: step.command_line(),
                        exit_code: Some(0),
                        duration_ms,
                        stderr_tail: None,
                    });
                    self.emit(ExecutionEvent::StepCompleted {
                        index,
                        name: step.name.clone(),
                        duration_ms,
                    });
                }
                ExecutionResult::Failed { exit_code, output } => {
                    error!(
                        "Step {} ({}) exited with code {:?}, stopping",
                        index,
                        step.command_line(),
                        exit_code
                    );
                    records.push(StepRecord {
                        index,
                        name: step.name.clone(),
                        command: step.command_line(),
                        exit_code,
                        duration_ms,
                        stderr_tail: non_empty_tail(&output.stderr),
                    });
                    self.emit(ExecutionEvent::StepFailed {
                        index,
                        name: step.name.clone(),
                        exit_code,
                    });

                    state.fail(StepFailure {
                        index,
                        command: step.command_line(),
                        exit_code,
                    });
                    self.emit(ExecutionEvent::PipelineCompleted {
                        execution_id: state.execution_id,
                        success: false,
                    });

                    return Ok(ExecutionReport::from_state(
                        pipeline.name(),
                        state,
                        records,
                        pipeline.len(),
                    ));
                }
            }
        }

        state.complete();
        info!("Pipeline {} completed successfully", pipeline.name());
        self.emit(ExecutionEvent::PipelineCompleted {
            execution_id: state.execution_id,
            success: true,
        });

        Ok(ExecutionReport::from_state(
            pipeline.name(),
            state,
            records,
            pipeline.len(),
        ))
    }
}

/// Last lines of a stream, or `None` when there is nothing to keep
fn non_empty_tail(stream: &str) -> Option<String> {
    if stream.trim().is_empty() {
        return None;
    }
    let lines: Vec<&str> = stream.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    Some(lines[start..].join("\n"))
}
