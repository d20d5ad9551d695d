//! Test utility functions for checkline

use async_trait::async_trait;
use checkline::core::{EnvironmentContext, Pipeline, Step};
use checkline::execution::{
    CommandExecutor, CommandOutput, EnvironmentError, ExecutionReport, ExecutionResult,
    PipelineRunner, RunnerError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Executor that replays scripted exit codes without spawning processes
pub struct ScriptedExecutor {
    exit_codes: Vec<i32>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedExecutor {
    pub fn new(exit_codes: Vec<i32>) -> Self {
        Self {
            exit_codes,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle onto the commands this executor has been asked to run,
    /// usable after the executor moves into a runner
    pub fn call_log(&self) -> CallLog {
        CallLog(self.calls.clone())
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        command: &str,
        args: &[String],
        _ctx: &EnvironmentContext,
    ) -> Result<ExecutionResult, EnvironmentError> {
        let mut calls = self.calls.lock().unwrap();
        let code = self.exit_codes.get(calls.len()).copied().unwrap_or(0);

        let rendered = std::iter::once(command.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        calls.push(rendered);

        if code == 0 {
            Ok(ExecutionResult::Success {
                output: CommandOutput::default(),
            })
        } else {
            Ok(ExecutionResult::Failed {
                exit_code: Some(code),
                output: CommandOutput {
                    stdout: String::new(),
                    stderr: format!("scripted failure with code {}\n", code),
                },
            })
        }
    }
}

/// Record of the commands a [`ScriptedExecutor`] actually ran
#[derive(Clone)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn commands(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

/// Executor whose commands can never be located
pub struct MissingCommandExecutor;

#[async_trait]
impl CommandExecutor for MissingCommandExecutor {
    async fn execute(
        &self,
        command: &str,
        _args: &[String],
        _ctx: &EnvironmentContext,
    ) -> Result<ExecutionResult, EnvironmentError> {
        Err(EnvironmentError::CommandNotFound {
            command: command.to_string(),
        })
    }
}

/// Build a pipeline of bare commands
pub fn pipeline_of(commands: &[&str]) -> Pipeline {
    let steps = commands
        .iter()
        .map(|c| Step::new(*c, Vec::<String>::new()))
        .collect();
    Pipeline::configure("test", steps).expect("test pipelines are non-empty")
}

/// A context that never touches the real process environment
pub fn test_context() -> EnvironmentContext {
    EnvironmentContext::new(HashMap::new(), std::env::temp_dir())
}

/// Run commands against scripted exit codes, returning the report and
/// the log of what was actually invoked
pub async fn run_scripted(
    commands: &[&str],
    exit_codes: Vec<i32>,
) -> (Result<ExecutionReport, RunnerError>, CallLog) {
    let executor = ScriptedExecutor::new(exit_codes);
    let log = executor.call_log();
    let runner = PipelineRunner::new(executor);
    let result = runner.run(&pipeline_of(commands), &test_context()).await;
    (result, log)
}

/// Assert a run succeeded with the expected step count
pub fn assert_success(report: &ExecutionReport, steps_run: usize) {
    assert!(
        report.success,
        "Run should have succeeded, failure: {:?}",
        report.failure
    );
    assert_eq!(report.steps_run, steps_run);
    assert!(report.failure.is_none());
}

/// Assert a run failed at the given step with the given exit code
pub fn assert_failed_at(report: &ExecutionReport, index: usize, exit_code: i32) {
    assert!(!report.success, "Run should have failed");
    assert_eq!(
        report.steps_run, index,
        "Only the steps before the failure count as run"
    );
    let failure = report
        .failure
        .as_ref()
        .unwrap_or_else(|| panic!("Failed report should carry its cause"));
    assert_eq!(failure.index, index);
    assert_eq!(failure.exit_code, Some(exit_code));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_executor_replays_codes() {
        let (result, log) = run_scripted(&["a", "b"], vec![0, 3]).await;
        let report = result.unwrap();

        assert_failed_at(&report, 1, 3);
        assert_eq!(log.commands(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_scripted_executor_defaults_to_success() {
        let (result, log) = run_scripted(&["a", "b", "c"], vec![]).await;
        assert_success(&result.unwrap(), 3);
        assert_eq!(log.count(), 3);
    }
}
