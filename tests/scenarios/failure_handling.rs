//! Test: the first non-zero exit stops the run

use crate::helpers::*;
use checkline::execution::{PipelineRunner, RunnerError};

#[tokio::test]
async fn test_failure_stops_before_later_steps() {
    let (result, log) = run_scripted(&["true", "false", "true"], vec![0, 1, 0]).await;
    let report = result.unwrap();

    assert_failed_at(&report, 1, 1);
    // The step after the failure is never invoked
    assert_eq!(log.commands(), vec!["true", "false"]);
}

#[tokio::test]
async fn test_first_step_failure_runs_nothing_else() {
    let (result, log) = run_scripted(&["false", "true", "true"], vec![2, 0, 0]).await;
    let report = result.unwrap();

    assert_failed_at(&report, 0, 2);
    assert_eq!(log.count(), 1);
    assert_eq!(report.steps.len(), 1);
}

#[tokio::test]
async fn test_failure_preserves_the_exit_code() {
    let (result, _log) = run_scripted(&["a", "b", "c"], vec![0, 0, 101]).await;
    let report = result.unwrap();

    assert_failed_at(&report, 2, 101);
    let failure = report.failure.unwrap();
    assert_eq!(failure.command, "c");
}

#[tokio::test]
async fn test_failing_record_keeps_stderr_for_diagnosis() {
    let (result, _log) = run_scripted(&["a", "b"], vec![0, 9]).await;
    let report = result.unwrap();

    let record = report.steps.last().unwrap();
    assert_eq!(record.exit_code, Some(9));
    assert!(record
        .stderr_tail
        .as_deref()
        .unwrap()
        .contains("scripted failure"));
}

#[tokio::test]
async fn test_unlaunchable_command_is_an_environment_error() {
    let runner = PipelineRunner::new(MissingCommandExecutor);
    let result = runner
        .run(&pipeline_of(&["ghost-tool"]), &test_context())
        .await;

    match result {
        Err(RunnerError::Environment { index, command, .. }) => {
            assert_eq!(index, 0);
            assert_eq!(command, "ghost-tool");
        }
        other => panic!("Expected an environment error, got {:?}", other.map(|r| r.success)),
    }
}
