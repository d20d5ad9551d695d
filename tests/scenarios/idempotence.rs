//! Test: running the same pipeline twice leaks nothing between runs

use crate::helpers::*;
use checkline::execution::PipelineRunner;

#[tokio::test]
async fn test_two_runs_produce_independent_reports() {
    let pipeline = pipeline_of(&["a", "b", "c"]);

    let executor = ScriptedExecutor::new(vec![0, 0, 0, 0, 0, 0]);
    let log = executor.call_log();
    let runner = PipelineRunner::new(executor);

    let first = runner.run(&pipeline, &test_context()).await.unwrap();
    let second = runner.run(&pipeline, &test_context()).await.unwrap();

    assert_success(&first, 3);
    assert_success(&second, 3);

    // Each run re-executes every step; nothing is memoized
    assert_eq!(log.count(), 6);

    // Fresh state per run
    assert_ne!(first.execution_id, second.execution_id);
    assert!(second.started_at >= first.started_at);
}

#[tokio::test]
async fn test_second_run_can_fail_independently() {
    let pipeline = pipeline_of(&["a", "b"]);

    let executor = ScriptedExecutor::new(vec![0, 0, 0, 5]);
    let runner = PipelineRunner::new(executor);

    let first = runner.run(&pipeline, &test_context()).await.unwrap();
    let second = runner.run(&pipeline, &test_context()).await.unwrap();

    assert_success(&first, 2);
    assert_failed_at(&second, 1, 5);
    // The first report is untouched by the second run
    assert!(first.success);
}
