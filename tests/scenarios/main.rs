//! Scenario tests for the pipeline runner

#[path = "../helpers.rs"]
mod helpers;

mod failure_handling;
mod idempotence;
