//! CLI output formatting

use crate::core::ExecutionStatus;
use crate::execution::{ExecutionEvent, ExecutionReport};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar over the pipeline's steps
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format an execution status for display
pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::NotStarted => style("NOT STARTED").dim().to_string(),
        ExecutionStatus::Running => style("RUNNING").yellow().to_string(),
        ExecutionStatus::Succeeded => style("SUCCEEDED").green().to_string(),
        ExecutionStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format an execution event for display
pub fn format_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name,
            total_steps,
        } => format!(
            "{} Starting pipeline {} ({}) with {} steps",
            ROCKET,
            style(pipeline_name).bold(),
            style(&execution_id.to_string()[..8]).dim(),
            total_steps
        ),
        ExecutionEvent::StepStarted { index, name, command } => format!(
            "{} [{}] {} {}",
            SPINNER,
            index,
            style(name).cyan(),
            style(format!("$ {}", command)).dim()
        ),
        ExecutionEvent::StepOutput { name, output, .. } => {
            let mut rendered = String::new();
            if !output.stdout.trim().is_empty() {
                rendered.push_str(output.stdout.trim_end());
            }
            if !output.stderr.trim().is_empty() {
                if !rendered.is_empty() {
                    rendered.push('\n');
                }
                rendered.push_str(output.stderr.trim_end());
            }
            if rendered.is_empty() {
                format!("{} {} produced no output", INFO, style(name).dim())
            } else {
                format!("{} Output from {}:\n{}", INFO, style(name).dim(), rendered)
            }
        }
        ExecutionEvent::StepCompleted { index, name, duration_ms } => format!(
            "{} [{}] {} ({}ms)",
            CHECK,
            index,
            style(name).green(),
            duration_ms
        ),
        ExecutionEvent::StepFailed { index, name, exit_code } => {
            let code = exit_code.map_or_else(|| "killed by signal".to_string(), |c| format!("exit code {}", c));
            format!("{} [{}] {}: {}", CROSS, index, style(name).red(), style(code).dim())
        }
        ExecutionEvent::PipelineCompleted { execution_id, success } => {
            let outcome = if *success {
                format!("completed {}", style("successfully").green())
            } else {
                style("failed").red().to_string()
            };
            format!(
                "{} Pipeline ({}) {}",
                INFO,
                style(&execution_id.to_string()[..8]).dim(),
                outcome
            )
        }
    }
}

/// One-line summary of a finished run
pub fn format_report(report: &ExecutionReport) -> String {
    format!(
        "{} {} - {} - {}/{} steps",
        style(&report.execution_id.to_string()[..8]).dim(),
        style(&report.pipeline).bold(),
        format_status(report.status()),
        report.steps_run,
        report.total_steps
    )
}
