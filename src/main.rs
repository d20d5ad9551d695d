use anyhow::{Context, Result};
use checkline::cli::commands::{FormatModeArg, RunCommand, StepsCommand, ValidateCommand};
use checkline::cli::output::{self, style, CHECK, CROSS, INFO};
use checkline::cli::{Cli, Command};
use checkline::core::config::PipelineConfig;
use checkline::core::{EnvironmentContext, Pipeline};
use checkline::execution::{ExecutionEvent, PipelineRunner, SystemExecutor};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command; a bare invocation runs the built-in pipeline
    match cli.command.clone().unwrap_or_else(|| Command::Run(RunCommand::default())) {
        Command::Run(cmd) => run_pipeline(&cmd, &cli).await?,
        Command::Validate(cmd) => validate_pipeline(&cmd)?,
        Command::Steps(cmd) => list_steps(&cmd)?,
    }

    Ok(())
}

fn load_pipeline(file: &Option<String>, format_mode: FormatModeArg) -> Result<Pipeline> {
    match file {
        Some(path) => {
            let config = PipelineConfig::from_file(path)
                .with_context(|| format!("Failed to load pipeline definition from {}", path))?;
            Ok(config.to_pipeline()?)
        }
        None => Ok(Pipeline::build_and_verify(format_mode.into())),
    }
}

async fn run_pipeline(cmd: &RunCommand, cli: &Cli) -> Result<()> {
    let pipeline = load_pipeline(&cmd.file, cmd.format_mode)?;

    println!(
        "{} Loaded pipeline: {} ({} steps)",
        INFO,
        style(pipeline.name()).bold(),
        pipeline.len()
    );

    let ctx = EnvironmentContext::inherit().context("Failed to capture the process environment")?;

    let mut runner = PipelineRunner::new(SystemExecutor::new());

    if cli.verbose {
        runner.add_event_handler(|event| println!("{}", output::format_event(&event)));
    } else {
        let progress = output::create_progress_bar(pipeline.len());
        runner.add_event_handler(move |event| match event {
            ExecutionEvent::StepStarted { name, .. } => progress.set_message(name),
            ExecutionEvent::StepCompleted { .. } => progress.inc(1),
            ExecutionEvent::PipelineCompleted { .. } => progress.finish_and_clear(),
            _ => {}
        });
    }

    println!();
    let report = match runner.run(&pipeline, &ctx).await {
        Ok(report) => report,
        Err(err) => {
            println!("{} {}", CROSS, style(&err).red());
            std::process::exit(1);
        }
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if cli.verbose {
        println!("{}", output::format_report(&report));
    }

    if report.success {
        println!(
            "\n{} {} completed {} ({} steps)",
            CHECK,
            style(pipeline.name()).bold(),
            style("successfully").green(),
            report.steps_run
        );
        return Ok(());
    }

    if let Some(failure) = &report.failure {
        println!(
            "\n{} {} {} at step {}: {}",
            CROSS,
            style(pipeline.name()).bold(),
            style("failed").red(),
            failure.index,
            style(&failure.command).dim()
        );
        if let Some(tail) = report.steps.last().and_then(|r| r.stderr_tail.as_deref()) {
            println!("{}", style(tail).dim());
        }
        // CI callers see the failing step's own exit code
        std::process::exit(failure.exit_code.filter(|c| (1..=255).contains(c)).unwrap_or(1));
    }

    Ok(())
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating pipeline...", INFO);

    match PipelineConfig::from_file(&cmd.file) {
        Ok(config) => {
            println!("{} Pipeline definition is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("  Steps: {}", style(config.steps.len()).cyan());

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

fn list_steps(cmd: &StepsCommand) -> Result<()> {
    let pipeline = load_pipeline(&cmd.file, cmd.format_mode)?;

    println!("{} {} runs:", INFO, style(pipeline.name()).bold());
    for (index, step) in pipeline.steps().iter().enumerate() {
        println!(
            "  {}. {} {}",
            index + 1,
            style(&step.name).cyan(),
            style(format!("$ {}", step.command_line())).dim()
        );
    }

    Ok(())
}
