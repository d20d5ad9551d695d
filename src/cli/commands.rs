//! CLI command definitions

use crate::core::config::FormatMode;
use clap::Args;

/// Run a pipeline
#[derive(Debug, Args, Clone, Default)]
pub struct RunCommand {
    /// Path to a pipeline YAML file (defaults to the built-in sequence)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Policy for the built-in formatting step
    #[arg(long, value_enum, default_value_t = FormatModeArg::Fix)]
    pub format_mode: FormatModeArg,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Validate a pipeline definition
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Print the resolved step list
#[derive(Debug, Args, Clone, Default)]
pub struct StepsCommand {
    /// Path to a pipeline YAML file (defaults to the built-in sequence)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Policy for the built-in formatting step
    #[arg(long, value_enum, default_value_t = FormatModeArg::Fix)]
    pub format_mode: FormatModeArg,
}

/// Formatting policy argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FormatModeArg {
    /// Rewrite sources in place
    #[default]
    Fix,
    /// Fail on formatting drift
    Check,
}

impl From<FormatModeArg> for FormatMode {
    fn from(arg: FormatModeArg) -> Self {
        match arg {
            FormatModeArg::Fix => FormatMode::Fix,
            FormatModeArg::Check => FormatMode::Check,
        }
    }
}
