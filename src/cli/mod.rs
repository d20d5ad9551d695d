//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{RunCommand, StepsCommand, ValidateCommand};

/// Fail-fast build and verification pipeline
#[derive(Debug, Parser, Clone)]
#[command(name = "checkline")]
#[command(version = "0.1.0")]
#[command(about = "Provision, build, test, and format a project, stopping at the first failure", long_about = None)]
pub struct Cli {
    /// With no subcommand, the built-in pipeline is run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging and full step output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a pipeline (the default)
    Run(RunCommand),

    /// Validate a pipeline definition without running it
    Validate(ValidateCommand),

    /// Print the resolved step list
    Steps(StepsCommand),
}

impl Cli {
    /// Parse CLI arguments from the environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;
