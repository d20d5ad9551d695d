//! Command executor - invokes external commands and captures outcomes

use crate::core::EnvironmentContext;
use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// A configured command could not be located or launched at all
///
/// Distinct from a command that ran and exited non-zero; that outcome
/// travels through [`ExecutionResult::Failed`] instead.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    #[error("failed to launch {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Captured output streams of a finished command, kept for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Outcome of running a single command to completion
#[derive(Debug, Clone)]
pub enum ExecutionResult {
    /// The command exited with status zero
    Success { output: CommandOutput },

    /// The command ran to completion but exited non-zero. `exit_code` is
    /// `None` when the child was killed by a signal.
    Failed {
        exit_code: Option<i32>,
        output: CommandOutput,
    },
}

impl ExecutionResult {
    /// Check whether the command exited zero
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    /// Captured output, whichever way the command ended
    pub fn output(&self) -> &CommandOutput {
        match self {
            ExecutionResult::Success { output } => output,
            ExecutionResult::Failed { output, .. } => output,
        }
    }
}

/// Capability for invoking external commands
///
/// The runner never talks to the operating system directly; tests
/// substitute an implementation that returns scripted exit codes without
/// spawning real processes.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run one command to completion against the given environment
    async fn execute(
        &self,
        command: &str,
        args: &[String],
        ctx: &EnvironmentContext,
    ) -> Result<ExecutionResult, EnvironmentError>;
}

/// Executor that spawns real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for SystemExecutor {
    async fn execute(
        &self,
        command: &str,
        args: &[String],
        ctx: &EnvironmentContext,
    ) -> Result<ExecutionResult, EnvironmentError> {
        debug!("Spawning {} with {} args", command, args.len());

        // The context is the entire child environment; nothing ambient
        // leaks through.
        let output = Command::new(command)
            .args(args)
            .env_clear()
            .envs(ctx.vars())
            .current_dir(ctx.cwd())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => EnvironmentError::CommandNotFound {
                    command: command.to_string(),
                },
                _ => EnvironmentError::Spawn {
                    command: command.to_string(),
                    source,
                },
            })?;

        let captured = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if output.status.success() {
            debug!("{} exited cleanly", command);
            Ok(ExecutionResult::Success { output: captured })
        } else {
            let exit_code = output.status.code();
            warn!("{} exited with code {:?}", command, exit_code);
            Ok(ExecutionResult::Failed {
                exit_code,
                output: captured,
            })
        }
    }
}
