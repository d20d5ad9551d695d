//! Step domain model

use crate::core::config::StepConfig;
use std::collections::HashMap;
use std::path::PathBuf;

/// A single step in a pipeline: one external command treated as an
/// atomic, ordered unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Human-readable label shown in output
    pub name: String,

    /// Executable to invoke
    pub command: String,

    /// Arguments passed to the executable
    pub args: Vec<String>,

    /// Environment variable overrides applied to this step only
    pub env: HashMap<String, String>,

    /// Working directory override for this step only
    pub cwd: Option<PathBuf>,
}

impl Step {
    /// Create a step labelled with its own command line
    pub fn new<S, I>(command: S, args: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let command = command.into();
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let name = render_command_line(&command, &args);
        Step {
            name,
            command,
            args,
            env: HashMap::new(),
            cwd: None,
        }
    }

    /// Create a step with an explicit label
    pub fn named<N, S, I>(name: N, command: S, args: I) -> Self
    where
        N: Into<String>,
        S: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut step = Self::new(command, args);
        step.name = name.into();
        step
    }

    /// Add an environment variable override
    pub fn with_env<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set a working directory override
    pub fn in_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Create a step from a step config, merging pipeline-wide variables
    /// under the step's own overrides
    pub fn from_config(config: &StepConfig, shared_env: &HashMap<String, String>) -> Self {
        let mut env = shared_env.clone();
        env.extend(config.env.clone());

        let name = config
            .name
            .clone()
            .unwrap_or_else(|| render_command_line(&config.command, &config.args));

        Step {
            name,
            command: config.command.clone(),
            args: config.args.clone(),
            env,
            cwd: config.cwd.clone(),
        }
    }

    /// Rendered command line, for display and reports
    pub fn command_line(&self) -> String {
        render_command_line(&self.command, &self.args)
    }
}

fn render_command_line(command: &str, args: &[String]) -> String {
    std::iter::once(command.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}
