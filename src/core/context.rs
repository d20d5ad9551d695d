//! Execution environment - explicit variables and working directory

use crate::core::Step;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Immutable snapshot of the environment a step runs against
///
/// Steps communicate through the filesystem and installed tools, never
/// through ambient process state; modelling the variables and working
/// directory as an explicit value keeps every invocation auditable and
/// testable in isolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentContext {
    vars: HashMap<String, String>,
    cwd: PathBuf,
}

impl EnvironmentContext {
    /// Build a context from explicit variables and a working directory
    pub fn new(vars: HashMap<String, String>, cwd: PathBuf) -> Self {
        Self { vars, cwd }
    }

    /// Snapshot the calling process's environment variables and working
    /// directory
    pub fn inherit() -> std::io::Result<Self> {
        Ok(Self {
            vars: std::env::vars().collect(),
            cwd: std::env::current_dir()?,
        })
    }

    /// All variables in this context
    pub fn vars(&self) -> &HashMap<String, String> {
        &self.vars
    }

    /// Look up a single variable
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// The working directory commands run in
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Derive the context for one step invocation: the step's overrides
    /// merged on top, the base context left untouched
    pub fn for_step(&self, step: &Step) -> EnvironmentContext {
        let mut vars = self.vars.clone();
        for (key, value) in &step.env {
            vars.insert(key.clone(), value.clone());
        }

        EnvironmentContext {
            vars,
            cwd: step.cwd.clone().unwrap_or_else(|| self.cwd.clone()),
        }
    }
}
