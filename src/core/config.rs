//! Pipeline configuration from YAML

use crate::core::{Pipeline, Step};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors detected while building a pipeline, before any step runs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("pipeline has no steps")]
    NoSteps,

    #[error("step {index} has an empty command")]
    MissingCommand { index: usize },
}

/// Policy for the final formatting step of the built-in pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
    /// Rewrite sources in place
    #[default]
    Fix,
    /// Fail on formatting drift, leaving the tree untouched
    Check,
}

/// Top-level pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    pub name: String,

    /// Variables applied to every step (steps may override individually)
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Ordered pipeline steps
    pub steps: Vec<StepConfig>,
}

/// Step configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Human-readable step name
    #[serde(default)]
    pub name: Option<String>,

    /// Executable to invoke
    pub command: String,

    /// Arguments passed to the executable
    #[serde(default)]
    pub args: Vec<String>,

    /// Environment variable overrides for this step
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Working directory override for this step
    #[serde(default)]
    pub cwd: Option<PathBuf>,
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration before any step runs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps.is_empty() {
            return Err(ConfigError::NoSteps);
        }
        for (index, step) in self.steps.iter().enumerate() {
            if step.command.trim().is_empty() {
                return Err(ConfigError::MissingCommand { index });
            }
        }
        Ok(())
    }

    /// Build the immutable pipeline this configuration describes
    pub fn to_pipeline(&self) -> Result<Pipeline, ConfigError> {
        let steps: Vec<Step> = self
            .steps
            .iter()
            .map(|step| Step::from_config(step, &self.env))
            .collect();
        Pipeline::configure(&self.name, steps)
    }
}
