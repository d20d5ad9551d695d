//! Pipeline domain model

use crate::core::config::{ConfigError, FormatMode};
use crate::core::step::Step;

/// An immutable, ordered sequence of steps
///
/// Steps execute in exactly this order; later steps assume the side
/// effects of earlier ones (installed packages, compiled artifacts) are
/// already in place.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    steps: Vec<Step>,
}

impl Pipeline {
    /// Build a pipeline from a caller-supplied ordered step list
    ///
    /// Fails with [`ConfigError::NoSteps`] on an empty sequence and with
    /// [`ConfigError::MissingCommand`] when a step has a blank command.
    pub fn configure<N: Into<String>>(name: N, steps: Vec<Step>) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::NoSteps);
        }
        for (index, step) in steps.iter().enumerate() {
            if step.command.trim().is_empty() {
                return Err(ConfigError::MissingCommand { index });
            }
        }

        Ok(Pipeline {
            name: name.into(),
            steps,
        })
    }

    /// Pipeline name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered step sequence
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a configured pipeline; present for completeness
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The built-in provisioning, build, and verification sequence
    ///
    /// Installs the native dependencies the build needs (protobuf codegen
    /// and TLS headers), the version-control client, and the formatter
    /// component, then builds, tests, and formats the project. The
    /// package-manager steps run non-interactively.
    pub fn build_and_verify(format_mode: FormatMode) -> Self {
        let apt = |name: &str, args: &[&str]| {
            Step::named(name, "apt-get", args.iter().copied())
                .with_env("DEBIAN_FRONTEND", "noninteractive")
        };

        let format_step = match format_mode {
            FormatMode::Fix => Step::named("format sources", "cargo", ["fmt", "--all"]),
            FormatMode::Check => {
                Step::named("check formatting", "cargo", ["fmt", "--all", "--", "--check"])
            }
        };

        let steps = vec![
            apt("update package index", &["update", "-y"]),
            apt(
                "install native build dependencies",
                &[
                    "install",
                    "-y",
                    "--no-install-recommends",
                    "protobuf-compiler",
                    "libssl-dev",
                    "pkg-config",
                ],
            ),
            apt("install git", &["install", "-y", "--no-install-recommends", "git"]),
            Step::named("install rustfmt", "rustup", ["component", "add", "rustfmt"]),
            Step::named("build", "cargo", ["build", "--verbose"]),
            Step::named("test", "cargo", ["test", "--verbose"]),
            format_step,
        ];

        Pipeline {
            name: "build-and-verify".to_string(),
            steps,
        }
    }
}
