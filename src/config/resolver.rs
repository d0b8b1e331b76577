//! Unified precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. `MCS_CLAUDE_DIR` environment variable (claude dir only)
//! 3. Project config (`<project-root>/.claude/mcs.kdl`)
//! 4. System config (`~/.config/mcs/config.kdl`)
//! 5. Built-in defaults

use super::{McsConfig, project_config_path, read_config, system_config_path};
use crate::Result;
use crate::config::{ConflictPolicy, OutputFormat};
use crate::storage::{CLAUDE_DIR_ENV, default_claude_dir};
use std::path::{Path, PathBuf};

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from the project config
    Project,
    /// Value from the system config
    System,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::Project => write!(f, "project"),
            ValueSource::System => write!(f, "system"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory holding settings.json and the ownership ledger
    pub claude_dir: Resolved<PathBuf>,
    pub output_format: Resolved<OutputFormat>,
    pub conflict_policy: Resolved<ConflictPolicy>,
}

impl ResolvedConfig {
    pub fn claude_dir(&self) -> &Path {
        &self.claude_dir.value
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.conflict_policy.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub claude_dir: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
    pub conflict_policy: Option<ConflictPolicy>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_claude_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.claude_dir = Some(dir.into());
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = Some(policy);
        self
    }
}

/// Resolve configuration with the full precedence chain.
///
/// Reads the system config, the project config (when a project root is
/// known), and the `MCS_CLAUDE_DIR` environment variable.
pub fn resolve_config(
    project_root: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ResolvedConfig> {
    let system_config = match system_config_path() {
        Some(path) => read_config(&path)?,
        None => McsConfig::new(),
    };

    let project_config = match project_root {
        Some(root) => read_config(&project_config_path(root))?,
        None => McsConfig::new(),
    };

    let env_claude_dir = std::env::var(CLAUDE_DIR_ENV)
        .ok()
        .filter(|dir| !dir.is_empty());

    resolve_config_with_env(overrides, env_claude_dir, &project_config, &system_config)
}

/// Resolve configuration from already loaded layers.
///
/// The home directory is only consulted when no layer sets the claude dir.
pub fn resolve_config_with_env(
    overrides: &ConfigOverrides,
    env_claude_dir: Option<String>,
    project_config: &McsConfig,
    system_config: &McsConfig,
) -> Result<ResolvedConfig> {
    let claude_dir = if let Some(ref dir) = overrides.claude_dir {
        Resolved::new(dir.clone(), ValueSource::CliFlag)
    } else if let Some(dir) = env_claude_dir {
        Resolved::new(
            PathBuf::from(dir),
            ValueSource::EnvVar(CLAUDE_DIR_ENV.to_string()),
        )
    } else if let Some(ref dir) = project_config.claude_dir {
        Resolved::new(dir.clone(), ValueSource::Project)
    } else if let Some(ref dir) = system_config.claude_dir {
        Resolved::new(dir.clone(), ValueSource::System)
    } else {
        Resolved::new(default_claude_dir()?, ValueSource::Default)
    };

    let output_format = pick(
        overrides.output_format,
        project_config.output_format,
        system_config.output_format,
    );

    let conflict_policy = pick(
        overrides.conflict_policy,
        project_config.conflict_policy,
        system_config.conflict_policy,
    );

    Ok(ResolvedConfig {
        claude_dir,
        output_format,
        conflict_policy,
    })
}

fn pick<T: Default>(cli: Option<T>, project: Option<T>, system: Option<T>) -> Resolved<T> {
    if let Some(value) = cli {
        Resolved::new(value, ValueSource::CliFlag)
    } else if let Some(value) = project {
        Resolved::new(value, ValueSource::Project)
    } else if let Some(value) = system {
        Resolved::new(value, ValueSource::System)
    } else {
        Resolved::new(T::default(), ValueSource::Default)
    }
}
