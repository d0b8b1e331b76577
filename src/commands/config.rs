//! `mcs config` commands.

use super::Output;
use crate::config::{McsConfig, ResolvedConfig, ValueSource, write_config};
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}

#[derive(Serialize)]
pub struct ConfigShowResult {
    pub system_config: Option<PathBuf>,
    pub project_config: Option<PathBuf>,
    pub values: Vec<ConfigEntry>,
}

impl Output for ConfigShowResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let width = self.values.iter().map(|e| e.key.len()).max().unwrap_or(0);
        let mut lines: Vec<String> = self
            .values
            .iter()
            .map(|e| format!("{:width$}  {}  ({})", e.key, e.value, e.source, width = width))
            .collect();
        if let Some(ref path) = self.system_config {
            lines.push(format!("system config: {}", path.display()));
        }
        if let Some(ref path) = self.project_config {
            lines.push(format!("project config: {}", path.display()));
        }
        lines.join("\n")
    }
}

/// Show resolved configuration values and where each came from.
pub fn config_show(
    resolved: &ResolvedConfig,
    system_config: Option<PathBuf>,
    project_config: Option<PathBuf>,
) -> Result<ConfigShowResult> {
    let values = vec![
        ConfigEntry {
            key: "claude-dir".to_string(),
            value: resolved.claude_dir().display().to_string(),
            source: resolved.claude_dir.source.to_string(),
        },
        ConfigEntry {
            key: "output-format".to_string(),
            value: resolved.output_format().to_string(),
            source: resolved.output_format.source.to_string(),
        },
        ConfigEntry {
            key: "conflict-policy".to_string(),
            value: resolved.conflict_policy().to_string(),
            source: resolved.conflict_policy.source.to_string(),
        },
    ];

    Ok(ConfigShowResult {
        system_config,
        project_config,
        values,
    })
}

#[derive(Serialize)]
pub struct ConfigInitResult {
    pub path: PathBuf,
    pub config: McsConfig,
}

impl Output for ConfigInitResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        format!("Wrote {}", self.path.display())
    }
}

/// Write the resolved configuration to `path`.
///
/// The claude dir is only written when it was set explicitly, so the file
/// keeps following the home directory otherwise. Refuses to replace an
/// existing file unless `force` is set.
pub fn config_init(path: &Path, resolved: &ResolvedConfig, force: bool) -> Result<ConfigInitResult> {
    if path.exists() && !force {
        return Err(Error::InvalidInput(format!(
            "{} already exists (use --force to replace it)",
            path.display()
        )));
    }

    let config = McsConfig {
        claude_dir: (resolved.claude_dir.source != ValueSource::Default)
            .then(|| resolved.claude_dir().to_path_buf()),
        output_format: Some(resolved.output_format()),
        conflict_policy: Some(resolved.conflict_policy()),
    };
    write_config(path, &config)?;
    tracing::info!(path = %path.display(), "wrote config");

    Ok(ConfigInitResult {
        path: path.to_path_buf(),
        config,
    })
}
