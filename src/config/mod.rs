//! Configuration for mcs.
//!
//! Preferences live in KDL files at two levels:
//!
//! - System: `~/.config/mcs/config.kdl` (or `$MCS_CONFIG_DIR/config.kdl`)
//! - Project: `<project-root>/.claude/mcs.kdl`
//!
//! Contains:
//! - `claude-dir` - Directory holding `settings.json` and the ownership ledger
//! - `output-format` - "json" or "human"
//! - `conflict-policy` - "preserve" or "overwrite" for unowned keys the user already set
//!
//! ## Precedence
//!
//! CLI flag > environment > project config > system config > defaults
//!
//! Use the [`resolver`] module for unified precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, Resolved, ResolvedConfig, ValueSource, resolve_config,
    resolve_config_with_env,
};
pub use schema::{ConflictPolicy, McsConfig, OutputFormat};

use crate::Result;
use crate::storage::{PROJECT_DIR, system_config_dir, write_atomic};
use kdl::KdlDocument;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the system config inside the config directory.
pub const SYSTEM_CONFIG_FILE: &str = "config.kdl";

/// File name of the project config inside `<project-root>/.claude/`.
pub const PROJECT_CONFIG_FILE: &str = "mcs.kdl";

/// Path of the system config.kdl, if a config directory is known.
pub fn system_config_path() -> Option<PathBuf> {
    system_config_dir().map(|d| d.join(SYSTEM_CONFIG_FILE))
}

/// Path of the project config for a project root.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join(PROJECT_CONFIG_FILE)
}

/// Read a config.kdl file. A missing file is an empty config.
pub fn read_config(path: &Path) -> Result<McsConfig> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let doc: KdlDocument = content.parse()?;
            Ok(McsConfig::from_kdl(&doc))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(McsConfig::new()),
        Err(e) => Err(e.into()),
    }
}

/// Write a config.kdl file atomically.
pub fn write_config(path: &Path, config: &McsConfig) -> Result<()> {
    let mut doc = config.to_kdl();
    doc.autoformat();
    write_atomic(path, doc.to_string().as_bytes())
}
