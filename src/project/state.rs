//! Per-project record of which packs mcs has configured.
//!
//! Stored as JSON at `<project-root>/.claude/.mcs-project`:
//!
//! ```json
//! {
//!   "mcs_version": "0.3.0",
//!   "configured_packs": ["ios", "web"],
//!   "updated_at": "2026-10-16T09:00:00Z"
//! }
//! ```
//!
//! Packs only accumulate: each save merges into what was loaded.

use crate::Result;
use crate::storage::{PROJECT_DIR, write_atomic};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the project state inside `<project-root>/.claude/`.
pub const PROJECT_STATE_FILE: &str = ".mcs-project";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StateFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mcs_version: Option<String>,
    #[serde(default)]
    configured_packs: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// Configured-pack state for one project.
#[derive(Debug, Clone)]
pub struct ProjectState {
    path: PathBuf,
    exists: bool,
    data: StateFile,
}

impl ProjectState {
    /// Load the state for `project_root`.
    ///
    /// A missing or unreadable file yields an empty state.
    pub fn load(project_root: &Path) -> Self {
        let path = project_root.join(PROJECT_DIR).join(PROJECT_STATE_FILE);
        let (exists, data) = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(data) => (true, data),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt project state");
                    (true, StateFile::default())
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => (false, StateFile::default()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable project state");
                (false, StateFile::default())
            }
        };
        Self { path, exists, data }
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the state file existed when loaded (or has been saved since).
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Packs configured for this project, sorted.
    pub fn configured_packs(&self) -> &BTreeSet<String> {
        &self.data.configured_packs
    }

    /// Version of mcs that last saved this state.
    pub fn mcs_version(&self) -> Option<&str> {
        self.data.mcs_version.as_deref()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.data.updated_at
    }

    /// Record a configured pack. Returns false if it was already recorded.
    pub fn record_pack(&mut self, pack: &str) -> bool {
        self.data.configured_packs.insert(pack.to_string())
    }

    /// Save the state atomically, stamping it with `version`.
    pub fn save(&mut self, version: &str) -> Result<()> {
        self.data.mcs_version = Some(version.to_string());
        self.data.updated_at = Some(Utc::now());

        let mut json = serde_json::to_string_pretty(&self.data)?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes())?;

        self.exists = true;
        tracing::info!(path = %self.path.display(), packs = self.data.configured_packs.len(), "saved project state");
        Ok(())
    }
}
