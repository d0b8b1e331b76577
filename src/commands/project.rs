//! `mcs project` commands.

use super::Output;
use crate::project::{ProjectState, find_project_root};
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
pub struct ProjectRootResult {
    pub root: PathBuf,
}

impl Output for ProjectRootResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        self.root.display().to_string()
    }
}

/// Report the project root: `explicit` as given, otherwise the nearest root above `start`.
pub fn project_root(explicit: Option<&Path>, start: &Path) -> Result<ProjectRootResult> {
    if let Some(root) = explicit {
        return Ok(ProjectRootResult {
            root: root.to_path_buf(),
        });
    }
    find_project_root(start)
        .map(|root| ProjectRootResult { root })
        .ok_or_else(|| {
            Error::NotFound(format!(
                "no project root (.git or CLAUDE.local.md) above {}",
                start.display()
            ))
        })
}

#[derive(Serialize)]
pub struct PacksResult {
    pub project_root: PathBuf,
    pub initialized: bool,
    pub mcs_version: Option<String>,
    pub packs: Vec<String>,
}

impl Output for PacksResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if !self.initialized {
            return format!("Project {} has not been configured by mcs", self.project_root.display());
        }
        let mut lines = vec![format!(
            "{} pack(s) configured in {} (mcs {}):",
            self.packs.len(),
            self.project_root.display(),
            self.mcs_version.as_deref().unwrap_or("unknown")
        )];
        lines.extend(self.packs.iter().map(|pack| format!("  {}", pack)));
        lines.join("\n")
    }
}

/// List the packs configured for the project at `root`.
pub fn project_packs(root: &Path) -> Result<PacksResult> {
    let state = ProjectState::load(root);
    Ok(PacksResult {
        project_root: root.to_path_buf(),
        initialized: state.exists(),
        mcs_version: state.mcs_version().map(String::from),
        packs: state.configured_packs().iter().cloned().collect(),
    })
}

#[derive(Serialize)]
pub struct AddPackResult {
    pub pack: String,
    pub added: bool,
    pub packs: Vec<String>,
}

impl Output for AddPackResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.added {
            format!("Recorded pack {} ({} configured)", self.pack, self.packs.len())
        } else {
            format!("Pack {} already recorded", self.pack)
        }
    }
}

/// Record `pack` as configured for the project at `root`.
pub fn project_add_pack(root: &Path, pack: &str, version: &str) -> Result<AddPackResult> {
    let pack = pack.trim();
    if pack.is_empty() {
        return Err(Error::InvalidInput("pack name cannot be empty".to_string()));
    }

    let mut state = ProjectState::load(root);
    let added = state.record_pack(pack);
    state.save(version)?;

    Ok(AddPackResult {
        pack: pack.to_string(),
        added,
        packs: state.configured_packs().iter().cloned().collect(),
    })
}
