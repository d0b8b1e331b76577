//! Project discovery and per-project bookkeeping.

pub mod state;

pub use state::{PROJECT_STATE_FILE, ProjectState};

use std::path::{Path, PathBuf};

/// Marker file that makes a directory a project root even without git.
pub const LOCAL_MARKER_FILE: &str = "CLAUDE.local.md";

/// Find the project root by walking up from `start`.
///
/// The first directory containing a `.git` directory or a `CLAUDE.local.md`
/// file wins. Returns `None` if the walk reaches the filesystem root.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").is_dir() || dir.join(LOCAL_MARKER_FILE).is_file() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
