//! File locations and durable writes for mcs state.
//!
//! mcs keeps its machine-level state next to the files it governs:
//!
//! - `<claude-dir>/settings.json` - the live settings file (shared with the user)
//! - `<claude-dir>/.mcs-settings-keys` - the ownership ledger sidecar
//!
//! and per-project state under `<project-root>/.claude/`.
//!
//! Every write goes through [`write_atomic`] so a concurrent `mcs` process
//! never observes a half-written file.

use crate::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable overriding the claude directory (`~/.claude`).
pub const CLAUDE_DIR_ENV: &str = "MCS_CLAUDE_DIR";

/// Environment variable overriding the system config directory (`~/.config/mcs`).
pub const CONFIG_DIR_ENV: &str = "MCS_CONFIG_DIR";

/// File name of the live settings document inside the claude directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// File name of the ownership ledger sidecar inside the claude directory.
pub const OWNERSHIP_FILE: &str = ".mcs-settings-keys";

/// Directory (relative to a project root) holding per-project mcs files.
pub const PROJECT_DIR: &str = ".claude";

/// Default claude directory: `~/.claude`.
pub fn default_claude_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::Other("Could not determine home directory".to_string()))?;
    Ok(home.join(".claude"))
}

/// System configuration directory.
///
/// `MCS_CONFIG_DIR` wins when set and non-empty, otherwise `<config-dir>/mcs`.
pub fn system_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    dirs::config_dir().map(|d| d.join("mcs"))
}

/// Path of the live settings file for a claude directory.
pub fn settings_path(claude_dir: &Path) -> PathBuf {
    claude_dir.join(SETTINGS_FILE)
}

/// Path of the ownership ledger for a claude directory.
pub fn ownership_path(claude_dir: &Path) -> PathBuf {
    claude_dir.join(OWNERSHIP_FILE)
}

/// Replace `path` with `contents` atomically.
///
/// The data is written to a temp file in the target's directory, synced, then
/// renamed over the target. Missing parent directories are created.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file atomically");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        write_atomic(&path, b"hello\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_write_atomic_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_atomic_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("out.txt");

        write_atomic(&path, b"data").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        write_atomic(&path, b"data").unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_atomic_fails_when_parent_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let result = write_atomic(&blocker.join("out.txt"), b"data");

        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_paths_inside_claude_dir() {
        let dir = Path::new("/home/me/.claude");
        assert_eq!(settings_path(dir), dir.join("settings.json"));
        assert_eq!(ownership_path(dir), dir.join(".mcs-settings-keys"));
    }
}
