//! Settings ownership ledger.
//!
//! Tracks which settings keys were written by mcs and at what version, so a
//! later run can tell its own keys apart from keys the user added.
//!
//! The ledger is a line-based sidecar at `~/.claude/.mcs-settings-keys`:
//!
//! ```text
//! # mcs settings ownership — do not edit manually
//! # version=2.0.0
//! alwaysThinkingEnabled=2.0.0
//! env.CLAUDE_CODE_DISABLE_AUTO_MEMORY=2.0.0
//! permissions.defaultMode=2.0.0
//! ```
//!
//! - **Remove**: a key in the ledger but not in the new template is owned by mcs
//!   and can be removed.
//! - **Update**: a key in both can be overwritten (mcs owns it).
//! - **Preserve**: a key not in the ledger is never claimed implicitly.
//!
//! Loading is lenient: a missing, unreadable, or partly garbled sidecar yields
//! whatever entries can be proven, never an error. Saving is strict and atomic.

pub mod reconcile;

pub use reconcile::{ReconciliationPlan, classify, classify_paths, stale_keys};

use crate::Result;
use crate::settings::{Settings, key_paths};
use crate::storage::write_atomic;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// First line of every saved ledger.
pub const HEADER: &str = "# mcs settings ownership — do not edit manually";

/// Check if `key_path` survives a save/load cycle unchanged.
///
/// The sidecar is `key=version` per trimmed line, so a key path must be
/// non-empty and must not contain `=` or a line break, start with `#`, or carry
/// surrounding whitespace.
pub fn is_recordable(key_path: &str) -> bool {
    !key_path.is_empty()
        && !key_path.contains(['=', '\n', '\r'])
        && !key_path.starts_with('#')
        && key_path.trim() == key_path
}

/// Key path → version of mcs that last wrote it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOwnership {
    entries: BTreeMap<String, String>,
}

impl SettingsOwnership {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the ledger at `path`.
    ///
    /// Returns an empty ledger if the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "ignoring unreadable settings ownership file"
                );
                Self::new()
            }
        }
    }

    /// Parse ledger text, skipping comments, blank lines, and lines without `=`.
    pub fn parse(content: &str) -> Self {
        let mut ownership = Self::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('=') {
                Some((key_path, version)) if is_recordable(key_path) => {
                    ownership.entries.insert(key_path.to_string(), version.to_string());
                }
                _ => {
                    tracing::debug!(line = index + 1, "skipping malformed ownership line");
                }
            }
        }
        ownership
    }

    /// Serialize the ledger, stamping the header with `manager_version`.
    pub fn to_file_contents(&self, manager_version: &str) -> String {
        let mut out = String::new();
        out.push_str(HEADER);
        out.push('\n');
        out.push_str(&format!("# version={}\n", manager_version));
        for (key_path, version) in &self.entries {
            out.push_str(&format!("{}={}\n", key_path, version));
        }
        out
    }

    /// Save the ledger atomically, creating parent directories as needed.
    pub fn save(&self, path: &Path, manager_version: &str) -> Result<()> {
        write_atomic(path, self.to_file_contents(manager_version).as_bytes())?;
        tracing::info!(
            path = %path.display(),
            keys = self.entries.len(),
            "saved settings ownership"
        );
        Ok(())
    }

    /// Record that mcs manages `key_path` at `version`. Last write wins.
    ///
    /// Key paths the sidecar cannot represent are refused and return false.
    pub fn record(&mut self, key_path: &str, version: &str) -> bool {
        if !is_recordable(key_path) {
            tracing::warn!(key = ?key_path, "refusing to own a key path the ledger cannot store");
            return false;
        }
        self.entries
            .insert(key_path.to_string(), version.to_string());
        true
    }

    /// Release ownership of `key_path`. No-op if it is not owned.
    pub fn remove(&mut self, key_path: &str) -> bool {
        self.entries.remove(key_path).is_some()
    }

    /// Check if mcs owns `key_path`.
    pub fn owns(&self, key_path: &str) -> bool {
        self.entries.contains_key(key_path)
    }

    /// The version at which mcs last wrote `key_path`.
    pub fn version_of(&self, key_path: &str) -> Option<&str> {
        self.entries.get(key_path).map(String::as_str)
    }

    /// All managed key paths, sorted.
    pub fn managed_keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// `(key path, version)` pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record every key path derived from `template` at `version`.
    ///
    /// Call only once those values are actually in the live settings file.
    pub fn record_all(&mut self, template: &Settings, version: &str) {
        for key_path in key_paths(template) {
            self.record(&key_path, version);
        }
    }

    /// Owned keys that `current_template` no longer contains.
    pub fn stale_keys(&self, current_template: &Settings) -> Vec<String> {
        stale_keys(self, current_template)
    }
}
