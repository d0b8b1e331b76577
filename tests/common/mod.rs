//! Common test utilities for mcs integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `~/.claude/` or `~/.config/mcs/` directories.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with isolated directories.
///
/// Each `TestEnv` creates three temporary directories:
/// - `project_dir`: Working directory, acts as the project checkout
/// - `claude_dir`: Holds settings.json and the ledger (via `MCS_CLAUDE_DIR`)
/// - `config_dir`: Holds the system config.kdl (via `MCS_CONFIG_DIR`)
///
/// The `mcs()` method returns a `Command` with these set per-invocation,
/// making tests parallel-safe.
pub struct TestEnv {
    pub project_dir: TempDir,
    pub claude_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            project_dir: TempDir::new().unwrap(),
            claude_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment whose project dir is a git checkout.
    pub fn with_git_project() -> Self {
        let env = Self::new();
        fs::create_dir_all(env.project_path().join(".git")).unwrap();
        env
    }

    /// Get a Command for the mcs binary with isolated directories.
    pub fn mcs(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_mcs"));
        cmd.current_dir(self.project_dir.path());
        cmd.env("MCS_CLAUDE_DIR", self.claude_dir.path());
        cmd.env("MCS_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("MCS_PROJECT");
        cmd.env_remove("MCS_LOG");
        cmd
    }

    pub fn project_path(&self) -> &Path {
        self.project_dir.path()
    }

    pub fn claude_path(&self) -> &Path {
        self.claude_dir.path()
    }

    pub fn config_path(&self) -> &Path {
        self.config_dir.path()
    }

    pub fn settings_file(&self) -> PathBuf {
        self.claude_path().join("settings.json")
    }

    pub fn ledger_file(&self) -> PathBuf {
        self.claude_path().join(".mcs-settings-keys")
    }

    /// Write a template JSON file into the project directory and return its path.
    pub fn write_template(&self, name: &str, json: &str) -> PathBuf {
        let path = self.project_path().join(name);
        fs::write(&path, json).unwrap();
        path
    }

    /// Write the live settings.json.
    pub fn write_settings(&self, json: &str) {
        fs::write(self.settings_file(), json).unwrap();
    }

    /// Parse the live settings.json.
    pub fn read_settings(&self) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(self.settings_file()).unwrap()).unwrap()
    }

    /// Raw contents of the ownership ledger.
    pub fn read_ledger(&self) -> String {
        fs::read_to_string(self.ledger_file()).unwrap()
    }

    /// Write the system config.kdl.
    pub fn write_system_config(&self, kdl: &str) {
        fs::write(self.config_path().join("config.kdl"), kdl).unwrap();
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a command's stdout as JSON.
pub fn parse_json(stdout: &[u8]) -> serde_json::Value {
    serde_json::from_slice(stdout).unwrap()
}
