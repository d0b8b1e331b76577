//! CLI argument definitions for mcs.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mcs - Manage Claude settings without clobbering your own.
///
/// Start with `mcs settings apply <template>`; `mcs settings status` shows what mcs owns.
#[derive(Parser, Debug)]
#[command(name = "mcs")]
#[command(author, version, about = "Manage Claude settings safely across user edits and upgrades", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Run as if mcs was started in <path> instead of the current directory.
    /// The path must exist and is used as the project root literally.
    /// Can also be set via MCS_PROJECT environment variable.
    #[arg(short = 'C', long = "project", global = true, env = "MCS_PROJECT")]
    pub project_path: Option<PathBuf>,

    /// Directory holding settings.json and the ownership ledger.
    /// Overrides MCS_CLAUDE_DIR and config files.
    #[arg(long = "claude-dir", global = true)]
    pub claude_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Settings template and ownership commands
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Project root and configured pack commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show version and build information
    Version,
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Apply a settings template to settings.json
    ///
    /// Keys mcs wrote before are updated or removed; keys you set yourself are kept.
    Apply {
        /// Path to the template JSON file
        template: PathBuf,

        /// Preview changes without writing any files
        #[arg(long)]
        dry_run: bool,

        /// Replace user values at template keys mcs does not own yet
        #[arg(long)]
        overwrite_unmanaged: bool,
    },

    /// List settings keys managed by mcs
    Status,

    /// List managed keys a template no longer contains
    Stale {
        /// Path to the template JSON file
        #[arg(long)]
        template: PathBuf,
    },

    /// Stop managing keys, leaving their values in settings.json
    Release {
        /// Key paths to release (e.g., env.FOO, hooks.PreToolUse)
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Print the detected project root
    Root,

    /// List packs configured for this project
    Packs,

    /// Record a pack as configured for this project
    AddPack {
        /// Pack name
        pack: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration values and their sources
    Show,

    /// Write the resolved configuration to the system config file
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}
