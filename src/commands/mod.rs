//! Command implementations for the mcs CLI.
//!
//! This module contains the business logic for each CLI command.
//! Commands are organized by area:
//! - `settings` - Apply templates and inspect settings ownership
//! - `project` - Project root detection and configured packs
//! - `config` - Resolved configuration

mod config;
mod project;
mod settings;

pub use config::{ConfigEntry, ConfigInitResult, ConfigShowResult, config_init, config_show};
pub use project::{
    AddPackResult, PacksResult, ProjectRootResult, project_add_pack, project_packs, project_root,
};
pub use settings::{
    ApplyResult, OwnedKey, ReleaseResult, SettingsContext, StaleResult, StatusResult,
    settings_apply, settings_release, settings_stale, settings_status,
};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Append a titled list for human output. Empty lists are omitted.
fn human_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("{} ({}):\n", title, items.len()));
    for item in items {
        out.push_str(&format!("  {}\n", item));
    }
}
