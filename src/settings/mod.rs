//! Settings templates and the live settings file.
//!
//! A [`Settings`] value is the declarative template mcs wants applied to
//! `~/.claude/settings.json`. It only models the fields mcs is allowed to
//! manage; everything else in the live file belongs to the user and is
//! handled as opaque JSON by [`LiveSettings`].
//!
//! # Template JSON
//!
//! ```json
//! {
//!   "env": { "CLAUDE_CODE_DISABLE_AUTO_MEMORY": "1" },
//!   "permissions": { "defaultMode": "plan" },
//!   "hooks": { "SessionStart": [ { "hooks": [ { "type": "command", "command": "mcs hook" } ] } ] },
//!   "enabledPlugins": { "swift-lsp@claude-plugins-official": true },
//!   "alwaysThinkingEnabled": true
//! }
//! ```

pub mod key_paths;
pub mod live;

pub use key_paths::{KEY_RULES, KeyRule, RuleKind, flatten, key_paths, segments};
pub use live::{ApplyReport, LiveSettings};

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Permission settings mcs may manage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    /// Default permission mode (e.g., "plan", "acceptEdits")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<String>,
}

/// A settings template.
///
/// Unset fields contribute nothing to the managed key set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Environment variables exported to every session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,

    /// Hook definitions keyed by event name; the definitions themselves are opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<BTreeMap<String, Value>>,

    /// Plugin enablement keyed by plugin id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_plugins: Option<BTreeMap<String, bool>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_thinking_enabled: Option<bool>,
}

impl Settings {
    /// Create an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a template from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a template from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Key paths this template manages, in rule order.
    pub fn key_paths(&self) -> Vec<String> {
        key_paths(self)
    }

    /// The template's value for a derived key path.
    pub fn value_at(&self, key_path: &str) -> Option<Value> {
        flatten(self)
            .into_iter()
            .find(|(path, _)| path == key_path)
            .map(|(_, value)| value)
    }

    /// Check if the template sets nothing mcs would manage.
    pub fn is_empty(&self) -> bool {
        key_paths(self).is_empty()
    }
}
