//! `mcs settings` commands.

use super::{Output, human_list};
use crate::Result;
use crate::config::{ConflictPolicy, ResolvedConfig};
use crate::ownership::{SettingsOwnership, classify};
use crate::settings::{LiveSettings, Settings};
use crate::storage::{ownership_path, settings_path};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything a settings command needs, resolved up front.
#[derive(Debug, Clone)]
pub struct SettingsContext {
    pub claude_dir: PathBuf,
    pub conflict_policy: ConflictPolicy,
    /// Version recorded for keys written by this run
    pub version: String,
}

impl SettingsContext {
    pub fn new(claude_dir: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            claude_dir: claude_dir.into(),
            conflict_policy: ConflictPolicy::default(),
            version: version.into(),
        }
    }

    pub fn from_config(config: &ResolvedConfig, version: &str) -> Self {
        Self {
            claude_dir: config.claude_dir().to_path_buf(),
            conflict_policy: config.conflict_policy(),
            version: version.to_string(),
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        settings_path(&self.claude_dir)
    }

    pub fn ownership_path(&self) -> PathBuf {
        ownership_path(&self.claude_dir)
    }
}

// === settings apply ===

#[derive(Serialize)]
pub struct ApplyResult {
    pub dry_run: bool,
    pub settings_path: PathBuf,
    pub version: String,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
    pub added: Vec<String>,
    pub overwritten: Vec<String>,
    pub conflicts: Vec<String>,
    pub unchanged: Vec<String>,
    pub skipped: Vec<String>,
    /// Number of keys owned after this run
    pub owned: usize,
}

impl Output for ApplyResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let mut out = String::new();
        if self.dry_run {
            out.push_str("Dry run: no files were written.\n");
        }
        human_list(&mut out, "Removed", &self.removed);
        human_list(&mut out, "Updated", &self.updated);
        human_list(&mut out, "Added", &self.added);
        human_list(&mut out, "Overwritten", &self.overwritten);
        human_list(&mut out, "Kept user value", &self.conflicts);
        human_list(&mut out, "Skipped (key cannot be tracked)", &self.skipped);
        out.push_str(&format!(
            "{} keys unchanged, {} keys managed by mcs {} in {}",
            self.unchanged.len(),
            self.owned,
            self.version,
            self.settings_path.display()
        ));
        out
    }
}

/// Apply a settings template to the live settings file.
///
/// Classifies the template against the ownership ledger, applies the result to
/// `settings.json`, then records the new ownership state. With `dry_run`
/// nothing is written.
pub fn settings_apply(ctx: &SettingsContext, template_path: &Path, dry_run: bool) -> Result<ApplyResult> {
    let template = Settings::load(template_path)?;

    let ownership_path = ctx.ownership_path();
    let mut ownership = SettingsOwnership::load(&ownership_path);
    if template.is_empty() && !ownership.is_empty() {
        tracing::warn!(
            template = %template_path.display(),
            owned = ownership.len(),
            "template manages no settings; every owned key will be removed"
        );
    }
    let plan = classify(&ownership, &template);
    if plan.is_empty() {
        tracing::debug!("nothing to reconcile");
    }

    let settings_path = ctx.settings_path();
    let mut live = LiveSettings::load(&settings_path)?;
    let report = live.apply(&plan, &template, ctx.conflict_policy);

    plan.commit(&mut ownership, &ctx.version, report.adopted());

    if !dry_run {
        if report.changed() {
            live.save(&settings_path)?;
        }
        ownership.save(&ownership_path, &ctx.version)?;
    }

    tracing::info!(
        template = %template_path.display(),
        removed = report.removed.len(),
        updated = report.updated.len(),
        added = report.added.len(),
        conflicts = report.conflicts.len(),
        dry_run,
        "applied settings template"
    );

    Ok(ApplyResult {
        dry_run,
        settings_path,
        version: ctx.version.clone(),
        removed: report.removed,
        updated: report.updated,
        added: report.added,
        overwritten: report.overwritten,
        conflicts: report.conflicts,
        unchanged: report.unchanged,
        skipped: report.skipped,
        owned: ownership.len(),
    })
}

// === settings status ===

#[derive(Serialize)]
pub struct OwnedKey {
    pub key: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct StatusResult {
    pub ledger_path: PathBuf,
    pub exists: bool,
    pub keys: Vec<OwnedKey>,
}

impl Output for StatusResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.keys.is_empty() {
            return format!("No settings managed by mcs ({})", self.ledger_path.display());
        }
        let width = self.keys.iter().map(|k| k.key.len()).max().unwrap_or(0);
        let mut lines = vec![format!(
            "{} settings managed by mcs ({}):",
            self.keys.len(),
            self.ledger_path.display()
        )];
        for owned in &self.keys {
            lines.push(format!("  {:width$}  {}", owned.key, owned.version, width = width));
        }
        lines.join("\n")
    }
}

/// List the keys mcs currently owns.
pub fn settings_status(ctx: &SettingsContext) -> Result<StatusResult> {
    let ledger_path = ctx.ownership_path();
    let ownership = SettingsOwnership::load(&ledger_path);
    let keys = ownership
        .entries()
        .map(|(key, version)| OwnedKey {
            key: key.to_string(),
            version: version.to_string(),
        })
        .collect();

    Ok(StatusResult {
        exists: ledger_path.exists(),
        ledger_path,
        keys,
    })
}

// === settings stale ===

#[derive(Serialize)]
pub struct StaleResult {
    pub stale: Vec<String>,
}

impl Output for StaleResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        if self.stale.is_empty() {
            return "No stale settings".to_string();
        }
        let mut out = String::new();
        human_list(&mut out, "Stale settings", &self.stale);
        out.trim_end().to_string()
    }
}

/// Owned keys the given template no longer contains.
pub fn settings_stale(ctx: &SettingsContext, template_path: &Path) -> Result<StaleResult> {
    let template = Settings::load(template_path)?;
    let ownership = SettingsOwnership::load(&ctx.ownership_path());
    Ok(StaleResult {
        stale: ownership.stale_keys(&template),
    })
}

// === settings release ===

#[derive(Serialize)]
pub struct ReleaseResult {
    pub released: Vec<String>,
    pub not_owned: Vec<String>,
}

impl Output for ReleaseResult {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let mut out = String::new();
        human_list(&mut out, "Released", &self.released);
        human_list(&mut out, "Not owned", &self.not_owned);
        if out.is_empty() {
            return "Nothing to release".to_string();
        }
        out.trim_end().to_string()
    }
}

/// Drop ownership of keys without touching their values.
///
/// Released keys become user-owned: later applies will never remove them.
pub fn settings_release(ctx: &SettingsContext, keys: &[String]) -> Result<ReleaseResult> {
    let ledger_path = ctx.ownership_path();
    let mut ownership = SettingsOwnership::load(&ledger_path);

    let (released, not_owned): (Vec<String>, Vec<String>) =
        keys.iter().cloned().partition(|key| ownership.owns(key));
    for key in &released {
        ownership.remove(key);
    }

    if !released.is_empty() {
        ownership.save(&ledger_path, &ctx.version)?;
    }

    Ok(ReleaseResult {
        released,
        not_owned,
    })
}
