//! Three-way classification of a new template against the ownership ledger.
//!
//! Every key path in either the ledger or the template lands in exactly one
//! bucket:
//!
//! | ledger | template | outcome    |
//! |--------|----------|------------|
//! | yes    | no       | `remove`   |
//! | yes    | yes      | `update`   |
//! | no     | yes      | `preserve` |
//!
//! Keys in neither are never looked at. Classification is pure; the caller
//! applies the plan to the live file and then commits it to the ledger.

use super::SettingsOwnership;
use crate::settings::{Settings, key_paths};
use serde::Serialize;
use std::collections::BTreeSet;

/// The outcome of classifying a template against the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationPlan {
    /// Owned keys the template dropped
    pub remove: Vec<String>,
    /// Owned keys the template still sets
    pub update: Vec<String>,
    /// Template keys mcs does not own (new, or added by the user)
    pub preserve: Vec<String>,
}

impl ReconciliationPlan {
    /// Check if the plan touches no keys at all.
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.update.is_empty() && self.preserve.is_empty()
    }

    /// Bring `ownership` to its post-apply state.
    ///
    /// Removed keys are released and updated keys re-recorded at `version`.
    /// Preserve keys become owned only when listed in `adopted`; anything in
    /// `adopted` outside the preserve set is ignored.
    pub fn commit(&self, ownership: &mut SettingsOwnership, version: &str, adopted: &[String]) {
        for key in &self.remove {
            ownership.remove(key);
        }
        for key in &self.update {
            ownership.record(key, version);
        }
        for key in adopted {
            if self.preserve.binary_search(key).is_ok() {
                ownership.record(key, version);
            }
        }
    }
}

/// Classify `template` against `ownership`.
pub fn classify(ownership: &SettingsOwnership, template: &Settings) -> ReconciliationPlan {
    let paths: BTreeSet<String> = key_paths(template).into_iter().collect();
    classify_paths(ownership, &paths)
}

/// Classify an already derived key-path set against `ownership`.
///
/// All three lists come out sorted.
pub fn classify_paths(ownership: &SettingsOwnership, paths: &BTreeSet<String>) -> ReconciliationPlan {
    let remove: Vec<String> = ownership
        .managed_keys()
        .into_iter()
        .filter(|key| !paths.contains(key))
        .collect();

    let (update, preserve): (Vec<String>, Vec<String>) =
        paths.iter().cloned().partition(|key| ownership.owns(key));

    let plan = ReconciliationPlan {
        remove,
        update,
        preserve,
    };
    tracing::debug!(
        remove = plan.remove.len(),
        update = plan.update.len(),
        preserve = plan.preserve.len(),
        "classified settings template"
    );
    plan
}

/// Owned keys no longer present in `current_template`, sorted.
///
/// This is exactly the `remove` bucket of [`classify`].
pub fn stale_keys(ownership: &SettingsOwnership, current_template: &Settings) -> Vec<String> {
    let current: BTreeSet<String> = key_paths(current_template).into_iter().collect();
    ownership
        .managed_keys()
        .into_iter()
        .filter(|key| !current.contains(key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::template;

    fn ownership_of(keys: &[&str], version: &str) -> SettingsOwnership {
        let mut ownership = SettingsOwnership::new();
        for key in keys {
            ownership.record(key, version);
        }
        ownership
    }

    fn paths(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_mixed_ledger_and_template() {
        let ownership = ownership_of(&["env.A", "hooks.PreToolUse"], "1.0.0");
        let settings = template(
            r#"{ "env": { "A": "1" }, "permissions": { "defaultMode": "plan" } }"#,
        );

        assert_eq!(stale_keys(&ownership, &settings), vec!["hooks.PreToolUse"]);

        let plan = classify(&ownership, &settings);
        assert_eq!(plan.remove, vec!["hooks.PreToolUse"]);
        assert_eq!(plan.update, vec!["env.A"]);
        assert_eq!(plan.preserve, vec!["permissions.defaultMode"]);
    }

    #[test]
    fn test_empty_template_removes_everything() {
        let ownership = ownership_of(&["env.A", "env.B", "alwaysThinkingEnabled"], "1.0.0");
        let empty = Settings::default();

        assert_eq!(stale_keys(&ownership, &empty), ownership.managed_keys());
        assert_eq!(ownership.stale_keys(&empty), ownership.managed_keys());

        let plan = classify(&ownership, &empty);
        assert_eq!(plan.remove, ownership.managed_keys());
        assert!(plan.update.is_empty());
        assert!(plan.preserve.is_empty());
    }

    #[test]
    fn test_empty_ledger_preserves_everything() {
        let settings = template(r#"{ "env": { "A": "1" }, "alwaysThinkingEnabled": true }"#);
        let plan = classify(&SettingsOwnership::new(), &settings);

        assert!(plan.remove.is_empty());
        assert!(plan.update.is_empty());
        assert_eq!(plan.preserve, vec!["alwaysThinkingEnabled", "env.A"]);
    }

    #[test]
    fn test_unowned_keys_never_reported_stale() {
        let ownership = ownership_of(&["env.A"], "1.0.0");
        let candidates = ["env.B", "hooks.Stop", "permissions.defaultMode", "model"];

        for settings in [
            Settings::default(),
            template(r#"{ "env": { "B": "1" } }"#),
            template(r#"{ "hooks": { "Stop": [] } }"#),
        ] {
            let stale = stale_keys(&ownership, &settings);
            let plan = classify(&ownership, &settings);
            for key in candidates {
                assert!(!stale.iter().any(|s| s == key));
                assert!(!plan.remove.iter().any(|s| s == key));
            }
        }
    }

    #[test]
    fn test_stale_keys_exactly_owned_minus_template() {
        let ownership = ownership_of(&["a", "b", "c", "env.X"], "1.0.0");
        let plan = classify_paths(&ownership, &paths(&["b", "env.X", "new"]));

        assert_eq!(plan.remove, vec!["a", "c"]);
        assert_eq!(plan.update, vec!["b", "env.X"]);
        assert_eq!(plan.preserve, vec!["new"]);
    }

    #[test]
    fn test_buckets_are_disjoint() {
        let ownership = ownership_of(&["a", "b", "c"], "1.0.0");
        let plan = classify_paths(&ownership, &paths(&["b", "c", "d", "e"]));

        let mut all: Vec<&String> = plan
            .remove
            .iter()
            .chain(&plan.update)
            .chain(&plan.preserve)
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
        assert_eq!(total, 5);
    }

    #[test]
    fn test_reapply_identical_template_is_idempotent() {
        let settings = template(r#"{ "env": { "A": "1" }, "hooks": { "Stop": [] } }"#);
        let mut ownership = SettingsOwnership::new();
        ownership.record_all(&settings, "1.0.0");
        let before = ownership.clone();

        let plan = classify(&ownership, &settings);
        assert!(plan.remove.is_empty());
        assert!(plan.preserve.is_empty());
        assert_eq!(plan.update, ownership.managed_keys());

        plan.commit(&mut ownership, "1.0.0", &[]);
        assert_eq!(ownership, before);
    }

    #[test]
    fn test_commit_releases_updates_and_adopts() {
        let mut ownership = ownership_of(&["env.A", "hooks.PreToolUse"], "1.0.0");
        let settings = template(
            r#"{ "env": { "A": "1", "B": "2" }, "permissions": { "defaultMode": "plan" } }"#,
        );
        let plan = classify(&ownership, &settings);

        // Only env.B was actually written; defaultMode conflicted with a user value
        plan.commit(&mut ownership, "2.0.0", &["env.B".to_string()]);

        assert!(!ownership.owns("hooks.PreToolUse"));
        assert_eq!(ownership.version_of("env.A"), Some("2.0.0"));
        assert_eq!(ownership.version_of("env.B"), Some("2.0.0"));
        assert!(!ownership.owns("permissions.defaultMode"));
    }

    #[test]
    fn test_commit_ignores_adoption_outside_preserve_set() {
        let mut ownership = SettingsOwnership::new();
        let plan = classify(&ownership, &template(r#"{ "env": { "A": "1" } }"#));

        plan.commit(&mut ownership, "1.0.0", &["not.in.template".to_string()]);

        assert!(ownership.is_empty());
    }

    #[test]
    fn test_manually_deleted_ledger_entry_is_unowned() {
        // Simulates a user deleting a line from the sidecar between runs
        let ownership = SettingsOwnership::parse("# header\nenv.A=1.0.0\n");
        let plan = classify(&ownership, &template(r#"{ "env": { "A": "1", "B": "2" } }"#));

        assert_eq!(plan.update, vec!["env.A"]);
        assert_eq!(plan.preserve, vec!["env.B"]);
    }

    #[test]
    fn test_plan_is_empty() {
        assert!(ReconciliationPlan::default().is_empty());
        let plan = classify(&SettingsOwnership::new(), &Settings::default());
        assert!(plan.is_empty());
    }
}
