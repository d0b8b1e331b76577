//! Flattening of a settings template into managed key paths.
//!
//! Which parts of a template mcs owns is decided entirely by [`KEY_RULES`].
//! Each rule names a field of the settings document and how it flattens:
//!
//! - [`RuleKind::Entries`]: one `field.<child>` path per map entry
//! - [`RuleKind::Scalar`]: the bare `field` path when the value is set
//!
//! Adding a manageable field means adding a row to the table; the
//! reconciliation code never looks at individual fields.

use super::Settings;
use serde_json::Value;
use std::collections::BTreeMap;

/// How a rule flattens its field.
#[derive(Clone, Copy)]
pub enum RuleKind {
    /// A map-valued field; one key path per entry.
    Entries(fn(&Settings) -> Option<BTreeMap<String, Value>>),
    /// A single value; one key path when set.
    Scalar(fn(&Settings) -> Option<Value>),
}

/// One row of the extraction table.
#[derive(Clone, Copy)]
pub struct KeyRule {
    /// Dotted location of the field in the settings document
    pub field: &'static str,
    pub kind: RuleKind,
}

impl std::fmt::Debug for KeyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            RuleKind::Entries(_) => "entries",
            RuleKind::Scalar(_) => "scalar",
        };
        write!(f, "KeyRule({} {})", self.field, kind)
    }
}

/// Every settings field mcs is entitled to manage, in output order.
pub const KEY_RULES: &[KeyRule] = &[
    KeyRule {
        field: "env",
        kind: RuleKind::Entries(|s| {
            s.env.as_ref().map(|env| {
                env.iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect()
            })
        }),
    },
    KeyRule {
        field: "permissions.defaultMode",
        kind: RuleKind::Scalar(|s| {
            s.permissions
                .as_ref()
                .and_then(|p| p.default_mode.clone())
                .map(Value::String)
        }),
    },
    KeyRule {
        field: "hooks",
        kind: RuleKind::Entries(|s| s.hooks.clone()),
    },
    KeyRule {
        field: "enabledPlugins",
        kind: RuleKind::Entries(|s| {
            s.enabled_plugins.as_ref().map(|plugins| {
                plugins
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::Bool(*v)))
                    .collect()
            })
        }),
    },
    KeyRule {
        field: "alwaysThinkingEnabled",
        kind: RuleKind::Scalar(|s| s.always_thinking_enabled.map(Value::Bool)),
    },
];

/// Flatten a template into `(key path, value)` pairs.
///
/// Pairs come out in table order; entries of a map field are sorted by child key.
pub fn flatten(settings: &Settings) -> Vec<(String, Value)> {
    let mut pairs = Vec::new();
    for rule in KEY_RULES {
        match rule.kind {
            RuleKind::Entries(extract) => {
                if let Some(entries) = extract(settings) {
                    for (child, value) in entries {
                        pairs.push((format!("{}.{}", rule.field, child), value));
                    }
                }
            }
            RuleKind::Scalar(extract) => {
                if let Some(value) = extract(settings) {
                    pairs.push((rule.field.to_string(), value));
                }
            }
        }
    }
    pairs
}

/// The exact set of key paths a template manages.
pub fn key_paths(settings: &Settings) -> Vec<String> {
    flatten(settings).into_iter().map(|(path, _)| path).collect()
}

/// Split a key path into document segments.
///
/// Registered fields keep their dotted structure and map children are kept
/// whole, so `env.A.B` addresses the `A.B` entry of `env`. Paths no rule knows
/// (e.g. a field an older release managed) split at the first dot.
pub fn segments(key_path: &str) -> Vec<String> {
    for rule in KEY_RULES {
        match rule.kind {
            RuleKind::Scalar(_) if key_path == rule.field => {
                return rule.field.split('.').map(str::to_string).collect();
            }
            RuleKind::Entries(_) => {
                if let Some(child) = key_path
                    .strip_prefix(rule.field)
                    .and_then(|rest| rest.strip_prefix('.'))
                {
                    let mut segs: Vec<String> = rule.field.split('.').map(str::to_string).collect();
                    segs.push(child.to_string());
                    return segs;
                }
            }
            _ => {}
        }
    }

    match key_path.split_once('.') {
        Some((head, rest)) => vec![head.to_string(), rest.to_string()],
        None => vec![key_path.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::template;

    fn full_template() -> Settings {
        template(
            r#"{
                "env": { "ZED": "1", "ALPHA": "2" },
                "permissions": { "defaultMode": "plan" },
                "hooks": { "Stop": [], "PreToolUse": [] },
                "enabledPlugins": { "b-plugin": true, "a-plugin": false },
                "alwaysThinkingEnabled": true
            }"#,
        )
    }

    #[test]
    fn test_key_paths_full_template() {
        assert_eq!(
            key_paths(&full_template()),
            vec![
                "env.ALPHA",
                "env.ZED",
                "permissions.defaultMode",
                "hooks.PreToolUse",
                "hooks.Stop",
                "enabledPlugins.a-plugin",
                "enabledPlugins.b-plugin",
                "alwaysThinkingEnabled",
            ]
        );
    }

    #[test]
    fn test_key_paths_empty_template() {
        assert!(key_paths(&Settings::default()).is_empty());
    }

    #[test]
    fn test_permissions_without_default_mode_contributes_nothing() {
        let settings = template(r#"{ "permissions": {} }"#);
        assert!(key_paths(&settings).is_empty());
    }

    #[test]
    fn test_empty_map_contributes_nothing() {
        let settings = template(r#"{ "env": {}, "hooks": {} }"#);
        assert!(key_paths(&settings).is_empty());
    }

    #[test]
    fn test_key_paths_deterministic() {
        let settings = full_template();
        assert_eq!(key_paths(&settings), key_paths(&settings.clone()));
    }

    #[test]
    fn test_every_rule_fires_for_full_template() {
        let paths = key_paths(&full_template());
        for rule in KEY_RULES {
            assert!(
                paths.iter().any(|p| p == rule.field || p.starts_with(&format!("{}.", rule.field))),
                "{:?} produced no key path",
                rule
            );
        }
    }

    #[test]
    fn test_flatten_values() {
        let pairs = flatten(&template(r#"{ "enabledPlugins": { "lsp": true } }"#));
        assert_eq!(
            pairs,
            vec![("enabledPlugins.lsp".to_string(), Value::Bool(true))]
        );
    }

    #[test]
    fn test_segments_registered_fields() {
        assert_eq!(segments("env.FOO"), vec!["env", "FOO"]);
        assert_eq!(segments("permissions.defaultMode"), vec!["permissions", "defaultMode"]);
        assert_eq!(segments("alwaysThinkingEnabled"), vec!["alwaysThinkingEnabled"]);
    }

    #[test]
    fn test_segments_keeps_dotted_child_whole() {
        assert_eq!(
            segments("enabledPlugins.lsp@market.place"),
            vec!["enabledPlugins", "lsp@market.place"]
        );
    }

    #[test]
    fn test_segments_unknown_field() {
        assert_eq!(segments("model"), vec!["model"]);
        assert_eq!(segments("statusLine.command"), vec!["statusLine", "command"]);
    }

    #[test]
    fn test_segments_prefix_is_not_a_match() {
        // "environment" must not be treated as an entry of "env"
        assert_eq!(segments("environment.X"), vec!["environment", "X"]);
    }
}
