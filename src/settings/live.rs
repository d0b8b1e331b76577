//! The live `settings.json` shared between mcs and the user.
//!
//! The document is kept as untyped JSON so keys mcs knows nothing about survive
//! a load/save cycle untouched. Only the key paths named by a
//! [`ReconciliationPlan`] are ever modified.

use super::Settings;
use super::key_paths::segments;
use crate::config::ConflictPolicy;
use crate::ownership::{ReconciliationPlan, is_recordable};
use crate::storage::write_atomic;
use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::Path;

/// What [`LiveSettings::apply`] did, key by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Owned keys dropped from the template and deleted from the file
    pub removed: Vec<String>,
    /// Owned keys whose value was rewritten
    pub updated: Vec<String>,
    /// New keys written where the file had no value
    pub added: Vec<String>,
    /// Unowned keys whose existing value was replaced (overwrite policy only)
    pub overwritten: Vec<String>,
    /// Unowned keys left alone because the user already set a different value
    pub conflicts: Vec<String>,
    /// Keys already holding the template value
    pub unchanged: Vec<String>,
    /// Template keys the ownership ledger cannot store, left untouched
    pub skipped: Vec<String>,
    /// New keys mcs wrote itself and may adopt
    #[serde(skip)]
    adopted: Vec<String>,
}

impl ApplyReport {
    /// Preserve-class keys mcs wrote on this run.
    ///
    /// These are the only new keys safe to record as owned. A user value that
    /// already matched the template is only adopted under
    /// [`ConflictPolicy::Overwrite`].
    pub fn adopted(&self) -> &[String] {
        &self.adopted
    }

    /// Check if the live document was modified.
    pub fn changed(&self) -> bool {
        !(self.removed.is_empty()
            && self.updated.is_empty()
            && self.added.is_empty()
            && self.overwritten.is_empty())
    }
}

/// The live settings document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveSettings {
    doc: Map<String, Value>,
}

impl LiveSettings {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from JSON text. Blank text is an empty document.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::new());
        }
        match serde_json::from_str::<Value>(json)? {
            Value::Object(doc) => Ok(Self { doc }),
            other => Err(Error::InvalidInput(format!(
                "settings must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Load the live file. A missing file is an empty document.
    ///
    /// Unlike the ownership ledger, an unparseable file is an error: it belongs
    /// to the user and must never be replaced with a fresh document.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the document atomically as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(&self.doc)?;
        json.push('\n');
        write_atomic(path, json.as_bytes())
    }

    /// The underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.doc
    }

    /// Value at a key path, if set.
    pub fn get(&self, key_path: &str) -> Option<&Value> {
        get_at(&self.doc, &segments(key_path))
    }

    /// Set the value at a key path, creating intermediate objects.
    pub fn set(&mut self, key_path: &str, value: Value) {
        set_at(&mut self.doc, &segments(key_path), value);
    }

    /// Remove the value at a key path, pruning parents it leaves empty.
    pub fn remove(&mut self, key_path: &str) -> Option<Value> {
        remove_at(&mut self.doc, &segments(key_path))
    }

    /// Apply a reconciliation plan for `template`.
    ///
    /// Owned keys are removed or overwritten unconditionally. New keys are
    /// written only where the file has no value, unless `policy` is
    /// [`ConflictPolicy::Overwrite`]. A new key under a user value that is not
    /// an object counts as set.
    pub fn apply(
        &mut self,
        plan: &ReconciliationPlan,
        template: &Settings,
        policy: ConflictPolicy,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();

        for key in &plan.remove {
            if self.remove(key).is_some() {
                report.removed.push(key.clone());
            }
        }

        for key in &plan.update {
            let Some(value) = template.value_at(key) else {
                continue;
            };
            if self.get(key) == Some(&value) {
                report.unchanged.push(key.clone());
            } else {
                self.set(key, value);
                report.updated.push(key.clone());
            }
        }

        for key in &plan.preserve {
            if !is_recordable(key) {
                tracing::warn!(key = ?key, "skipping template key the ownership ledger cannot store");
                report.skipped.push(key.clone());
                continue;
            }
            let Some(value) = template.value_at(key) else {
                continue;
            };
            let segs = segments(key);
            match get_at(&self.doc, &segs) {
                None if !parent_blocked(&self.doc, &segs) => {
                    set_at(&mut self.doc, &segs, value);
                    report.added.push(key.clone());
                    report.adopted.push(key.clone());
                }
                Some(existing) if *existing == value => {
                    report.unchanged.push(key.clone());
                    if policy == ConflictPolicy::Overwrite {
                        report.adopted.push(key.clone());
                    }
                }
                _ => match policy {
                    ConflictPolicy::Preserve => {
                        tracing::info!(key = %key, "keeping user value for unmanaged key");
                        report.conflicts.push(key.clone());
                    }
                    ConflictPolicy::Overwrite => {
                        set_at(&mut self.doc, &segs, value);
                        report.overwritten.push(key.clone());
                        report.adopted.push(key.clone());
                    }
                },
            }
        }

        report
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn get_at<'a>(map: &'a Map<String, Value>, segs: &[String]) -> Option<&'a Value> {
    let (last, parents) = segs.split_last()?;
    let mut current = map;
    for seg in parents {
        current = current.get(seg)?.as_object()?;
    }
    current.get(last)
}

/// Check if a user value that is not an object sits where a parent object of
/// `segs` would go.
fn parent_blocked(map: &Map<String, Value>, segs: &[String]) -> bool {
    let Some((_, parents)) = segs.split_last() else {
        return false;
    };
    let mut current = map;
    for seg in parents {
        match current.get(seg) {
            None => return false,
            Some(Value::Object(child)) => current = child,
            Some(_) => return true,
        }
    }
    false
}

fn set_at(map: &mut Map<String, Value>, segs: &[String], value: Value) {
    match segs {
        [] => {}
        [last] => {
            map.insert(last.clone(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                set_at(child, rest, value);
            }
        }
    }
}

fn remove_at(map: &mut Map<String, Value>, segs: &[String]) -> Option<Value> {
    match segs {
        [] => None,
        [last] => map.remove(last),
        [head, rest @ ..] => {
            let child = map.get_mut(head)?.as_object_mut()?;
            let removed = remove_at(child, rest);
            if removed.is_some() && child.is_empty() {
                map.remove(head);
            }
            removed
        }
    }
}
