//! Effective value resolution across scopes
//!
//! Scope priority is the outer loop; override-vs-plain is the tiebreak inside
//! one scope. For `[id].name` each scope is asked for the override first and
//! then for the plain `name`, before moving on to the next lower scope. So an
//! override wins over a plain value in the same or a lower scope, while a
//! plain value in a higher scope still beats an override found lower down.

use crate::document::PreferenceDocument;
use crate::key::PreferenceKey;
use crate::scope::Scope;

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// One scope's committed document at resolution time
#[derive(Debug, Clone)]
pub struct ScopeSnapshot {
    pub scope: Scope,
    pub document: Arc<PreferenceDocument>,
}

impl ScopeSnapshot {
    pub fn new(scope: Scope, document: Arc<PreferenceDocument>) -> Self {
        Self { scope, document }
    }
}

/// Effective value and the scope it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved {
    pub value: Value,
    pub scope: Scope,
}

/// Resolve `key` against snapshots ordered highest priority first.
pub fn resolve(snapshots: &[ScopeSnapshot], key: &PreferenceKey) -> Option<Resolved> {
    match key {
        PreferenceKey::Plain(name) => snapshots.iter().find_map(|s| {
            s.document
                .get_plain(name)
                .map(|value| Resolved {
                    value: value.clone(),
                    scope: s.scope,
                })
        }),
        PreferenceKey::Overridden(o) => snapshots.iter().find_map(|s| {
            s.document
                .get_override(&o.identifier, &o.name)
                .or_else(|| s.document.get_plain(&o.name))
                .map(|value| Resolved {
                    value: value.clone(),
                    scope: s.scope,
                })
        }),
        PreferenceKey::Group(identifier) => {
            let mut merged = Map::new();
            let mut top = None;
            for s in snapshots.iter().rev() {
                if let Some(group) = s.document.group(identifier) {
                    merged.extend(group.iter().map(|(k, v)| (k.clone(), v.clone())));
                    top = Some(s.scope);
                }
            }
            top.map(|scope| Resolved {
                value: Value::Object(merged),
                scope,
            })
        }
    }
}

/// Raw per-scope values for one key, plus the effective value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Inspection {
    pub key: String,
    pub default_value: Option<Value>,
    pub user_value: Option<Value>,
    pub workspace_value: Option<Value>,
    pub folder_value: Option<Value>,
    /// Effective value after resolution
    pub value: Option<Value>,
    /// Scope the effective value came from
    pub scope: Option<Scope>,
}

/// Report what each scope holds for `key`. Per-scope values are raw: for a
/// combined key they are the override-specific values only.
pub fn inspect(snapshots: &[ScopeSnapshot], key: &PreferenceKey) -> Inspection {
    let mut inspection = Inspection {
        key: key.to_string(),
        ..Default::default()
    };

    for s in snapshots {
        let raw = s.document.get(key);
        let slot = match s.scope {
            Scope::Default => &mut inspection.default_value,
            Scope::User => &mut inspection.user_value,
            Scope::Workspace => &mut inspection.workspace_value,
            Scope::Folder => &mut inspection.folder_value,
        };
        if slot.is_none() {
            *slot = raw;
        }
    }

    if let Some(resolved) = resolve(snapshots, key) {
        inspection.value = Some(resolved.value);
        inspection.scope = Some(resolved.scope);
    }
    inspection
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snap(scope: Scope, doc: Value) -> ScopeSnapshot {
        ScopeSnapshot::new(scope, Arc::new(PreferenceDocument::from_value(doc)))
    }

    fn key(k: &str) -> PreferenceKey {
        PreferenceKey::parse(k)
    }

    fn value(snapshots: &[ScopeSnapshot], k: &str) -> Option<Value> {
        resolve(snapshots, &key(k)).map(|r| r.value)
    }

    #[test]
    fn test_plain_resolution_ignores_overrides() {
        let snapshots = [
            snap(Scope::Workspace, json!({"[swift]": {"editor.tabSize": 6}})),
            snap(Scope::User, json!({"editor.tabSize": 3})),
            snap(Scope::Default, json!({"editor.tabSize": 4})),
        ];
        let resolved = resolve(&snapshots, &key("editor.tabSize")).unwrap();
        assert_eq!(resolved.value, json!(3));
        assert_eq!(resolved.scope, Scope::User);
    }

    #[test]
    fn test_override_wins_within_scope_and_below() {
        let snapshots = [
            snap(
                Scope::Workspace,
                json!({"editor.tabSize": 2, "[swift]": {"editor.tabSize": 6}}),
            ),
            snap(Scope::Default, json!({"editor.tabSize": 4})),
        ];
        assert_eq!(value(&snapshots, "[swift].editor.tabSize"), Some(json!(6)));
        assert_eq!(value(&snapshots, "editor.tabSize"), Some(json!(2)));
    }

    #[test]
    fn test_higher_plain_beats_lower_override() {
        let snapshots = [
            snap(Scope::Workspace, json!({"editor.tabSize": 2})),
            snap(Scope::User, json!({"[swift]": {"editor.tabSize": 6}})),
            snap(Scope::Default, json!({"editor.tabSize": 4})),
        ];
        let resolved = resolve(&snapshots, &key("[swift].editor.tabSize")).unwrap();
        assert_eq!(resolved.value, json!(2));
        assert_eq!(resolved.scope, Scope::Workspace);
    }

    #[test]
    fn test_unset_override_falls_back_to_plain() {
        let snapshots = [
            snap(Scope::User, json!({"editor.fontSize": 12})),
            snap(Scope::Default, json!({"editor.tabSize": 4, "editor.fontSize": 14})),
        ];
        for name in ["editor.tabSize", "editor.fontSize", "missing"] {
            assert_eq!(
                value(&snapshots, &format!("[swift].{name}")),
                value(&snapshots, name),
                "{name}"
            );
        }
    }

    #[test]
    fn test_group_key_merges_across_scopes() {
        let snapshots = [
            snap(Scope::User, json!({"[md]": {"editor.wordWrap": "off", "a": 1}})),
            snap(Scope::Default, json!({"[md]": {"editor.wordWrap": "on", "b": 2}})),
        ];
        let resolved = resolve(&snapshots, &key("[md]")).unwrap();
        assert_eq!(resolved.value, json!({"editor.wordWrap": "off", "a": 1, "b": 2}));
        assert_eq!(resolved.scope, Scope::User);
        assert!(resolve(&snapshots, &key("[rust]")).is_none());
    }

    #[test]
    fn test_empty_scope_contributes_nothing() {
        let snapshots = [
            snap(Scope::Workspace, json!("not an object")),
            snap(Scope::Default, json!({"editor.tabSize": 4})),
        ];
        assert_eq!(value(&snapshots, "editor.tabSize"), Some(json!(4)));
    }

    #[test]
    fn test_inspect_reports_each_scope() {
        let snapshots = [
            snap(Scope::Folder, json!({})),
            snap(Scope::Workspace, json!({"[swift]": {"editor.tabSize": 6}})),
            snap(Scope::User, json!({"editor.tabSize": 3})),
            snap(Scope::Default, json!({"editor.tabSize": 4})),
        ];

        let plain = inspect(&snapshots, &key("editor.tabSize"));
        assert_eq!(plain.default_value, Some(json!(4)));
        assert_eq!(plain.user_value, Some(json!(3)));
        assert_eq!(plain.workspace_value, None);
        assert_eq!(plain.value, Some(json!(3)));
        assert_eq!(plain.scope, Some(Scope::User));

        let overridden = inspect(&snapshots, &key("[swift].editor.tabSize"));
        assert_eq!(overridden.workspace_value, Some(json!(6)));
        assert_eq!(overridden.user_value, None);
        assert_eq!(overridden.value, Some(json!(6)));
        assert_eq!(overridden.scope, Some(Scope::Workspace));
    }
}
