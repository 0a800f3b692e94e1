//! Persisted preference documents
//!
//! A [`PreferenceDocument`] is the JSON object stored for one scope. Top-level
//! keys are plain preference names or `[identifier]` override groups whose
//! values are objects. Flat combined keys are never stored: writes through a
//! combined key land in the nested group, and empty groups are pruned.

use crate::error::{Error, Result};
use crate::key::{OverriddenName, OverrideIdentifier, PreferenceKey, decode, decode_group};

use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Value};

/// One logical key whose value changed. `None` means absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

impl ValueChange {
    fn new(key: impl Into<String>, old_value: Option<Value>, new_value: Option<Value>) -> Self {
        Self {
            key: key.into(),
            old_value,
            new_value,
        }
    }
}

/// In-memory form of one scope's persisted preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PreferenceDocument {
    entries: Map<String, Value>,
}

impl PreferenceDocument {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a parsed JSON value, normalizing it.
    ///
    /// - A non-object root yields an empty document.
    /// - `null` values are dropped.
    /// - Group keys holding a non-object are dropped; empty groups are dropped.
    /// - Flat combined keys are folded into their group. A value already
    ///   present in the nested group wins.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            if !value.is_null() {
                warn!("Preference document root is not an object, treating it as empty");
            }
            return Self::new();
        };

        let mut entries = Map::new();
        let mut flat = Vec::new();

        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            match PreferenceKey::parse(&key) {
                PreferenceKey::Group(_) => match value {
                    Value::Object(group) => {
                        let group = without_nulls(group);
                        if group.is_empty() {
                            debug!("Dropping empty override group {key}");
                        } else {
                            entries.insert(key, Value::Object(group));
                        }
                    }
                    other => {
                        warn!(
                            "Override group {key} holds {} instead of an object, dropping it",
                            json_type(&other)
                        );
                    }
                },
                PreferenceKey::Overridden(name) => flat.push((name, value)),
                PreferenceKey::Plain(_) => {
                    entries.insert(key, value);
                }
            }
        }

        for (name, value) in flat {
            debug!("Folding flat key {} into its override group", name.combined_key());
            let group = entries
                .entry(name.identifier.group_key())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(group) = group.as_object_mut() {
                group.entry(name.name).or_insert(value);
            }
        }

        Self { entries }
    }

    /// Parse document text. Invalid JSON yields an empty document.
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::new();
        }
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                warn!("Invalid preference document, treating it as empty: {e}");
                Self::new()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }

    /// Serialize the document for persisting
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        if pretty {
            serde_json::to_string_pretty(&self.entries).map_err(Error::from)
        } else {
            serde_json::to_string(&self.entries).map_err(Error::from)
        }
    }

    /// Plain top-level value for `name`, ignoring override groups
    pub fn get_plain(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// The override group for `identifier`
    pub fn group(&self, identifier: &OverrideIdentifier) -> Option<&Map<String, Value>> {
        self.entries
            .get(&identifier.group_key())
            .and_then(Value::as_object)
    }

    /// Override-specific value only, without falling back to the plain value
    pub fn get_override(&self, identifier: &OverrideIdentifier, name: &str) -> Option<&Value> {
        self.group(identifier).and_then(|group| group.get(name))
    }

    /// Raw value stored under a key, with no fallback between shapes
    pub fn get(&self, key: &PreferenceKey) -> Option<Value> {
        match key {
            PreferenceKey::Plain(name) => self.get_plain(name).cloned(),
            PreferenceKey::Overridden(o) => self.get_override(&o.identifier, &o.name).cloned(),
            PreferenceKey::Group(id) => self.group(id).map(|g| Value::Object(g.clone())),
        }
    }

    /// Identifiers of all override groups present
    pub fn override_identifiers(&self) -> Vec<OverrideIdentifier> {
        self.entries
            .keys()
            .filter_map(|k| decode_group(k))
            .collect()
    }

    /// Every logical key with its value: plain names, and combined keys for
    /// values inside override groups
    pub fn logical_entries(&self) -> Vec<(String, Value)> {
        let mut out = Vec::new();
        for (key, value) in &self.entries {
            match (decode_group(key), value) {
                (Some(identifier), Value::Object(group)) => {
                    for (name, v) in group {
                        out.push((
                            OverriddenName::new(identifier.clone(), name.clone()).combined_key(),
                            v.clone(),
                        ));
                    }
                }
                _ => out.push((key.clone(), value.clone())),
            }
        }
        out
    }

    /// Changes that turn `self` into `other`, one per logical key
    pub fn diff(&self, other: &PreferenceDocument) -> Vec<ValueChange> {
        let before: Map<String, Value> = self.logical_entries().into_iter().collect();
        let after: Map<String, Value> = other.logical_entries().into_iter().collect();

        let mut changes = Vec::new();
        for (key, old) in &before {
            if !after.contains_key(key) {
                changes.push(ValueChange::new(key.clone(), Some(old.clone()), None));
            }
        }
        for (key, new) in &after {
            let old = before.get(key);
            if old != Some(new) {
                changes.push(ValueChange::new(key.clone(), old.cloned(), Some(new.clone())));
            }
        }
        changes
    }

    /// Insert, overwrite or delete a value.
    ///
    /// `None` (or JSON `null`) deletes. Returns one change per logical key
    /// whose value changed; an empty vector means the document is untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidOverrideValue` if a group key is given a value
    /// that is not an object. The document is left unchanged.
    pub fn apply(&mut self, key: &PreferenceKey, value: Option<Value>) -> Result<Vec<ValueChange>> {
        let value = value.filter(|v| !v.is_null());
        match key {
            PreferenceKey::Plain(name) if decode(name).is_some() || decode_group(name).is_some() => {
                self.apply(&PreferenceKey::parse(name), value)
            }
            PreferenceKey::Plain(name) => Ok(self.apply_plain(name, value).into_iter().collect()),
            PreferenceKey::Overridden(name) => {
                Ok(self.apply_overridden(name, value).into_iter().collect())
            }
            PreferenceKey::Group(identifier) => self.apply_group(identifier, value),
        }
    }

    /// Remove every entry, reporting each logical key that had a value
    pub fn clear(&mut self) -> Vec<ValueChange> {
        let mut changes = Vec::new();
        for (key, value) in std::mem::take(&mut self.entries) {
            match (decode_group(&key), value) {
                (Some(identifier), Value::Object(group)) => {
                    for (name, old) in group {
                        changes.push(ValueChange::new(
                            OverriddenName::new(identifier.clone(), name).combined_key(),
                            Some(old),
                            None,
                        ));
                    }
                }
                (_, old) => changes.push(ValueChange::new(key, Some(old), None)),
            }
        }
        changes
    }

    fn apply_plain(&mut self, name: &str, value: Option<Value>) -> Option<ValueChange> {
        let old = self.entries.get(name).cloned();
        if old == value {
            return None;
        }
        match &value {
            Some(v) => {
                self.entries.insert(name.to_string(), v.clone());
            }
            None => {
                self.entries.shift_remove(name);
            }
        }
        debug!("Applied {name}");
        Some(ValueChange::new(name, old, value))
    }

    fn apply_overridden(&mut self, name: &OverriddenName, value: Option<Value>) -> Option<ValueChange> {
        let old = self.get_override(&name.identifier, &name.name).cloned();
        if old == value {
            return None;
        }

        let group_key = name.identifier.group_key();
        let mut group = match self.entries.get(&group_key) {
            Some(Value::Object(group)) => group.clone(),
            _ => Map::new(),
        };
        match &value {
            Some(v) => {
                group.insert(name.name.clone(), v.clone());
            }
            None => {
                group.shift_remove(&name.name);
            }
        }
        self.store_group(group_key, group);

        debug!("Applied {}", name.combined_key());
        Some(ValueChange::new(name.combined_key(), old, value))
    }

    fn apply_group(
        &mut self,
        identifier: &OverrideIdentifier,
        value: Option<Value>,
    ) -> Result<Vec<ValueChange>> {
        let group_key = identifier.group_key();
        let new_group = match value {
            None => Map::new(),
            Some(Value::Object(group)) => without_nulls(group),
            Some(other) => {
                return Err(Error::InvalidOverrideValue {
                    key: group_key,
                    found: json_type(&other).to_string(),
                });
            }
        };
        let old_group = self.group(identifier).cloned().unwrap_or_default();

        let mut changes = Vec::new();
        for (name, old) in &old_group {
            if !new_group.contains_key(name) {
                changes.push(ValueChange::new(
                    OverriddenName::new(identifier.clone(), name.clone()).combined_key(),
                    Some(old.clone()),
                    None,
                ));
            }
        }
        for (name, new) in &new_group {
            let old = old_group.get(name);
            if old != Some(new) {
                changes.push(ValueChange::new(
                    OverriddenName::new(identifier.clone(), name.clone()).combined_key(),
                    old.cloned(),
                    Some(new.clone()),
                ));
            }
        }

        if !changes.is_empty() {
            self.store_group(group_key, new_group);
            debug!("Replaced override group [{identifier}]");
        }
        Ok(changes)
    }

    /// Write a group back, pruning it when empty
    fn store_group(&mut self, group_key: String, group: Map<String, Value>) {
        if group.is_empty() {
            self.entries.shift_remove(&group_key);
        } else {
            self.entries.insert(group_key, Value::Object(group));
        }
    }
}

fn without_nulls(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter().filter(|(_, v)| !v.is_null()).collect()
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Tests
// =============================================================================
