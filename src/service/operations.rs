use crate::document::PreferenceDocument;
use crate::error::{Error, Result};
use crate::key::PreferenceKey;
use crate::provider::ApplyOutcome;
use crate::resolver::{self, Inspection, Resolved, ScopeSnapshot};
use crate::scope::Scope;
use crate::service::core::PreferenceService;

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

impl PreferenceService {
    /// Committed documents of every scope applicable to `resource`,
    /// highest priority first
    pub fn snapshots(&self, resource: Option<&Path>) -> Vec<ScopeSnapshot> {
        self.registry
            .providers_for(resource)
            .into_iter()
            .map(|p| ScopeSnapshot::new(p.scope(), p.document()))
            .collect()
    }

    /// Get the effective value of a preference.
    ///
    /// `key` is a plain name (`editor.tabSize`), a combined key
    /// (`[rust].editor.tabSize`) or a group key (`[rust]`). `resource`
    /// selects the folder scope; without it only default, user and workspace
    /// scopes are consulted.
    ///
    /// A combined key that was never set resolves exactly like its plain name.
    pub fn get(&self, key: &str, resource: Option<&Path>) -> Option<Value> {
        self.resolve(key, resource).map(|r| r.value)
    }

    /// Like [`get`](Self::get), also reporting the scope the value came from
    pub fn resolve(&self, key: &str, resource: Option<&Path>) -> Option<Resolved> {
        resolver::resolve(&self.snapshots(resource), &PreferenceKey::parse(key))
    }

    /// Get the effective value deserialized into `T`
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` if the value cannot be deserialized to `T`.
    pub fn get_as<T>(&self, key: &str, resource: Option<&Path>) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.get(key, resource)
            .map(|value| {
                serde_json::from_value(value).map_err(|e| Error::Parse(format!("{key}: {e}")))
            })
            .transpose()
    }

    /// Get the effective value as `T`, or `default` if it is unset or has
    /// the wrong shape
    pub fn get_or<T>(&self, key: &str, default: T, resource: Option<&Path>) -> T
    where
        T: DeserializeOwned,
    {
        match self.get_as(key, resource) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                debug!("Using default for {key}: {e}");
                default
            }
        }
    }

    /// Get the value of `key` as seen from one scope alone.
    ///
    /// Lower scopes are not consulted, but a combined key that this scope
    /// does not override still falls back to its plain name here.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProviderNotFound` if no provider owns `scope` (for
    /// folder scope: no folder contains `resource`).
    pub fn get_in(&self, key: &str, scope: Scope, resource: Option<&Path>) -> Result<Option<Value>> {
        let provider = self.registry.provider(scope, resource)?;
        Ok(provider.resolve(&PreferenceKey::parse(key)))
    }

    /// Report the raw value of `key` in every scope plus its effective value
    pub fn inspect(&self, key: &str, resource: Option<&Path>) -> Inspection {
        resolver::inspect(&self.snapshots(resource), &PreferenceKey::parse(key))
    }

    /// Set a preference in one scope.
    ///
    /// A `null` value removes the key. Writing through a combined key stores
    /// the value inside its nested `[identifier]` group; writing a group key
    /// replaces the whole group and requires an object.
    ///
    /// The new value is visible to `get` as soon as it is committed in memory,
    /// before the backing resource is written.
    ///
    /// # Errors
    ///
    /// - `Error::ProviderNotFound` if no provider owns `scope` (for folder
    ///   scope: no folder contains `resource`). Nothing is mutated.
    /// - `Error::ReadOnlyScope` for the default scope.
    /// - `Error::InvalidOverrideValue` if a group key is given a non-object.
    /// - `Error::Flush` if persisting failed. The in-memory value is kept and
    ///   change events have been emitted. Retrying the same call writes the
    ///   committed document again.
    pub fn set(&self, key: &str, value: Value, scope: Scope, resource: Option<&Path>) -> Result<()> {
        let key = PreferenceKey::parse(key);
        let outcome = self
            .registry
            .route_write(scope, resource, &key, Some(value))?;
        self.finish(outcome)?;
        info!("Preference {key} saved to {scope} scope");
        Ok(())
    }

    /// Remove a preference from one scope, reverting it to what lower
    /// scopes provide
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set).
    pub fn reset(&self, key: &str, scope: Scope, resource: Option<&Path>) -> Result<()> {
        let key = PreferenceKey::parse(key);
        let outcome = self.registry.route_write(scope, resource, &key, None)?;
        self.finish(outcome)?;
        info!("Preference {key} reset in {scope} scope");
        Ok(())
    }

    /// Remove every preference stored in one scope
    ///
    /// # Errors
    ///
    /// Returns `Error::ReadOnlyScope`, `Error::ProviderNotFound` or
    /// `Error::Flush`.
    pub fn clear_scope(&self, scope: Scope, resource: Option<&Path>) -> Result<()> {
        if !scope.is_writable() {
            return Err(Error::ReadOnlyScope(scope));
        }
        let provider = self.registry.provider(scope, resource)?;
        self.finish(provider.clear())
    }

    /// Raw committed document of one scope
    ///
    /// # Errors
    ///
    /// Returns `Error::ProviderNotFound` if no provider matches.
    pub fn document(&self, scope: Scope, resource: Option<&Path>) -> Result<Arc<PreferenceDocument>> {
        self.registry.route_read(scope, resource)
    }

    /// Path of the resource backing a scope, `None` for the default scope or
    /// when no provider matches
    pub fn config_path(&self, scope: Scope, resource: Option<&Path>) -> Option<PathBuf> {
        self.registry
            .provider(scope, resource)
            .ok()
            .and_then(|p| p.config_path().map(Path::to_path_buf))
    }

    /// Re-read one scope's resource after an external edit, emitting
    /// change events for what differs
    ///
    /// # Errors
    ///
    /// Returns `Error::ProviderNotFound` if no provider matches.
    pub fn reload(&self, scope: Scope, resource: Option<&Path>) -> Result<()> {
        self.registry.provider(scope, resource)?.reload();
        Ok(())
    }

    /// Re-read every scope's resource
    pub fn reload_all(&self) {
        for provider in self.registry.all() {
            provider.reload();
        }
        debug!("All preferences reloaded");
    }

    /// Drop every in-memory document; each is reloaded on next access.
    ///
    /// Call this if settings files were modified externally and change
    /// events are not needed. Otherwise prefer [`reload_all`](Self::reload_all).
    pub fn invalidate_cache(&self) {
        for provider in self.registry.all() {
            provider.invalidate();
        }
        debug!("Preference cache invalidated");
    }

    fn finish(&self, outcome: ApplyOutcome) -> Result<()> {
        if !outcome.changes.is_empty() {
            debug!("{} preference change(s) committed", outcome.changes.len());
        }
        outcome.flush
    }
}
