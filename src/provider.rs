//! Per-scope preference providers
//!
//! A [`PreferenceProvider`] owns the document of one scope (or one workspace
//! folder). It loads the document lazily from its resource, serializes every
//! read-modify-write behind a write mutex, commits the new document in memory
//! and then flushes it through the [`ResourceStore`].
//!
//! Readers only take the short document lock, so a `get` never waits on a
//! flush and always sees the latest committed document. Change
//! notifications are emitted under the write mutex, in commit order.

use crate::config::{DocumentMigrator, EmptyDocumentPolicy, PreferencesConfig};
use crate::document::{PreferenceDocument, ValueChange};
use crate::editor::EditorModels;
use crate::error::{Error, Result};
use crate::events::{EventManager, PreferenceChange};
use crate::key::PreferenceKey;
use crate::resolver::{self, ScopeSnapshot};
use crate::scope::Scope;
use crate::storage::ResourceStore;
use crate::sync::{MutexExt, RwLockExt};

use log::{debug, info, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

struct ProviderState {
    document: Arc<PreferenceDocument>,
    loaded: bool,
    /// The committed document differs from what the resource holds because
    /// the last flush failed
    dirty: bool,
}

impl ProviderState {
    fn new(document: PreferenceDocument, loaded: bool) -> Self {
        Self {
            document: Arc::new(document),
            loaded,
            dirty: false,
        }
    }
}

/// Result of a committed mutation.
///
/// The changes are already visible in memory even when `flush` is an error.
#[derive(Debug)]
pub struct ApplyOutcome {
    pub changes: Vec<PreferenceChange>,
    pub flush: Result<()>,
}

impl ApplyOutcome {
    fn unchanged() -> Self {
        Self {
            changes: Vec::new(),
            flush: Ok(()),
        }
    }
}

/// Owner of one scope's persisted document
pub struct PreferenceProvider {
    scope: Scope,
    folder: Option<PathBuf>,
    /// `None` for memory-only providers (the default scope)
    config_path: Option<PathBuf>,
    store: Arc<dyn ResourceStore>,
    editors: Arc<dyn EditorModels>,
    events: Option<Arc<EventManager>>,
    pretty_json: bool,
    empty_document_policy: EmptyDocumentPolicy,
    migrator: Option<DocumentMigrator>,
    state: RwLock<ProviderState>,
    /// Serializes read-modify-write sequences and the notifications they emit
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for PreferenceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceProvider")
            .field("scope", &self.scope)
            .field("folder", &self.folder)
            .field("config_path", &self.config_path)
            .field("empty_document_policy", &self.empty_document_policy)
            .finish_non_exhaustive()
    }
}

impl PreferenceProvider {
    /// Create a provider backed by a resource
    pub fn new(
        scope: Scope,
        folder: Option<PathBuf>,
        config_path: PathBuf,
        store: Arc<dyn ResourceStore>,
        editors: Arc<dyn EditorModels>,
        config: &PreferencesConfig,
    ) -> Self {
        debug!("Created {scope} provider for {}", config_path.display());
        Self {
            scope,
            folder,
            config_path: Some(config_path),
            store,
            editors,
            events: None,
            pretty_json: config.pretty_json,
            empty_document_policy: config.empty_document_policy,
            migrator: config.migrator.clone(),
            state: RwLock::new(ProviderState::new(PreferenceDocument::new(), false)),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a memory-only provider holding `document`
    pub fn in_memory(scope: Scope, document: PreferenceDocument) -> Self {
        Self {
            scope,
            folder: None,
            config_path: None,
            store: Arc::new(crate::storage::MemoryStore::new()),
            editors: Arc::new(crate::editor::NoEditors),
            events: None,
            pretty_json: true,
            empty_document_policy: EmptyDocumentPolicy::default(),
            migrator: None,
            state: RwLock::new(ProviderState::new(document, true)),
            write_lock: Mutex::new(()),
        }
    }

    /// Notify `events` of every committed change.
    ///
    /// Listeners run while this provider's write mutex is held, so they see
    /// changes in commit order. A listener must not write to the same scope
    /// synchronously; reads are fine.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventManager>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Folder root, for folder-scope providers
    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    /// Path of the backing resource, `None` for memory-only providers
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Latest committed document, loading it on first access.
    ///
    /// Loading does not wait for in-flight writes. The only exception is a
    /// document the migrator changes: saving it back takes the write mutex.
    pub fn document(&self) -> Arc<PreferenceDocument> {
        self.ensure_loaded();
        self.committed()
    }

    /// Raw value stored under `key` in this scope, without any fallback
    pub fn get(&self, key: &PreferenceKey) -> Option<Value> {
        self.document().get(key)
    }

    /// Value of `key` as seen from this scope alone: an unset combined key
    /// falls back to its plain name in the same document
    pub fn resolve(&self, key: &PreferenceKey) -> Option<Value> {
        let snapshot = ScopeSnapshot::new(self.scope, self.document());
        resolver::resolve(std::slice::from_ref(&snapshot), key).map(|r| r.value)
    }

    /// Whether the last flush failed and the resource is behind memory
    pub fn is_dirty(&self) -> bool {
        self.state.read_recovered().dirty
    }

    /// Apply a mutation (see [`PreferenceDocument::apply`]), commit it,
    /// notify listeners and flush it.
    ///
    /// A mutation that changes nothing still flushes while the provider is
    /// dirty, so retrying after a failed flush persists the committed state.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidOverrideValue` for a non-object group value; the
    /// document is untouched. Flush failures are reported in
    /// [`ApplyOutcome::flush`] instead, after the commit.
    pub fn apply(&self, key: &PreferenceKey, value: Option<Value>) -> Result<ApplyOutcome> {
        let _guard = self.write_lock.lock_recovered();
        self.load_locked();

        let mut next = (*self.committed()).clone();
        let changes = next.apply(key, value)?;
        if changes.is_empty() {
            debug!("{key} unchanged in {} scope", self.scope);
            return Ok(self.retry_flush());
        }

        Ok(self.commit_and_flush(next, changes))
    }

    /// Remove every value in this scope.
    ///
    /// The document is reset to empty and persisted per the empty-document
    /// policy: `{}` is written, or the resource is deleted. Clearing a
    /// document that is already empty does nothing unless the provider is
    /// dirty.
    pub fn clear(&self) -> ApplyOutcome {
        let _guard = self.write_lock.lock_recovered();
        self.load_locked();

        let mut next = (*self.committed()).clone();
        let changes = next.clear();
        if changes.is_empty() {
            return self.retry_flush();
        }
        info!("Clearing {} preferences", self.scope);
        self.commit_and_flush(next, changes)
    }

    /// Re-read the backing resource, notify listeners and return what changed
    pub fn reload(&self) -> Vec<PreferenceChange> {
        let Some(path) = self.config_path.clone() else {
            return Vec::new();
        };
        let _guard = self.write_lock.lock_recovered();

        let fresh = self.load(&path);
        let previous = {
            let mut state = self.state.write_recovered();
            let previous = std::mem::replace(&mut state.document, Arc::new(fresh));
            let was_loaded = std::mem::replace(&mut state.loaded, true);
            state.dirty = false;
            if !was_loaded {
                return Vec::new();
            }
            previous
        };

        let changes = self.to_preference_changes(previous.diff(&self.committed()));
        self.notify(&changes);
        changes
    }

    /// Drop the in-memory document; the next read reloads it
    pub fn invalidate(&self) {
        if self.config_path.is_none() {
            return;
        }
        let _guard = self.write_lock.lock_recovered();
        let mut state = self.state.write_recovered();
        if state.dirty {
            warn!("Discarding unsaved {} preferences", self.scope);
        }
        state.loaded = false;
        state.dirty = false;
        debug!("{} preferences invalidated", self.scope);
    }

    fn commit_and_flush(
        &self,
        next: PreferenceDocument,
        changes: Vec<ValueChange>,
    ) -> ApplyOutcome {
        let next = Arc::new(next);
        self.state.write_recovered().document = Arc::clone(&next);

        let changes = self.to_preference_changes(changes);
        self.notify(&changes);

        ApplyOutcome {
            changes,
            flush: self.flush_tracked(&next),
        }
    }

    /// Flush the committed document again if an earlier flush failed
    fn retry_flush(&self) -> ApplyOutcome {
        if !self.is_dirty() {
            return ApplyOutcome::unchanged();
        }
        info!("Retrying save of {} preferences", self.scope);
        ApplyOutcome {
            changes: Vec::new(),
            flush: self.flush_tracked(&self.committed()),
        }
    }

    fn flush_tracked(&self, document: &PreferenceDocument) -> Result<()> {
        let flush = self.flush(document);
        if let Err(e) = &flush {
            warn!("{e}");
        }
        self.state.write_recovered().dirty = flush.is_err();
        flush
    }

    fn notify(&self, changes: &[PreferenceChange]) {
        if let Some(events) = &self.events {
            for change in changes {
                events.notify(change);
            }
        }
    }

    fn to_preference_changes(&self, changes: Vec<ValueChange>) -> Vec<PreferenceChange> {
        changes
            .into_iter()
            .map(|c| PreferenceChange::from_value_change(self.scope, self.folder.clone(), c))
            .collect()
    }

    fn committed(&self) -> Arc<PreferenceDocument> {
        Arc::clone(&self.state.read_recovered().document)
    }

    /// Load outside the write mutex. A concurrent writer that loads first
    /// wins; whatever it installed is at least as new as what was read here.
    fn ensure_loaded(&self) {
        if self.state.read_recovered().loaded {
            return;
        }
        let Some(path) = self.config_path.as_deref() else {
            return;
        };

        let (document, migrated) = self.read_document(path);
        if migrated {
            let _guard = self.write_lock.lock_recovered();
            self.load_locked();
            return;
        }
        self.install(document);
    }

    /// Load the document if needed. The caller holds `write_lock`, so a
    /// migration save-back cannot interleave with another flush.
    fn load_locked(&self) {
        if self.state.read_recovered().loaded {
            return;
        }
        if let Some(path) = self.config_path.as_deref() {
            let document = self.load(path);
            self.install(document);
        }
    }

    fn install(&self, document: PreferenceDocument) {
        let mut state = self.state.write_recovered();
        if !state.loaded {
            state.document = Arc::new(document);
            state.loaded = true;
        }
    }

    /// Read the backing document and save it back if the migrator changed
    /// it. The caller holds `write_lock`.
    fn load(&self, path: &Path) -> PreferenceDocument {
        let (document, migrated) = self.read_document(path);
        if migrated {
            info!("Migrated {} preferences at {}", self.scope, path.display());
            if let Err(e) = self.flush(&document) {
                warn!("Failed to save migrated preferences: {e}");
            }
        }
        document
    }

    /// Read and normalize the backing document, reporting whether the
    /// migrator changed it. Never fails: an unreadable or invalid resource
    /// loads as an empty document.
    fn read_document(&self, path: &Path) -> (PreferenceDocument, bool) {
        let text = match self.store.read(path) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!("No {} preferences at {}", self.scope, path.display());
                return (PreferenceDocument::new(), false);
            }
            Err(e) => {
                warn!("Treating {} preferences as empty: {e}", self.scope);
                return (PreferenceDocument::new(), false);
            }
        };

        let Some(migrator) = &self.migrator else {
            return (PreferenceDocument::parse(&text), false);
        };

        let Ok(original) = serde_json::from_str::<Value>(&text) else {
            return (PreferenceDocument::parse(&text), false);
        };
        let migrated = migrator(original.clone());
        let changed = migrated != original;
        (PreferenceDocument::from_value(migrated), changed)
    }

    fn flush(&self, document: &PreferenceDocument) -> Result<()> {
        let Some(path) = self.config_path.as_deref() else {
            return Ok(());
        };

        self.write_resource(path, document)
            .map_err(|source| Error::Flush {
                path: path.to_path_buf(),
                source: Box::new(source),
            })
    }

    fn write_resource(&self, path: &Path, document: &PreferenceDocument) -> Result<()> {
        if self.editors.is_dirty(path) {
            warn!(
                "Reverting unsaved editor changes to {} before saving",
                path.display()
            );
            self.editors.revert(path)?;
        }

        if document.is_empty() && self.empty_document_policy == EmptyDocumentPolicy::Delete {
            self.store.delete(path)?;
            info!("Removed empty {} preferences at {}", self.scope, path.display());
        } else {
            let content = document.to_json_string(self.pretty_json)?;
            self.store.write(path, &content)?;
            debug!("Saved {} preferences to {}", self.scope, path.display());
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::NoEditors;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    const PATH: &str = "/workspace/.prefs/settings.json";

    fn provider_with(store: Arc<MemoryStore>, config: &PreferencesConfig) -> PreferenceProvider {
        PreferenceProvider::new(
            Scope::Workspace,
            None,
            PathBuf::from(PATH),
            store,
            Arc::new(NoEditors),
            config,
        )
    }

    fn provider(store: Arc<MemoryStore>) -> PreferenceProvider {
        provider_with(store, &PreferencesConfig::builder("test").compact_json().build())
    }

    fn stored(store: &MemoryStore) -> Option<Value> {
        store
            .read(Path::new(PATH))
            .unwrap()
            .map(|text| serde_json::from_str(&text).unwrap())
    }

    #[test]
    fn test_apply_commits_and_flushes() {
        let store = Arc::new(MemoryStore::new());
        let provider = provider(store.clone());

        let outcome = provider
            .apply(&PreferenceKey::parse("[swift].editor.tabSize"), Some(json!(6)))
            .unwrap();
        outcome.flush.unwrap();

        assert_eq!(outcome.changes.len(), 1);
        assert_eq!(outcome.changes[0].scope, Scope::Workspace);
        assert_eq!(outcome.changes[0].key, "[swift].editor.tabSize");
        assert_eq!(stored(&store), Some(json!({"[swift]": {"editor.tabSize": 6}})));
    }

    #[test]
    fn test_unchanged_apply_skips_io() {
        let store = Arc::new(MemoryStore::new());
        let provider = provider(store.clone());
        let key = PreferenceKey::parse("editor.tabSize");

        provider.apply(&key, Some(json!(2))).unwrap().flush.unwrap();
        let outcome = provider.apply(&key, Some(json!(2))).unwrap();
        assert!(outcome.changes.is_empty());
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_flush_failure_keeps_memory_state() {
        let store = Arc::new(MemoryStore::new());
        let provider = provider(store.clone());
        store.set_read_only(true);

        let key = PreferenceKey::parse("editor.tabSize");
        let outcome = provider.apply(&key, Some(json!(8))).unwrap();

        let err = outcome.flush.unwrap_err();
        assert!(err.is_flush_error());
        assert_eq!(provider.get(&key), Some(json!(8)));
        assert_eq!(stored(&store), None);
    }

    #[test]
    fn test_invalid_document_loads_empty_then_write_replaces_it() {
        let store = Arc::new(MemoryStore::new().with_file(PATH, "{ this is not json"));
        let provider = provider(store.clone());

        assert!(provider.document().is_empty());
        provider
            .apply(&PreferenceKey::parse("files.autoSave"), Some(json!("off")))
            .unwrap()
            .flush
            .unwrap();
        assert_eq!(stored(&store), Some(json!({"files.autoSave": "off"})));
    }

    #[test]
    fn test_clear_with_delete_policy_removes_resource() {
        let store = Arc::new(MemoryStore::new().with_file(PATH, r#"{"a": 1, "[go]": {"b": 2}}"#));
        let config = PreferencesConfig::builder("test")
            .empty_document_policy(EmptyDocumentPolicy::Delete)
            .build();
        let provider = provider_with(store.clone(), &config);

        let outcome = provider.clear();
        outcome.flush.unwrap();
        assert_eq!(outcome.changes.len(), 2);
        assert!(provider.document().is_empty());
        assert!(!store.exists(Path::new(PATH)));
    }

    #[test]
    fn test_clear_default_policy_writes_empty_object() {
        let store = Arc::new(MemoryStore::new().with_file(PATH, r#"{"a": 1}"#));
        let provider = provider(store.clone());

        provider.clear().flush.unwrap();
        assert_eq!(stored(&store), Some(json!({})));
    }

    #[test]
    fn test_reload_reports_external_edits() {
        let store = Arc::new(MemoryStore::new().with_file(PATH, r#"{"a": 1}"#));
        let provider = provider(store.clone());
        assert_eq!(provider.document().len(), 1);

        store.write(Path::new(PATH), r#"{"a": 2, "[go]": {"b": 3}}"#).unwrap();
        let changes = provider.reload();

        assert_eq!(changes.len(), 2);
        assert_eq!(provider.get(&PreferenceKey::parse("[go].b")), Some(json!(3)));
    }

    #[test]
    fn test_migrator_runs_on_load_and_saves_back() {
        let store = Arc::new(MemoryStore::new().with_file(PATH, r#"{"editor.tabWidth": 3}"#));
        let config = PreferencesConfig::builder("test")
            .compact_json()
            .with_migrator(|mut value| {
                if let Some(obj) = value.as_object_mut() {
                    if let Some(size) = obj.remove("editor.tabWidth") {
                        obj.insert("editor.tabSize".to_string(), size);
                    }
                }
                value
            })
            .build();
        let provider = provider_with(store.clone(), &config);

        assert_eq!(
            provider.get(&PreferenceKey::parse("editor.tabSize")),
            Some(json!(3))
        );
        assert_eq!(stored(&store), Some(json!({"editor.tabSize": 3})));
    }

    #[test]
    fn test_retrying_same_write_after_failed_flush_persists() {
        let store = Arc::new(MemoryStore::new());
        let provider = provider(store.clone());
        let key = PreferenceKey::parse("[swift].editor.tabSize");

        store.set_read_only(true);
        assert!(provider.apply(&key, Some(json!(6))).unwrap().flush.is_err());
        assert!(provider.is_dirty());

        store.set_read_only(false);
        let outcome = provider.apply(&key, Some(json!(6))).unwrap();
        outcome.flush.unwrap();
        assert!(outcome.changes.is_empty());
        assert!(!provider.is_dirty());
        assert_eq!(stored(&store), Some(json!({"[swift]": {"editor.tabSize": 6}})));

        // Clean again, so the same write is a no-op
        provider.apply(&key, Some(json!(6))).unwrap().flush.unwrap();
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_retrying_reset_after_failed_flush_persists() {
        let store = Arc::new(MemoryStore::new().with_file(PATH, r#"{"a": 1, "b": 2}"#));
        let provider = provider(store.clone());
        let key = PreferenceKey::parse("a");

        store.set_read_only(true);
        assert!(provider.apply(&key, None).unwrap().flush.is_err());
        assert_eq!(stored(&store), Some(json!({"a": 1, "b": 2})));

        store.set_read_only(false);
        provider.apply(&key, None).unwrap().flush.unwrap();
        assert_eq!(stored(&store), Some(json!({"b": 2})));
    }

    #[test]
    fn test_clear_of_empty_document_skips_io() {
        let store = Arc::new(MemoryStore::new());
        let config = PreferencesConfig::builder("test")
            .empty_document_policy(EmptyDocumentPolicy::Delete)
            .build();
        let provider = provider_with(store.clone(), &config);

        let outcome = provider.clear();
        outcome.flush.unwrap();
        assert!(outcome.changes.is_empty());
        assert!(!store.exists(Path::new(PATH)));
        assert_eq!(store.write_count(), 0);

        let provider = provider_with(Arc::clone(&store), &PreferencesConfig::builder("t").build());
        provider.clear().flush.unwrap();
        assert!(!store.exists(Path::new(PATH)));
    }

    #[test]
    fn test_clear_retries_failed_flush() {
        let store = Arc::new(MemoryStore::new().with_file(PATH, r#"{"a": 1}"#));
        let provider = provider(store.clone());

        store.set_read_only(true);
        assert!(provider.clear().flush.is_err());

        store.set_read_only(false);
        let outcome = provider.clear();
        outcome.flush.unwrap();
        assert!(outcome.changes.is_empty());
        assert_eq!(stored(&store), Some(json!({})));
    }

    #[test]
    fn test_first_read_after_invalidate_does_not_wait_for_writer() {
        let store = Arc::new(MemoryStore::new().with_file(PATH, r#"{"a": 1}"#));
        let provider = Arc::new(provider(store));
        provider.invalidate();

        let guard = provider.write_lock.lock_recovered();
        let (tx, rx) = std::sync::mpsc::channel();
        let reader = Arc::clone(&provider);
        let handle = std::thread::spawn(move || {
            tx.send(reader.get(&PreferenceKey::parse("a"))).unwrap();
        });

        let value = rx.recv_timeout(std::time::Duration::from_secs(5));
        drop(guard);
        handle.join().unwrap();
        assert_eq!(value.unwrap(), Some(json!(1)));
    }

    #[test]
    fn test_changes_are_notified_on_commit() {
        let store = Arc::new(MemoryStore::new());
        let events = Arc::new(EventManager::new());
        let rx = events.subscribe();
        let provider = provider(store.clone()).with_events(events);

        store.set_read_only(true);
        let key = PreferenceKey::parse("[go].editor.tabSize");
        assert!(provider.apply(&key, Some(json!(8))).unwrap().flush.is_err());

        let change = rx.try_recv().unwrap();
        assert_eq!(change.key, "[go].editor.tabSize");
        assert_eq!(change.new_value, Some(json!(8)));

        // A retry only flushes, it does not notify again
        store.set_read_only(false);
        provider.apply(&key, Some(json!(8))).unwrap().flush.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_resolve_stays_within_scope() {
        let store = Arc::new(
            MemoryStore::new().with_file(PATH, r#"{"editor.tabSize": 2, "[go]": {"editor.fontSize": 9}}"#),
        );
        let provider = provider(store);

        assert_eq!(
            provider.resolve(&PreferenceKey::parse("[swift].editor.tabSize")),
            Some(json!(2))
        );
        assert_eq!(
            provider.resolve(&PreferenceKey::parse("[go].editor.fontSize")),
            Some(json!(9))
        );
        assert_eq!(provider.resolve(&PreferenceKey::parse("editor.fontSize")), None);
        assert_eq!(provider.get(&PreferenceKey::parse("[swift].editor.tabSize")), None);
    }

    struct DirtyEditor {
        dirty: AtomicBool,
    }

    impl EditorModels for DirtyEditor {
        fn is_dirty(&self, _path: &Path) -> bool {
            self.dirty.load(Ordering::SeqCst)
        }

        fn revert(&self, _path: &Path) -> Result<()> {
            self.dirty.store(false, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_dirty_editor_buffer_is_reverted_before_write() {
        let store = Arc::new(MemoryStore::new());
        let editor = Arc::new(DirtyEditor {
            dirty: AtomicBool::new(true),
        });
        let provider = PreferenceProvider::new(
            Scope::User,
            None,
            PathBuf::from(PATH),
            store.clone(),
            editor.clone(),
            &PreferencesConfig::builder("test").build(),
        );

        provider
            .apply(&PreferenceKey::parse("a"), Some(json!(1)))
            .unwrap()
            .flush
            .unwrap();
        assert!(!editor.dirty.load(Ordering::SeqCst));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_in_memory_provider_never_touches_store() {
        let provider = PreferenceProvider::in_memory(
            Scope::Default,
            PreferenceDocument::from_value(json!({"editor.tabSize": 4})),
        );
        assert!(provider.config_path().is_none());
        assert_eq!(
            provider.get(&PreferenceKey::parse("editor.tabSize")),
            Some(json!(4))
        );
        assert!(provider.reload().is_empty());
    }
}
