//! Provider registry
//!
//! Holds one provider per scope and one per workspace folder, and routes
//! reads and writes to the provider owning a scope.

use crate::document::PreferenceDocument;
use crate::error::{Error, Result};
use crate::key::PreferenceKey;
use crate::provider::{ApplyOutcome, PreferenceProvider};
use crate::scope::Scope;
use crate::sync::RwLockExt;

use log::{info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Indexed set of providers for one session
pub struct ProviderRegistry {
    default: Arc<PreferenceProvider>,
    user: Option<Arc<PreferenceProvider>>,
    workspace: Option<Arc<PreferenceProvider>>,
    /// Folder root -> provider
    folders: RwLock<BTreeMap<PathBuf, Arc<PreferenceProvider>>>,
}

impl ProviderRegistry {
    pub fn new(default: PreferenceProvider) -> Self {
        Self {
            default: Arc::new(default),
            user: None,
            workspace: None,
            folders: RwLock::new(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn with_user(mut self, provider: PreferenceProvider) -> Self {
        self.user = Some(Arc::new(provider));
        self
    }

    #[must_use]
    pub fn with_workspace(mut self, provider: PreferenceProvider) -> Self {
        self.workspace = Some(Arc::new(provider));
        self
    }

    /// Register (or replace) the provider for a folder root
    pub fn add_folder(&self, provider: PreferenceProvider) {
        let Some(root) = provider.folder().map(Path::to_path_buf) else {
            warn!("Ignoring folder provider without a folder root");
            return;
        };
        info!("Registered folder preferences for {}", root.display());
        self.folders
            .write_recovered()
            .insert(root, Arc::new(provider));
    }

    /// Unregister a folder, returning its provider
    pub fn remove_folder(&self, root: &Path) -> Option<Arc<PreferenceProvider>> {
        let removed = self.folders.write_recovered().remove(root);
        if removed.is_some() {
            info!("Removed folder preferences for {}", root.display());
        }
        removed
    }

    /// Registered folder roots, sorted
    pub fn folders(&self) -> Vec<PathBuf> {
        self.folders.read_recovered().keys().cloned().collect()
    }

    /// Folder provider owning `resource`: the exact root, or else the deepest
    /// root that is an ancestor of it.
    pub fn folder_provider(&self, resource: &Path) -> Option<Arc<PreferenceProvider>> {
        let folders = self.folders.read_recovered();
        if let Some(provider) = folders.get(resource) {
            return Some(Arc::clone(provider));
        }
        folders
            .iter()
            .filter(|(root, _)| resource.starts_with(root))
            .max_by_key(|(root, _)| root.components().count())
            .map(|(_, provider)| Arc::clone(provider))
    }

    /// Locate the provider owning `scope`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProviderNotFound` if the scope has no provider, or for
    /// folder scope if no folder root matches `resource`.
    pub fn provider(&self, scope: Scope, resource: Option<&Path>) -> Result<Arc<PreferenceProvider>> {
        let found = match scope {
            Scope::Default => Some(Arc::clone(&self.default)),
            Scope::User => self.user.clone(),
            Scope::Workspace => self.workspace.clone(),
            Scope::Folder => resource.and_then(|r| self.folder_provider(r)),
        };
        found.ok_or_else(|| Error::ProviderNotFound {
            scope,
            resource: resource.map(Path::to_path_buf),
        })
    }

    /// Providers applicable to `resource`, highest priority first
    pub fn providers_for(&self, resource: Option<&Path>) -> Vec<Arc<PreferenceProvider>> {
        let mut providers = Vec::with_capacity(4);
        if let Some(folder) = resource.and_then(|r| self.folder_provider(r)) {
            providers.push(folder);
        }
        providers.extend(self.workspace.clone());
        providers.extend(self.user.clone());
        providers.push(Arc::clone(&self.default));
        providers
    }

    /// Every registered provider
    pub fn all(&self) -> Vec<Arc<PreferenceProvider>> {
        let mut providers = vec![Arc::clone(&self.default)];
        providers.extend(self.user.clone());
        providers.extend(self.workspace.clone());
        providers.extend(self.folders.read_recovered().values().cloned());
        providers
    }

    /// Current document of the provider owning `scope`
    ///
    /// # Errors
    ///
    /// Returns `Error::ProviderNotFound` if no provider matches.
    pub fn route_read(&self, scope: Scope, resource: Option<&Path>) -> Result<Arc<PreferenceDocument>> {
        Ok(self.provider(scope, resource)?.document())
    }

    /// Apply a mutation through the provider owning `scope`.
    ///
    /// The lookup happens before anything is mutated.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProviderNotFound`, `Error::ReadOnlyScope` for the
    /// default scope, or `Error::InvalidOverrideValue`.
    pub fn route_write(
        &self,
        scope: Scope,
        resource: Option<&Path>,
        key: &PreferenceKey,
        value: Option<Value>,
    ) -> Result<ApplyOutcome> {
        if !scope.is_writable() {
            return Err(Error::ReadOnlyScope(scope));
        }
        self.provider(scope, resource)?.apply(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreferencesConfig;
    use crate::editor::NoEditors;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn folder_provider(root: &str, store: &Arc<MemoryStore>) -> PreferenceProvider {
        let config = PreferencesConfig::builder("test").build();
        PreferenceProvider::new(
            Scope::Folder,
            Some(PathBuf::from(root)),
            config.folder_settings_path(Path::new(root)),
            store.clone(),
            Arc::new(NoEditors),
            &config,
        )
    }

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new(PreferenceProvider::in_memory(
            Scope::Default,
            PreferenceDocument::new(),
        ))
    }

    #[test]
    fn test_folder_lookup_prefers_deepest_root() {
        let store = Arc::new(MemoryStore::new());
        let registry = registry();
        registry.add_folder(folder_provider("/work", &store));
        registry.add_folder(folder_provider("/work/nested", &store));

        let exact = registry.provider(Scope::Folder, Some(Path::new("/work"))).unwrap();
        assert_eq!(exact.folder(), Some(Path::new("/work")));

        let inner = registry
            .provider(Scope::Folder, Some(Path::new("/work/nested/src/main.rs")))
            .unwrap();
        assert_eq!(inner.folder(), Some(Path::new("/work/nested")));

        let outer = registry
            .provider(Scope::Folder, Some(Path::new("/work/other/file.rs")))
            .unwrap();
        assert_eq!(outer.folder(), Some(Path::new("/work")));

        // Component-wise match: /workshop is not inside /work
        assert!(registry.folder_provider(Path::new("/workshop")).is_none());
    }

    #[test]
    fn test_missing_provider_is_not_found() {
        let registry = registry();

        let err = registry.provider(Scope::Workspace, None).unwrap_err();
        assert!(err.is_not_found());

        let err = registry
            .route_write(
                Scope::Folder,
                Some(Path::new("/nowhere")),
                &PreferenceKey::parse("a"),
                Some(json!(1)),
            )
            .unwrap_err();
        assert!(err.is_not_found());

        let err = registry.provider(Scope::Folder, None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_default_scope_is_read_only() {
        let registry = registry();
        let err = registry
            .route_write(Scope::Default, None, &PreferenceKey::parse("a"), Some(json!(1)))
            .unwrap_err();
        assert!(matches!(err, Error::ReadOnlyScope(Scope::Default)));
    }

    #[test]
    fn test_remove_folder() {
        let store = Arc::new(MemoryStore::new());
        let registry = registry();
        registry.add_folder(folder_provider("/a", &store));
        registry.add_folder(folder_provider("/b", &store));
        assert_eq!(registry.folders(), vec![PathBuf::from("/a"), PathBuf::from("/b")]);

        assert!(registry.remove_folder(Path::new("/a")).is_some());
        assert!(registry.remove_folder(Path::new("/a")).is_none());
        assert_eq!(registry.providers_for(Some(Path::new("/b/x"))).len(), 2);
        assert_eq!(registry.all().len(), 2);
    }
}
