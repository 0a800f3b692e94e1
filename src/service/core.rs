use crate::config::PreferencesConfig;
use crate::document::{PreferenceDocument, json_type};
use crate::editor::{EditorModels, NoEditors};
use crate::error::{Error, Result};
use crate::events::EventManager;
use crate::key::PreferenceKey;
use crate::provider::PreferenceProvider;
use crate::registry::ProviderRegistry;
use crate::scope::Scope;
use crate::storage::{FileStore, ResourceStore};

use log::info;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Entry point for reading and writing layered preferences.
///
/// One `PreferenceService` exists per workspace session. It owns the
/// [`ProviderRegistry`] (default, user, workspace and per-folder providers),
/// resolves effective values across them and emits change events for every
/// committed mutation.
///
/// # Example
///
/// ```rust,no_run
/// use prefscope::{PreferenceService, Scope};
/// use serde_json::json;
///
/// let prefs = PreferenceService::builder("my-editor")
///     .config_dir("~/.config/my-editor")
///     .workspace_file("/work/project/.prefs/settings.json")
///     .with_default("editor.tabSize", json!(4))
///     .build()?;
///
/// prefs.set("[rust].editor.tabSize", json!(2), Scope::Workspace, None)?;
/// assert_eq!(prefs.get("[rust].editor.tabSize", None), Some(json!(2)));
/// assert_eq!(prefs.get("editor.tabSize", None), Some(json!(4)));
/// # Ok::<(), prefscope::Error>(())
/// ```
pub struct PreferenceService {
    /// Configuration
    pub(crate) config: PreferencesConfig,

    /// Resource store shared by every provider
    pub(crate) store: Arc<dyn ResourceStore>,

    /// Editor buffer collaborator shared by every provider
    pub(crate) editors: Arc<dyn EditorModels>,

    /// Providers per scope and folder
    pub(crate) registry: ProviderRegistry,

    /// Event manager for change callbacks
    pub(crate) events: Arc<EventManager>,
}

impl PreferenceService {
    /// Create a service with a user scope only, on the filesystem.
    ///
    /// Use [`PreferenceService::builder`] to add workspace and folder scopes
    /// or to inject a different store.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidOverrideValue` if the configured defaults hold
    /// an override group that is not an object.
    pub fn new(config: PreferencesConfig) -> Result<Self> {
        Self::with_collaborators(config, Arc::new(FileStore::new()), Arc::new(NoEditors), None)
    }

    pub(crate) fn with_collaborators(
        config: PreferencesConfig,
        store: Arc<dyn ResourceStore>,
        editors: Arc<dyn EditorModels>,
        workspace_file: Option<PathBuf>,
    ) -> Result<Self> {
        let defaults = Self::defaults_document(&config)?;
        let events = Arc::new(EventManager::new());

        let user = PreferenceProvider::new(
            Scope::User,
            None,
            config.user_settings_path(),
            Arc::clone(&store),
            Arc::clone(&editors),
            &config,
        )
        .with_events(Arc::clone(&events));
        let mut registry =
            ProviderRegistry::new(PreferenceProvider::in_memory(Scope::Default, defaults))
                .with_user(user);

        if let Some(path) = workspace_file {
            registry = registry.with_workspace(PreferenceProvider::new(
                Scope::Workspace,
                None,
                path,
                Arc::clone(&store),
                Arc::clone(&editors),
                &config,
            )
            .with_events(Arc::clone(&events)));
        }

        info!(
            "Initialized preferences for {} at {}",
            config.app_name,
            config.user_config_dir.display()
        );

        Ok(Self {
            config,
            store,
            editors,
            registry,
            events,
        })
    }

    /// Defaults are trusted input, so a malformed override group is a
    /// configuration error rather than something to drop silently.
    fn defaults_document(config: &PreferencesConfig) -> Result<PreferenceDocument> {
        for (key, value) in &config.defaults {
            if matches!(PreferenceKey::parse(key), PreferenceKey::Group(_)) && !value.is_object() {
                return Err(Error::InvalidOverrideValue {
                    key: key.clone(),
                    found: json_type(value).to_string(),
                });
            }
        }
        Ok(PreferenceDocument::from_value(Value::Object(
            config.defaults.clone(),
        )))
    }

    /// Get the configuration
    pub fn config(&self) -> &PreferencesConfig {
        &self.config
    }

    /// Get the resource store
    pub fn store(&self) -> &Arc<dyn ResourceStore> {
        &self.store
    }

    /// Get the provider registry
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Get the event manager for registering change listeners
    ///
    /// Listeners are called synchronously, in commit order, while the
    /// changed scope is locked for writing. A listener may read preferences
    /// but must not write to the scope that notified it; use
    /// [`EventManager::subscribe`] to react with writes on another thread.
    ///
    /// # Example
    ///
    /// ```
    /// # use prefscope::*;
    /// # let prefs = PreferenceService::builder("test")
    /// #     .store(std::sync::Arc::new(MemoryStore::new()))
    /// #     .build()
    /// #     .unwrap();
    /// // Watch all changes
    /// prefs.events().on_change(|change| {
    ///     println!("{} {}: {:?} -> {:?}", change.scope, change.key, change.old_value, change.new_value);
    /// });
    ///
    /// // Watch one override
    /// prefs.events().watch("[rust].editor.tabSize", |change| {
    ///     println!("Rust tab size is now {:?}", change.new_value);
    /// });
    /// ```
    pub fn events(&self) -> &Arc<EventManager> {
        &self.events
    }

    /// Register a workspace folder; its settings live under
    /// `<root>/<folder_config_dir>/<settings_file>`
    pub fn add_folder(&self, root: impl Into<PathBuf>) {
        let root = root.into();
        let path = self.config.folder_settings_path(&root);
        self.registry.add_folder(PreferenceProvider::new(
            Scope::Folder,
            Some(root),
            path,
            Arc::clone(&self.store),
            Arc::clone(&self.editors),
            &self.config,
        )
        .with_events(Arc::clone(&self.events)));
    }

    /// Unregister a workspace folder. Returns false if it was not registered.
    pub fn remove_folder(&self, root: &Path) -> bool {
        self.registry.remove_folder(root).is_some()
    }
}
