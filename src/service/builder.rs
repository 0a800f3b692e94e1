//! Builder for PreferenceService
//!
//! This module contains [`PreferenceServiceBuilder`] which provides a fluent API
//! for creating a [`PreferenceService`](super::PreferenceService).

use crate::config::{EmptyDocumentPolicy, PreferencesConfigBuilder};
use crate::editor::{EditorModels, NoEditors};
use crate::error::Result;
use crate::storage::{FileStore, ResourceStore};

use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use super::PreferenceService;

/// Builder for creating a [`PreferenceService`] with a fluent API.
///
/// # Example
///
/// ```rust,no_run
/// use prefscope::PreferenceService;
/// use serde_json::json;
///
/// let prefs = PreferenceService::builder("my-editor")
///     .config_dir("~/.config/my-editor")
///     .workspace_file("/work/project/.prefs/settings.json")
///     .with_folder("/work/project/frontend")
///     .with_defaults(json!({
///         "editor.tabSize": 4,
///         "[markdown]": { "editor.wordWrap": "on" }
///     }))
///     .build()
///     .unwrap();
/// ```
pub struct PreferenceServiceBuilder {
    config_builder: PreferencesConfigBuilder,
    workspace_file: Option<PathBuf>,
    folders: Vec<PathBuf>,
    store: Arc<dyn ResourceStore>,
    editors: Arc<dyn EditorModels>,
}

impl PreferenceServiceBuilder {
    /// Create a new builder with the required app name.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            config_builder: PreferencesConfigBuilder::new(app_name),
            workspace_file: None,
            folders: Vec::new(),
            store: Arc::new(FileStore::new()),
            editors: Arc::new(NoEditors),
        }
    }

    /// Set the user configuration directory.
    ///
    /// Supports `~` expansion for home directory.
    #[must_use]
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_builder = self.config_builder.config_dir(path);
        self
    }

    /// Set the settings filename (default: "settings.json").
    #[must_use]
    pub fn settings_file(mut self, filename: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.settings_file(filename);
        self
    }

    /// Set the per-folder configuration directory name (default: ".prefs").
    #[must_use]
    pub fn folder_config_dir(mut self, name: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.folder_config_dir(name);
        self
    }

    /// Use compact JSON (no pretty printing).
    #[must_use]
    pub fn compact_json(mut self) -> Self {
        self.config_builder = self.config_builder.compact_json();
        self
    }

    /// Choose whether emptied documents are written as `{}` or deleted.
    #[must_use]
    pub fn empty_document_policy(mut self, policy: EmptyDocumentPolicy) -> Self {
        self.config_builder = self.config_builder.empty_document_policy(policy);
        self
    }

    /// Merge an object of default values, including `[identifier]` groups.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.config_builder = self.config_builder.with_defaults(defaults);
        self
    }

    /// Add a single default value.
    #[must_use]
    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config_builder = self.config_builder.with_default(key, value);
        self
    }

    /// Set a migration function run on each document as it is loaded.
    #[must_use]
    pub fn with_migrator<F>(mut self, migrator: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.config_builder = self.config_builder.with_migrator(migrator);
        self
    }

    /// Enable the workspace scope, backed by this settings file.
    #[must_use]
    pub fn workspace_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.workspace_file = Some(path.into());
        self
    }

    /// Register a workspace folder for the folder scope.
    #[must_use]
    pub fn with_folder(mut self, root: impl Into<PathBuf>) -> Self {
        self.folders.push(root.into());
        self
    }

    /// Use a different resource store (default: the filesystem).
    #[must_use]
    pub fn store(mut self, store: Arc<dyn ResourceStore>) -> Self {
        self.store = store;
        self
    }

    /// Attach an editor-model service so unsaved buffers of settings files
    /// are reverted before they are overwritten.
    #[must_use]
    pub fn editor_models(mut self, editors: Arc<dyn EditorModels>) -> Self {
        self.editors = editors;
        self
    }

    /// Build the [`PreferenceService`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidOverrideValue` if the defaults hold an override
    /// group that is not an object.
    pub fn build(self) -> Result<PreferenceService> {
        let config = self.config_builder.build();
        let service = PreferenceService::with_collaborators(
            config,
            self.store,
            self.editors,
            self.workspace_file,
        )?;

        for root in self.folders {
            service.add_folder(root);
        }

        Ok(service)
    }
}

impl PreferenceService {
    /// Create a builder for `PreferenceService` with a fluent API.
    ///
    /// This is the recommended way to create a `PreferenceService`.
    pub fn builder(app_name: impl Into<String>) -> PreferenceServiceBuilder {
        PreferenceServiceBuilder::new(app_name)
    }
}
