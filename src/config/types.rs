//! Core configuration types for prefscope

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Migration hook run on every document as it is loaded
pub type DocumentMigrator = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// What a provider does with its resource once the document becomes empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyDocumentPolicy {
    /// Keep the resource and write `{}` (default)
    #[default]
    WriteEmpty,
    /// Remove the resource
    Delete,
}

/// Configuration for a preference session
#[derive(Clone)]
pub struct PreferencesConfig {
    /// Application name (used for the default user config directory)
    pub app_name: String,

    /// Directory holding the user settings file
    pub user_config_dir: PathBuf,

    /// Filename for settings files in every scope (e.g., "settings.json")
    pub settings_file: String,

    /// Directory inside each workspace folder holding its settings file
    pub folder_config_dir: String,

    /// Pretty print persisted JSON
    pub pretty_json: bool,

    /// Behavior when a document becomes empty
    pub empty_document_policy: EmptyDocumentPolicy,

    /// Default scope values, including `[identifier]` groups
    pub defaults: Map<String, Value>,

    /// Optional migration function (lazy migration).
    /// If it modifies a loaded document, the migrated version is saved back.
    pub migrator: Option<DocumentMigrator>,
}

impl std::fmt::Debug for PreferencesConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferencesConfig")
            .field("app_name", &self.app_name)
            .field("user_config_dir", &self.user_config_dir)
            .field("settings_file", &self.settings_file)
            .field("folder_config_dir", &self.folder_config_dir)
            .field("pretty_json", &self.pretty_json)
            .field("empty_document_policy", &self.empty_document_policy)
            .field("defaults", &self.defaults.len())
            .field("migrator", &self.migrator.as_ref().map(|_| "Some(Fn)"))
            .finish()
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        PreferencesConfigBuilder::new("app").build()
    }
}

impl PreferencesConfig {
    /// Create a new builder for `PreferencesConfig`
    ///
    /// # Example
    /// ```rust
    /// use prefscope::PreferencesConfig;
    ///
    /// let config = PreferencesConfig::builder("my-editor")
    ///     .config_dir("~/.config/my-editor")
    ///     .build();
    /// ```
    pub fn builder(app_name: impl Into<String>) -> PreferencesConfigBuilder {
        PreferencesConfigBuilder::new(app_name)
    }

    /// Full path to the user settings file
    pub fn user_settings_path(&self) -> PathBuf {
        self.user_config_dir.join(&self.settings_file)
    }

    /// Full path to the settings file of a workspace folder
    pub fn folder_settings_path(&self, folder: &Path) -> PathBuf {
        folder
            .join(&self.folder_config_dir)
            .join(&self.settings_file)
    }
}

/// Builder for creating `PreferencesConfig` with a fluent API
#[derive(Clone)]
pub struct PreferencesConfigBuilder {
    app_name: String,
    config_dir: Option<PathBuf>,
    settings_file: String,
    folder_config_dir: String,
    pretty_json: bool,
    empty_document_policy: EmptyDocumentPolicy,
    defaults: Map<String, Value>,
    migrator: Option<DocumentMigrator>,
}

impl PreferencesConfigBuilder {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            config_dir: None,
            settings_file: "settings.json".into(),
            folder_config_dir: ".prefs".into(),
            pretty_json: true,
            empty_document_policy: EmptyDocumentPolicy::default(),
            defaults: Map::new(),
            migrator: None,
        }
    }

    /// Set the user configuration directory
    ///
    /// Supports `~` expansion for home directory.
    #[must_use]
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(expand_home(path.into()));
        self
    }

    /// Set the settings filename (default: "settings.json")
    #[must_use]
    pub fn settings_file(mut self, filename: impl Into<String>) -> Self {
        self.settings_file = filename.into();
        self
    }

    /// Set the per-folder configuration directory name (default: ".prefs")
    #[must_use]
    pub fn folder_config_dir(mut self, name: impl Into<String>) -> Self {
        self.folder_config_dir = name.into();
        self
    }

    /// Use compact JSON (no pretty printing)
    #[must_use]
    pub fn compact_json(mut self) -> Self {
        self.pretty_json = false;
        self
    }

    #[must_use]
    pub fn empty_document_policy(mut self, policy: EmptyDocumentPolicy) -> Self {
        self.empty_document_policy = policy;
        self
    }

    /// Merge an object of default values into the default scope.
    ///
    /// Non-object values are ignored.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        if let Value::Object(map) = defaults {
            self.defaults.extend(map);
        }
        self
    }

    /// Add a single default value
    #[must_use]
    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    /// Set a migration function run on each document as it is loaded
    ///
    /// # Example
    ///
    /// ```rust
    /// use prefscope::PreferencesConfig;
    ///
    /// let config = PreferencesConfig::builder("my-editor")
    ///     .with_migrator(|mut value| {
    ///         // Rename a preference that moved
    ///         if let Some(obj) = value.as_object_mut() {
    ///             if let Some(size) = obj.remove("editor.tabWidth") {
    ///                 obj.insert("editor.tabSize".to_string(), size);
    ///             }
    ///         }
    ///         value
    ///     })
    ///     .build();
    /// ```
    #[must_use]
    pub fn with_migrator<F>(mut self, migrator: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.migrator = Some(Arc::new(migrator));
        self
    }

    /// Build the `PreferencesConfig`
    ///
    /// If `config_dir` is not set, uses the system config directory for the app.
    pub fn build(self) -> PreferencesConfig {
        let user_config_dir = self.config_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .map(|d| d.join(&self.app_name))
                .unwrap_or_else(|| PathBuf::from("."))
        });

        PreferencesConfig {
            app_name: self.app_name,
            user_config_dir,
            settings_file: self.settings_file,
            folder_config_dir: self.folder_config_dir,
            pretty_json: self.pretty_json,
            empty_document_policy: self.empty_document_policy,
            defaults: self.defaults,
            migrator: self.migrator,
        }
    }
}

fn expand_home(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match dirs::home_dir() {
        Some(home) => home.join(path.strip_prefix("~").unwrap_or(&path)),
        None => path,
    }
}
