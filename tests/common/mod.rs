//! Common test utilities for prefscope integration tests
//!
//! Provides a temp-dir backed service with defaults and a workspace file.

#![allow(dead_code)]

use prefscope::{PreferenceService, Scope};
use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Test Fixtures
// =============================================================================

/// Test fixture that provides a temporary directory and configured PreferenceService
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub prefs: PreferenceService,
}

impl TestFixture {
    /// Create a new test fixture with user and workspace scopes
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let prefs = Self::builder(&temp_dir)
            .build()
            .expect("Failed to create service");

        Self { temp_dir, prefs }
    }

    /// Create a fixture with two registered workspace folders,
    /// `frontend` and `backend`
    pub fn with_folders() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let prefs = Self::builder(&temp_dir)
            .with_folder(temp_dir.path().join("project/frontend"))
            .with_folder(temp_dir.path().join("project/backend"))
            .build()
            .expect("Failed to create service");

        Self { temp_dir, prefs }
    }

    fn builder(temp_dir: &TempDir) -> prefscope::PreferenceServiceBuilder {
        PreferenceService::builder("test-editor")
            .config_dir(temp_dir.path().join("user"))
            .workspace_file(temp_dir.path().join("project/.prefs/settings.json"))
            .with_default("editor.tabSize", json!(4))
            .with_default("editor.fontSize", json!(14))
    }

    /// Path of a file inside a registered folder
    pub fn folder_file(&self, folder: &str, file: &str) -> PathBuf {
        self.temp_dir.path().join("project").join(folder).join(file)
    }

    /// Get the user settings file path
    pub fn user_path(&self) -> PathBuf {
        self.temp_dir.path().join("user/settings.json")
    }

    /// Get the workspace settings file path
    pub fn workspace_path(&self) -> PathBuf {
        self.temp_dir.path().join("project/.prefs/settings.json")
    }

    /// Get a folder's settings file path
    pub fn folder_path(&self, folder: &str) -> PathBuf {
        self.temp_dir
            .path()
            .join("project")
            .join(folder)
            .join(".prefs/settings.json")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read and parse a raw settings file
pub fn read_json(path: &PathBuf) -> Option<Value> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Read the raw workspace settings JSON
pub fn read_workspace(fixture: &TestFixture) -> Option<Value> {
    read_json(&fixture.workspace_path())
}

/// Raw committed document of a scope, as JSON
pub fn raw_document(fixture: &TestFixture, scope: Scope) -> Value {
    fixture
        .prefs
        .document(scope, None)
        .expect("scope has a provider")
        .to_value()
}
