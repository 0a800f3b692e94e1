//! Error types for prefscope

use crate::scope::Scope;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for prefscope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for prefscope
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete file '{path}': {source}")]
    FileDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisting a document failed after its in-memory state was committed.
    ///
    /// The new value stays visible to readers; retrying the write is safe.
    #[error("Failed to flush preferences to '{path}': {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to revert unsaved editor changes for '{path}': {reason}")]
    EditorRevert { path: PathBuf, reason: String },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse preference value: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Preference Errors
    // -------------------------------------------------------------------------
    #[error("Override group '{key}' must be an object, got {found}")]
    InvalidOverrideValue { key: String, found: String },

    #[error("Invalid override identifier: {0:?}")]
    InvalidOverrideIdentifier(String),

    #[error("No preference provider for {scope} scope{}", resource_suffix(.resource))]
    ProviderNotFound {
        scope: Scope,
        resource: Option<PathBuf>,
    },

    #[error("The {0} scope is read-only")]
    ReadOnlyScope(Scope),
}

fn resource_suffix(resource: &Option<PathBuf>) -> String {
    resource
        .as_ref()
        .map(|p| format!(" (resource '{}')", p.display()))
        .unwrap_or_default()
}

impl Error {
    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ProviderNotFound { .. })
    }

    /// Check if the in-memory update succeeded but persisting it did not
    #[must_use]
    pub fn is_flush_error(&self) -> bool {
        matches!(self, Error::Flush { .. })
    }
}
