//! # prefscope - Layered preference resolution
//!
//! A framework-agnostic library for reading and writing editor-style
//! preferences across layered scopes, with per-language overrides.
//!
//! ## Features
//!
//! - **Scopes**: `Default < User < Workspace < Folder`, each backed by its own JSON document
//! - **Overrides**: `[rust].editor.tabSize` is stored as `{"[rust]": {"editor.tabSize": 2}}`
//!   and beats plain `editor.tabSize` in the same or any lower scope
//! - **Multi-root workspaces**: one folder provider per registered folder root
//! - **Change events**: callbacks, per-key watchers and channel subscribers
//! - **Serialized writes**: read-modify-write never interleaves within a scope,
//!   reads never block on disk
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prefscope::{PreferenceService, Scope};
//! use serde_json::json;
//! use std::path::Path;
//!
//! let prefs = PreferenceService::builder("my-editor")
//!     .config_dir("~/.config/my-editor")
//!     .workspace_file("/work/project/.prefs/settings.json")
//!     .with_folder("/work/project/backend")
//!     .with_default("editor.tabSize", json!(4))
//!     .build()?;
//!
//! // Plain value in the user scope
//! prefs.set("editor.tabSize", json!(8), Scope::User, None)?;
//!
//! // Override for one language in the workspace scope
//! prefs.set("[rust].editor.tabSize", json!(2), Scope::Workspace, None)?;
//!
//! assert_eq!(prefs.get("editor.tabSize", None), Some(json!(8)));
//! assert_eq!(prefs.get("[rust].editor.tabSize", None), Some(json!(2)));
//! assert_eq!(prefs.get("[go].editor.tabSize", None), Some(json!(8)));
//!
//! // Folder scope, selected by a resource inside the folder
//! let file = Path::new("/work/project/backend/src/main.rs");
//! prefs.set("editor.tabSize", json!(3), Scope::Folder, Some(file))?;
//! assert_eq!(prefs.get("editor.tabSize", Some(file)), Some(json!(3)));
//! # Ok::<(), prefscope::Error>(())
//! ```
//!
//! ## Resolution Order
//!
//! Scope priority is checked first; override-vs-plain only breaks ties inside
//! one scope. A plain `editor.tabSize` in the folder scope therefore beats
//! `[rust].editor.tabSize` in the user scope. Use
//! [`PreferenceService::inspect`] to see every scope's raw value at once.
//!
//! ## Failure Modes
//!
//! A failed write to the backing file is reported as [`Error::Flush`]. The
//! in-memory value is already committed at that point and change events have
//! fired, so callers can tell "the disk write failed" apart from "the request
//! was invalid" with [`Error::is_flush_error`].

// Core modules
pub mod config;
pub mod document;
pub mod editor;
mod error;
pub mod events;
pub mod key;
pub mod provider;
pub mod registry;
pub mod resolver;
mod scope;
mod service;
pub mod storage;
mod sync;

// Re-exports from core
pub use error::{Error, Result};
pub use scope::Scope;
pub use service::{PreferenceService, PreferenceServiceBuilder};

pub use config::{EmptyDocumentPolicy, PreferencesConfig, PreferencesConfigBuilder};
pub use document::{PreferenceDocument, ValueChange};
pub use editor::{EditorModels, NoEditors};
pub use events::{EventManager, PreferenceChange};
pub use key::{OverrideIdentifier, OverriddenName, PreferenceKey, combine, decode, mark_override};
pub use provider::{ApplyOutcome, PreferenceProvider};
pub use registry::ProviderRegistry;
pub use resolver::{Inspection, Resolved};
pub use storage::{FileStore, MemoryStore, ResourceStore};
