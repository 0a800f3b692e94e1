//! Session configuration
//!
//! - `PreferencesConfig` - where each scope's settings file lives and how it is written
//! - `PreferencesConfigBuilder` - fluent construction with `~` expansion and defaults

mod types;

pub use types::{DocumentMigrator, EmptyDocumentPolicy, PreferencesConfig, PreferencesConfigBuilder};
