//! Configuration scopes

use serde::{Deserialize, Serialize};
use std::fmt;

/// A priority tier of configuration.
///
/// Variants are declared in ascending priority, so the derived `Ord` gives
/// `Default < User < Workspace < Folder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Built-in defaults, memory only
    Default,
    /// Per-user settings file
    User,
    /// Workspace settings file
    Workspace,
    /// Per-folder settings file (one per workspace folder)
    Folder,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Default => "default",
            Scope::User => "user",
            Scope::Workspace => "workspace",
            Scope::Folder => "folder",
        }
    }

    /// Whether `set` may target this scope
    pub fn is_writable(&self) -> bool {
        !matches!(self, Scope::Default)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
