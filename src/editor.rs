//! Editor buffer collaborator
//!
//! A preferences file may be open in an editor with unsaved changes. Before a
//! provider overwrites such a file it reverts the buffer, so the editor shows
//! what was persisted instead of silently diverging from it.

use crate::error::Result;
use std::path::Path;

/// Reports and reverts unsaved editor buffers for resources
pub trait EditorModels: Send + Sync {
    /// Whether an open buffer for `path` has unsaved changes
    fn is_dirty(&self, path: &Path) -> bool;

    /// Discard the unsaved changes of the buffer for `path`
    fn revert(&self, path: &Path) -> Result<()>;
}

/// No editor attached: nothing is ever dirty
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEditors;

impl EditorModels for NoEditors {
    fn is_dirty(&self, _path: &Path) -> bool {
        false
    }

    fn revert(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
