//! Resource storage backends
//!
//! A [`ResourceStore`] turns a resource path into text and back. The
//! preference engine never touches the filesystem directly; it reads and
//! flushes documents through whichever store the service was built with.

use crate::error::{Error, Result};
use crate::sync::MutexExt;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Text read/write service keyed by resource path
pub trait ResourceStore: Send + Sync {
    /// Read the current content, `None` if the resource does not exist
    fn read(&self, path: &Path) -> Result<Option<String>>;

    /// Replace the content of a resource, creating it if needed.
    ///
    /// Implementations must replace atomically: readers never observe a
    /// half-written document.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Remove a resource. Removing a missing resource is not an error.
    fn delete(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool {
        matches!(self.read(path), Ok(Some(_)))
    }
}

// =============================================================================
// Filesystem Store
// =============================================================================

/// Filesystem store (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl FileStore {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceStore for FileStore {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::FileRead {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Uses atomic write: writes to temp file then renames to prevent corruption.
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        // Append .tmp to preserve the original filename fully
        let file_name = path.file_name().ok_or_else(|| Error::FileWrite {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = path.with_file_name(temp_filename);

        std::fs::write(&temp_path, content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn delete(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::FileDelete {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

#[derive(Default)]
struct MemoryState {
    files: HashMap<PathBuf, String>,
    read_only: bool,
    writes: usize,
}

/// In-memory store for tests and embedders without a filesystem.
///
/// Can be switched read-only to simulate a locked resource.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a resource with content
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.state
            .lock_recovered()
            .files
            .insert(path.into(), content.into());
        self
    }

    /// Make every subsequent write or delete fail
    pub fn set_read_only(&self, read_only: bool) {
        self.state.lock_recovered().read_only = read_only;
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.state.lock_recovered().writes
    }

    fn locked(path: &Path) -> std::io::Error {
        std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("{} is locked", path.display()),
        )
    }
}

impl ResourceStore for MemoryStore {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.state.lock_recovered().files.get(path).cloned())
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let mut state = self.state.lock_recovered();
        if state.read_only {
            return Err(Error::FileWrite {
                path: path.to_path_buf(),
                source: Self::locked(path),
            });
        }
        state.files.insert(path.to_path_buf(), content.to_string());
        state.writes += 1;
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        let mut state = self.state.lock_recovered();
        if state.read_only {
            return Err(Error::FileDelete {
                path: path.to_path_buf(),
                source: Self::locked(path),
            });
        }
        state.files.remove(path);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
