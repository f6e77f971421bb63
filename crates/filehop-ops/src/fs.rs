//! The filesystem capability consumed by the navigator.

use std::path::Path;

use filehop_core::{DirMember, EntryKind, NavError};

/// Asynchronous filesystem primitives.
///
/// Missing paths are not errors for [`stat`](Self::stat): it returns
/// `Ok(None)` so callers can offer to create them.
#[allow(async_fn_in_trait)]
pub trait FileSystem {
    /// Kind of the object at `path`, or `None` if nothing exists there.
    async fn stat(&self, path: &Path) -> Result<Option<EntryKind>, NavError>;

    /// Members of the directory at `path`, unsorted.
    async fn read_directory(&self, path: &Path) -> Result<Vec<DirMember>, NavError>;

    /// Create a directory and any missing parents.
    async fn create_directory(&self, path: &Path) -> Result<(), NavError>;

    /// Delete a file, or a directory (with its contents when `recursive`).
    async fn delete(&self, path: &Path, recursive: bool) -> Result<(), NavError>;

    /// Move `from` to `to`. Fails if `to` already exists.
    async fn rename(&self, from: &Path, to: &Path) -> Result<(), NavError>;

    /// Read the whole file at `path`.
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, NavError>;

    /// Write `contents` to `path`, creating parent directories.
    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), NavError>;

    /// Check if `path` is an existing directory.
    async fn is_dir(&self, path: &Path) -> bool {
        matches!(self.stat(path).await, Ok(Some(EntryKind::Directory)))
    }
}
