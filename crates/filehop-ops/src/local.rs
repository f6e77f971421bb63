//! [`FileSystem`] backed by the local disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use filehop_core::{DirMember, EntryKind, NavError};

use crate::fs::FileSystem;

/// Local filesystem. Every call runs on tokio's blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new local filesystem handle.
    pub fn new() -> Self {
        Self
    }
}

/// Run a blocking filesystem call and attach `path` to any error.
async fn blocking<T, F>(path: &Path, op: F) -> Result<T, NavError>
where
    T: Send + 'static,
    F: FnOnce(PathBuf) -> io::Result<T> + Send + 'static,
{
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || op(owned))
        .await
        .map_err(|e| NavError::other(format!("Task failed: {e}")))?
        .map_err(|e| NavError::io(path, e))
}

fn kind_of(metadata: &fs::Metadata) -> EntryKind {
    if metadata.is_dir() {
        EntryKind::Directory
    } else if metadata.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

impl FileSystem for LocalFs {
    async fn stat(&self, path: &Path) -> Result<Option<EntryKind>, NavError> {
        blocking(path, |path| match fs::metadata(&path) {
            Ok(metadata) => Ok(Some(kind_of(&metadata))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn read_directory(&self, path: &Path) -> Result<Vec<DirMember>, NavError> {
        blocking(path, |path| {
            let mut members = Vec::new();
            for entry in fs::read_dir(&path)? {
                let entry = entry?;
                let file_type = entry.file_type()?;
                let kind = if file_type.is_symlink() {
                    // Follow the link; a dangling link is neither file nor dir.
                    fs::metadata(entry.path())
                        .map(|m| kind_of(&m))
                        .unwrap_or(EntryKind::Other)
                } else if file_type.is_dir() {
                    EntryKind::Directory
                } else if file_type.is_file() {
                    EntryKind::File
                } else {
                    EntryKind::Other
                };
                members.push(DirMember::new(
                    entry.file_name().to_string_lossy().into_owned(),
                    kind,
                ));
            }
            Ok(members)
        })
        .await
    }

    async fn create_directory(&self, path: &Path) -> Result<(), NavError> {
        debug!(path = %path.display(), "Creating directory");
        blocking(path, |path| fs::create_dir_all(&path)).await
    }

    async fn delete(&self, path: &Path, recursive: bool) -> Result<(), NavError> {
        debug!(path = %path.display(), recursive, "Deleting");
        blocking(path, move |path| {
            let metadata = fs::symlink_metadata(&path)?;
            if metadata.is_dir() {
                if recursive {
                    fs::remove_dir_all(&path)
                } else {
                    fs::remove_dir(&path)
                }
            } else {
                fs::remove_file(&path)
            }
        })
        .await
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), NavError> {
        debug!(from = %from.display(), to = %to.display(), "Renaming");
        let target = to.to_path_buf();
        blocking(from, move |from| {
            if target.exists() && target != from {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("'{}' already exists", target.display()),
                ));
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(&from, &target)
        })
        .await
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, NavError> {
        blocking(path, |path| fs::read(&path)).await
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), NavError> {
        let contents = contents.to_vec();
        blocking(path, move |path| {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, contents)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_stat_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFs::new();
        assert_eq!(fs.stat(&dir.path().join("nope")).await.unwrap(), None);
        assert_eq!(fs.stat(dir.path()).await.unwrap(), Some(EntryKind::Directory));
    }

    #[tokio::test]
    async fn test_read_directory_kinds() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let mut members = LocalFs.read_directory(dir.path()).await.unwrap();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            members,
            vec![
                DirMember::new("a.txt", EntryKind::File),
                DirMember::new("sub", EntryKind::Directory),
            ]
        );
    }

    #[tokio::test]
    async fn test_rename_refuses_existing_target() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, "a").unwrap();
        std::fs::write(&b, "b").unwrap();

        let err = LocalFs.rename(&a, &b).await.unwrap_err();
        assert!(matches!(err, NavError::AlreadyExists { .. }));
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "b");
    }

    #[tokio::test]
    async fn test_rename_into_new_subdirectory() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        std::fs::write(&a, "a").unwrap();

        let target = dir.path().join("nested/b.txt");
        LocalFs.rename(&a, &target).await.unwrap();
        assert!(target.exists());
        assert!(!a.exists());
    }

    #[tokio::test]
    async fn test_delete_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("f"), "x").unwrap();

        assert!(LocalFs.delete(&sub, false).await.is_err());
        LocalFs.delete(&sub, true).await.unwrap();
        assert!(!sub.exists());
    }

    #[tokio::test]
    async fn test_write_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("x/y/z.txt");
        LocalFs.write_file(&file, b"hi").await.unwrap();
        assert_eq!(LocalFs.read_file(&file).await.unwrap(), b"hi");
    }
}
