//! Picker entries: directory members, menu actions and synthetic candidates.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::pins::PinnedItem;

/// Kind of a filesystem object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// A raw member of a directory listing, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirMember {
    /// File name (no separators).
    pub name: String,
    /// What the name points at. Symlinks report their target's kind.
    pub kind: EntryKind,
}

impl DirMember {
    /// Create a new directory member.
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Operations offered by the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Action {
    #[strum(to_string = "Create this folder")]
    NewFolder,
    #[strum(to_string = "Create new file")]
    NewFile,
    #[strum(to_string = "Open")]
    OpenFile,
    #[strum(to_string = "Open to the side")]
    OpenFileBeside,
    #[strum(to_string = "Rename")]
    RenameFile,
    #[strum(to_string = "Delete")]
    DeleteFile,
    #[strum(to_string = "Open folder")]
    OpenFolder,
    #[strum(to_string = "Open folder in new window")]
    OpenFolderInNewWindow,
    #[strum(to_string = "Pin")]
    Pin,
    #[strum(to_string = "Open pinned item")]
    OpenPin,
    #[strum(to_string = "Find files by name")]
    FindFiles,
    #[strum(to_string = "Find in file contents")]
    FindFilesContent,
    #[strum(to_string = "Copy path")]
    CopyPath,
}

impl Action {
    /// Fixed action menu for a file target.
    pub fn file_menu() -> &'static [Action] {
        &[
            Self::OpenFile,
            Self::OpenFileBeside,
            Self::RenameFile,
            Self::DeleteFile,
            Self::FindFiles,
            Self::FindFilesContent,
            Self::Pin,
            Self::CopyPath,
        ]
    }

    /// Fixed action menu for a directory target.
    pub fn directory_menu() -> &'static [Action] {
        &[
            Self::OpenFolder,
            Self::OpenFolderInNewWindow,
            Self::RenameFile,
            Self::DeleteFile,
            Self::FindFiles,
            Self::FindFilesContent,
            Self::Pin,
            Self::CopyPath,
        ]
    }
}

/// A real directory member after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Bypasses dotfile and ignore rules.
    pub always_show: bool,
    /// Matched an ignore rule but was kept for de-emphasized display.
    pub ignored: bool,
}

/// One row of the navigator's item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A member of the current directory.
    RealFile(FileEntry),
    /// An action in the action menu, optionally carrying a pinned item.
    MenuAction {
        action: Action,
        pinned: Option<PinnedItem>,
    },
    /// A candidate made up from the input, such as "create `name`".
    Synthetic { name: String, action: Action },
}

impl Entry {
    /// Create a real file entry with default classification.
    pub fn file(name: impl Into<String>, kind: EntryKind) -> Self {
        Self::RealFile(FileEntry {
            name: name.into(),
            kind,
            always_show: false,
            ignored: false,
        })
    }

    /// Create a menu action without a pinned reference.
    pub fn action(action: Action) -> Self {
        Self::MenuAction {
            action,
            pinned: None,
        }
    }

    /// The text shown for this entry.
    pub fn name(&self) -> String {
        match self {
            Self::RealFile(file) => file.name.clone(),
            Self::MenuAction {
                pinned: Some(pin), ..
            } => pin.path.clone(),
            Self::MenuAction { action, .. } => action.to_string(),
            Self::Synthetic { name, .. } => name.clone(),
        }
    }

    /// The real file behind this entry, if any.
    pub fn as_file(&self) -> Option<&FileEntry> {
        match self {
            Self::RealFile(file) => Some(file),
            _ => None,
        }
    }

    /// Check if this entry is a real directory.
    pub fn is_dir(&self) -> bool {
        self.as_file().is_some_and(|f| f.kind.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_names() {
        assert_eq!(Entry::file("a.txt", EntryKind::File).name(), "a.txt");
        assert_eq!(Entry::action(Action::CopyPath).name(), "Copy path");
        let pinned = Entry::MenuAction {
            action: Action::OpenPin,
            pinned: Some(PinnedItem::new("/a/b", EntryKind::Directory)),
        };
        assert_eq!(pinned.name(), "/a/b");
    }

    #[test]
    fn test_menus_differ_by_kind() {
        assert!(Action::file_menu().contains(&Action::OpenFileBeside));
        assert!(!Action::directory_menu().contains(&Action::OpenFileBeside));
        assert!(Action::directory_menu().contains(&Action::OpenFolderInNewWindow));
    }
}
