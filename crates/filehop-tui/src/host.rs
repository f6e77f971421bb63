//! Capabilities the navigator needs from its environment.

use std::ops::Range;
use std::path::{Path, PathBuf};

use filehop_core::NavError;
use filehop_ops::{FileSystem, KeyValueStore};

use crate::controller::Command;
use crate::picker::{Picker, PickerEvent};

/// Where an opened file goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Active,
    Beside,
}

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A text prompt with a pre-filled value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRequest {
    pub prompt: String,
    pub value: String,
    /// Byte range of `value` selected initially.
    pub selection: Range<usize>,
}

/// Something that happened in the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Picker(PickerEvent),
    Command(Command),
}

/// The environment hosting navigator and search sessions.
///
/// All methods are called from the single task that owns the sessions;
/// the async ones are suspension points during which no other event is
/// handled.
#[allow(async_fn_in_trait)]
pub trait Host {
    type Picker: Picker;
    type Fs: FileSystem;
    type Store: KeyValueStore;

    fn picker(&mut self) -> &mut Self::Picker;
    fn fs(&self) -> &Self::Fs;
    fn store(&mut self) -> &mut Self::Store;

    /// The file the user is currently working on, if any.
    fn active_document(&self) -> Option<PathBuf>;

    /// Next user interaction. `None` when the host is shutting down.
    async fn next_event(&mut self) -> Option<HostEvent>;

    /// Ask for a line of text. `None` when cancelled.
    async fn input_box(&mut self, request: InputRequest) -> Option<String>;

    /// Ask the user to pick one of `options`. `None` when cancelled.
    async fn choose(&mut self, message: &str, options: &[&str]) -> Option<usize>;

    fn notify(&mut self, notice: Notice);

    fn write_clipboard(&mut self, text: &str) -> Result<(), NavError>;

    /// Open a file, placing the cursor on the 0-based `line` if given.
    async fn open_file(
        &mut self,
        path: &Path,
        placement: Placement,
        line: Option<u32>,
    ) -> Result<(), NavError>;

    /// Open a new buffer that saves to `path`, which may not exist yet.
    async fn open_untitled(&mut self, path: &Path) -> Result<(), NavError>;

    async fn open_folder(&mut self, path: &Path, new_window: bool) -> Result<(), NavError>;
}
