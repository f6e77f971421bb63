//! Core types for filehop.
//!
//! This crate provides the data model shared by the navigator and the
//! search orchestrator: symbolic navigation paths, picker entries, the entry
//! filter, configuration, pinned items and the error taxonomy.

mod config;
mod entry;
mod error;
mod filter;
mod path;
mod pins;

pub use config::{NavigatorConfig, NavigatorConfigBuilder};
pub use entry::{Action, DirMember, Entry, EntryKind, FileEntry};
pub use error::NavError;
pub use filter::{EntryFilter, sort_entries};
pub use path::{NavPath, PathContext, RootKind};
pub use pins::{PINNED_KEY, PinList, PinnedItem};
