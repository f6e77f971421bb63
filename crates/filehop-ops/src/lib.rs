//! Filesystem and storage collaborators for filehop.
//!
//! The navigator never touches `std::fs` directly. It talks to a
//! [`FileSystem`] whose [`LocalFs`] implementation runs every call on the
//! blocking thread pool, and persists pinned items through a
//! [`KeyValueStore`].

mod fs;
mod local;
mod store;
mod validate;

pub use fs::FileSystem;
pub use local::LocalFs;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use validate::{validate_filename, validate_relative_name};
