//! Last focused child per directory.

use std::collections::HashMap;

/// Maps a directory id to the name focused when the user left it.
///
/// Lives for one navigator session and is never persisted.
#[derive(Debug, Clone, Default)]
pub struct PathHistory {
    focused: HashMap<String, String>,
}

impl PathHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, dir_id: String, name: String) {
        self.focused.insert(dir_id, name);
    }

    pub fn get(&self, dir_id: &str) -> Option<&str> {
        self.focused.get(dir_id).map(String::as_str)
    }
}
