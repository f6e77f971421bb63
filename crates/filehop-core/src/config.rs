//! Navigator configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Read-only options that shape directory listings and search.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct NavigatorConfig {
    /// Hide entries whose name starts with a dot.
    #[builder(default = "false")]
    pub hide_dotfiles: bool,

    /// Evaluate ignore files and treat matching entries as ignored.
    #[builder(default = "true")]
    pub hide_ignored_files: bool,

    /// Drop ignored entries instead of de-emphasizing them.
    #[builder(default = "false")]
    pub remove_ignored_files: bool,

    /// Append an "ignored" label to de-emphasized entries.
    #[builder(default = "false")]
    pub label_ignored_files: bool,

    /// Ignore-file names read in each directory and its ancestors.
    #[builder(default = "default_ignore_files()")]
    pub ignore_file_types: Vec<String>,

    /// Names that bypass every hide rule.
    #[builder(default)]
    pub always_show: Vec<String>,

    /// External search tool (ripgrep compatible).
    #[builder(default = "default_search_tool()")]
    pub search_tool: String,
}

fn default_ignore_files() -> Vec<String> {
    vec![".gitignore".to_string()]
}

fn default_search_tool() -> String {
    "rg".to_string()
}

impl NavigatorConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref tool) = self.search_tool {
            if tool.trim().is_empty() {
                return Err("Search tool cannot be empty".to_string());
            }
        }
        if let Some(ref files) = self.ignore_file_types {
            if files.iter().any(|f| f.contains('/') || f.is_empty()) {
                return Err("Ignore file names must be plain file names".to_string());
            }
        }
        Ok(())
    }
}

impl NavigatorConfig {
    /// Create a new config builder.
    pub fn builder() -> NavigatorConfigBuilder {
        NavigatorConfigBuilder::default()
    }

    /// Check if a name bypasses hide rules.
    pub fn is_always_shown(&self, name: &str) -> bool {
        self.always_show.iter().any(|n| n == name)
    }

    /// Check if hidden files should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        self.hide_dotfiles && name.starts_with('.') && !self.is_always_shown(name)
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            hide_dotfiles: false,
            hide_ignored_files: true,
            remove_ignored_files: false,
            label_ignored_files: false,
            ignore_file_types: default_ignore_files(),
            always_show: Vec::new(),
            search_tool: default_search_tool(),
        }
    }
}
