//! Persistent user settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use filehop_core::NavigatorConfig;

use crate::theme::ThemeVariant;

/// Persistent user settings stored in the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub theme: ThemeVariant,
    /// Listing and search options.
    pub navigator: NavigatorConfig,
    /// Editor configuration for opensesame.
    pub editor: opensesame::EditorConfig,
}

impl UserSettings {
    /// Get the config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("filehop").join("settings.toml"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from `path`. Missing or unparsable files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| match toml::from_str(&content) {
                Ok(settings) => Some(settings),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "Ignoring malformed settings");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Save settings to disk.
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "No config directory")
        })?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut settings = UserSettings::default();
        settings.navigator.hide_dotfiles = true;
        settings.navigator.always_show = vec![".env".to_string()];
        settings.theme = ThemeVariant::Light;
        settings.save_to(&path).unwrap();

        let loaded = UserSettings::load_from(&path);
        assert!(loaded.navigator.hide_dotfiles);
        assert_eq!(loaded.navigator.always_show, vec![".env".to_string()]);
        assert_eq!(loaded.theme, ThemeVariant::Light);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[navigator]\nhide_dotfiles = true\n").unwrap();

        let loaded = UserSettings::load_from(&path);
        assert!(loaded.navigator.hide_dotfiles);
        assert_eq!(loaded.navigator.search_tool, "rg");
        assert_eq!(loaded.navigator.ignore_file_types, vec![".gitignore".to_string()]);
    }

    #[test]
    fn test_garbage_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert!(!UserSettings::load_from(&path).navigator.hide_dotfiles);
    }
}
