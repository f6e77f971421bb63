//! Color theme for the picker.
//!
//! Dark and light variants over a Tailwind CSS slate palette.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

use crate::host::NoticeLevel;
use crate::picker::ItemIcon;

/// Theme variant (dark or light).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub variant: ThemeVariant,

    // Base colors
    pub foreground: Color,
    pub muted: Color,

    // Interactive elements
    pub selected: Style,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // UI elements
    pub border: Style,
    pub title: Style,
    pub help_key: Style,
    pub help_desc: Style,
    pub footer: Style,

    // Item kinds
    pub directory: Style,
    pub file: Style,
    pub action: Style,
    pub pinned: Style,
    pub synthetic: Style,
    /// De-emphasized entries (ignored files).
    pub dimmed: Style,
    pub description: Style,

    // Input line
    pub prompt: Style,
    pub input: Style,
    pub placeholder: Style,
    pub cursor: Style,
    pub selection: Style,
}

impl Theme {
    /// Dark theme using a slate-based palette.
    pub fn dark() -> Self {
        let slate_50 = Color::Rgb(248, 250, 252);
        let slate_100 = Color::Rgb(241, 245, 249);
        let slate_300 = Color::Rgb(203, 213, 225);
        let slate_400 = Color::Rgb(148, 163, 184);
        let slate_500 = Color::Rgb(100, 116, 139);
        let slate_600 = Color::Rgb(71, 85, 105);
        let slate_700 = Color::Rgb(51, 65, 85);
        let slate_800 = Color::Rgb(30, 41, 59);

        let blue_400 = Color::Rgb(96, 165, 250);
        let blue_500 = Color::Rgb(59, 130, 246);
        let green_500 = Color::Rgb(34, 197, 94);
        let yellow_500 = Color::Rgb(234, 179, 8);
        let red_500 = Color::Rgb(239, 68, 68);
        let cyan_400 = Color::Rgb(34, 211, 238);
        let amber_500 = Color::Rgb(245, 158, 11);

        Self {
            variant: ThemeVariant::Dark,
            foreground: slate_100,
            muted: slate_500,

            selected: Style::new().bg(slate_700).fg(slate_50).add_modifier(Modifier::BOLD),

            success: green_500,
            warning: yellow_500,
            error: red_500,
            info: blue_400,

            border: Style::new().fg(slate_600),
            title: Style::new().fg(blue_400).add_modifier(Modifier::BOLD),
            help_key: Style::new().fg(blue_400).add_modifier(Modifier::BOLD),
            help_desc: Style::new().fg(slate_400),
            footer: Style::new().bg(slate_800).fg(slate_400),

            directory: Style::new().fg(blue_500).add_modifier(Modifier::BOLD),
            file: Style::new().fg(slate_300),
            action: Style::new().fg(cyan_400),
            pinned: Style::new().fg(amber_500),
            synthetic: Style::new().fg(green_500).add_modifier(Modifier::ITALIC),
            dimmed: Style::new().fg(slate_600),
            description: Style::new().fg(slate_500),

            prompt: Style::new().fg(blue_400).add_modifier(Modifier::BOLD),
            input: Style::new().fg(slate_100),
            placeholder: Style::new().fg(slate_600).add_modifier(Modifier::ITALIC),
            cursor: Style::new().add_modifier(Modifier::REVERSED),
            selection: Style::new().bg(slate_600).fg(slate_50),
        }
    }

    /// Light theme using a slate-based palette.
    pub fn light() -> Self {
        let slate_100 = Color::Rgb(241, 245, 249);
        let slate_200 = Color::Rgb(226, 232, 240);
        let slate_300 = Color::Rgb(203, 213, 225);
        let slate_400 = Color::Rgb(148, 163, 184);
        let slate_500 = Color::Rgb(100, 116, 139);
        let slate_600 = Color::Rgb(71, 85, 105);
        let slate_700 = Color::Rgb(51, 65, 85);
        let slate_900 = Color::Rgb(15, 23, 42);

        let blue_600 = Color::Rgb(37, 99, 235);
        let blue_700 = Color::Rgb(29, 78, 216);
        let green_600 = Color::Rgb(22, 163, 74);
        let yellow_600 = Color::Rgb(202, 138, 4);
        let red_600 = Color::Rgb(220, 38, 38);
        let cyan_600 = Color::Rgb(8, 145, 178);
        let amber_600 = Color::Rgb(217, 119, 6);

        Self {
            variant: ThemeVariant::Light,
            foreground: slate_900,
            muted: slate_500,

            selected: Style::new().bg(slate_200).fg(slate_900).add_modifier(Modifier::BOLD),

            success: green_600,
            warning: yellow_600,
            error: red_600,
            info: blue_600,

            border: Style::new().fg(slate_400),
            title: Style::new().fg(blue_700).add_modifier(Modifier::BOLD),
            help_key: Style::new().fg(blue_700).add_modifier(Modifier::BOLD),
            help_desc: Style::new().fg(slate_600),
            footer: Style::new().bg(slate_100).fg(slate_600),

            directory: Style::new().fg(blue_700).add_modifier(Modifier::BOLD),
            file: Style::new().fg(slate_700),
            action: Style::new().fg(cyan_600),
            pinned: Style::new().fg(amber_600),
            synthetic: Style::new().fg(green_600).add_modifier(Modifier::ITALIC),
            dimmed: Style::new().fg(slate_400),
            description: Style::new().fg(slate_500),

            prompt: Style::new().fg(blue_700).add_modifier(Modifier::BOLD),
            input: Style::new().fg(slate_900),
            placeholder: Style::new().fg(slate_400).add_modifier(Modifier::ITALIC),
            cursor: Style::new().add_modifier(Modifier::REVERSED),
            selection: Style::new().bg(slate_300).fg(slate_900),
        }
    }

    pub fn from_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self::dark(),
            ThemeVariant::Light => Self::light(),
        }
    }

    /// Style for an item label by icon.
    pub fn item_style(&self, icon: ItemIcon) -> Style {
        match icon {
            ItemIcon::Folder => self.directory,
            ItemIcon::File | ItemIcon::Other | ItemIcon::Match => self.file,
            ItemIcon::Action | ItemIcon::History => self.action,
            ItemIcon::Pin => self.pinned,
            ItemIcon::New => self.synthetic,
        }
    }

    pub fn notice_color(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Info => self.info,
            NoticeLevel::Warning => self.warning,
            NoticeLevel::Error => self.error,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
