//! The picker capability: a single-line input over a selectable item list.
//!
//! Navigator and search sessions drive a [`Picker`] through this trait only,
//! so the terminal widget and the recording test double are
//! interchangeable. Programmatic calls never produce [`PickerEvent`]s; only
//! user interaction does.

use strum::Display;

/// Leading glyph of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ItemIcon {
    Folder,
    File,
    Other,
    Action,
    Pin,
    New,
    History,
    Match,
}

/// Per-item button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ItemButton {
    /// Remove a pinned item.
    #[strum(to_string = "Unpin")]
    Unpin,
}

/// Picker-level button shown next to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PickerButton {
    /// Switch between name and content search.
    #[strum(to_string = "Mode")]
    SearchMode,
    /// Switch between the invocation directory and workspace roots.
    #[strum(to_string = "Scope")]
    SearchScope,
}

/// One row of the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub label: String,
    /// Short text after the label.
    pub description: Option<String>,
    /// Secondary line, such as a full path.
    pub detail: Option<String>,
    pub icon: ItemIcon,
    /// Rendered de-emphasized (ignored entries).
    pub dimmed: bool,
    /// Never filtered out by the typed value.
    pub always_show: bool,
    pub buttons: Vec<ItemButton>,
}

impl PickerItem {
    pub fn new(label: impl Into<String>, icon: ItemIcon) -> Self {
        Self {
            label: label.into(),
            description: None,
            detail: None,
            icon,
            dimmed: false,
            always_show: false,
            buttons: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    pub fn always_show(mut self, always_show: bool) -> Self {
        self.always_show = always_show;
        self
    }

    pub fn button(mut self, button: ItemButton) -> Self {
        self.buttons.push(button);
        self
    }
}

/// User interaction reported by a picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// The user edited the input.
    ValueChanged(String),
    /// The user accepted the active item (or the bare input).
    Accepted,
    ButtonTriggered(PickerButton),
    ItemButtonTriggered { index: usize, button: ItemButton },
    /// The user dismissed the picker.
    Hidden,
}

/// A host-provided picker widget.
///
/// Item indices always refer to the list passed to
/// [`set_items`](Self::set_items), regardless of any filtering the widget
/// applies for display.
pub trait Picker {
    fn set_title(&mut self, title: &str);
    fn set_placeholder(&mut self, placeholder: &str);
    fn set_items(&mut self, items: Vec<PickerItem>);
    fn items(&self) -> &[PickerItem];
    fn set_value(&mut self, value: &str);
    fn value(&self) -> &str;
    /// Focus an item, or clear the focus.
    fn set_active(&mut self, index: Option<usize>);
    fn active(&self) -> Option<usize>;
    fn set_buttons(&mut self, buttons: Vec<PickerButton>);
    /// Show a progress indicator.
    fn set_busy(&mut self, busy: bool);
    /// Allow or refuse accepting items.
    fn set_enabled(&mut self, enabled: bool);
    fn show(&mut self);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
}
