//! The terminal picker: an input line over a fuzzy-filtered item list.

use nucleo::{Config, Matcher, Utf32Str};

use crate::picker::{Picker, PickerButton, PickerItem};

use super::input::InputState;

/// Rows moved by page up/down.
pub const PAGE_SIZE: usize = 10;

/// Picker state drawn by the terminal host.
pub struct TerminalPicker {
    title: String,
    placeholder: String,
    items: Vec<PickerItem>,
    input: InputState,
    active: Option<usize>,
    buttons: Vec<PickerButton>,
    busy: bool,
    enabled: bool,
    visible: bool,
    /// Indices into `items` that pass the filter, in display order.
    rows: Vec<usize>,
    matcher: Matcher,
}

impl Default for TerminalPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPicker {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            placeholder: String::new(),
            items: Vec::new(),
            input: InputState::new(),
            active: None,
            buttons: Vec::new(),
            busy: false,
            enabled: true,
            visible: false,
            rows: Vec::new(),
            matcher: Matcher::new(Config::DEFAULT),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn buttons(&self) -> &[PickerButton] {
        &self.buttons
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Item indices that pass the current filter.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Recompute the visible rows after the input or items changed.
    ///
    /// `always_show` items bypass the filter; everything else must fuzzy
    /// match the input. Item order is preserved.
    pub fn refilter(&mut self) {
        let needle = self.input.buffer().to_lowercase();
        if needle.is_empty() {
            self.rows = (0..self.items.len()).collect();
        } else {
            let mut needle_buf = Vec::new();
            let mut haystack_buf = Vec::new();
            let needle = Utf32Str::new(&needle, &mut needle_buf);
            let matcher = &mut self.matcher;
            self.rows = self
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| {
                    item.always_show
                        || matcher
                            .fuzzy_match(Utf32Str::new(&item.label, &mut haystack_buf), needle)
                            .is_some()
                })
                .map(|(i, _)| i)
                .collect();
        }

        if let Some(active) = self.active {
            if !self.rows.contains(&active) {
                self.active = self.rows.first().copied();
            }
        }
    }

    /// Move the focus by `delta` visible rows, clamping at both ends.
    pub fn move_by(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.active = None;
            return;
        }
        let last = self.rows.len() - 1;
        let position = match self.active.and_then(|a| self.rows.iter().position(|&r| r == a)) {
            Some(pos) => pos.saturating_add_signed(delta).min(last),
            None if delta < 0 => last,
            None => 0,
        };
        self.active = Some(self.rows[position]);
    }

    /// Position of the focused item among the visible rows.
    pub fn active_row(&self) -> Option<usize> {
        self.active
            .and_then(|active| self.rows.iter().position(|&r| r == active))
    }
}

impl Picker for TerminalPicker {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    fn set_items(&mut self, items: Vec<PickerItem>) {
        self.items = items;
        self.active = None;
        self.refilter();
    }

    fn items(&self) -> &[PickerItem] {
        &self.items
    }

    fn set_value(&mut self, value: &str) {
        self.input.set(value);
        self.refilter();
    }

    fn value(&self) -> &str {
        self.input.buffer()
    }

    fn set_active(&mut self, index: Option<usize>) {
        self.active = index.filter(|&i| i < self.items.len());
    }

    fn active(&self) -> Option<usize> {
        self.active
    }

    fn set_buttons(&mut self, buttons: Vec<PickerButton>) {
        self.buttons = buttons;
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
