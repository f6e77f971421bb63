//! UI components and widgets.

mod help;
pub mod modals;
mod picker;

pub use help::HelpOverlay;
pub use picker::PickerView;

use ratatui::layout::{Constraint, Layout, Rect};

/// Layout areas for the application.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    /// Compute layout from terminal area.
    pub fn new(area: Rect) -> Self {
        let [main, footer] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        Self { main, footer }
    }
}

/// A popup of at most `width` x `height` centered in `area`, keeping a margin.
pub fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.width.saturating_sub(width) / 2 + area.x;
    let y = area.height.saturating_sub(height) / 2 + area.y;
    Rect::new(x, y, width, height)
}
