//! Rendering of the terminal picker.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::app::input::InputState;
use crate::app::picker::TerminalPicker;
use crate::picker::{ItemIcon, Picker, PickerItem};
use crate::theme::Theme;

/// Frames of the busy indicator.
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// The picker: title border, input line, item list.
pub struct PickerView<'a> {
    picker: &'a TerminalPicker,
    theme: &'a Theme,
    tick: usize,
}

impl<'a> PickerView<'a> {
    pub fn new(picker: &'a TerminalPicker, theme: &'a Theme, tick: usize) -> Self {
        Self {
            picker,
            theme,
            tick,
        }
    }
}

fn icon_glyph(icon: ItemIcon) -> &'static str {
    match icon {
        ItemIcon::Folder => "📁",
        ItemIcon::File => "📄",
        ItemIcon::Other => "❔",
        ItemIcon::Action => "⚡",
        ItemIcon::Pin => "📌",
        ItemIcon::New => "✨",
        ItemIcon::History => "🕘",
        ItemIcon::Match => "🔎",
    }
}

/// Spans for a single-line input with selection and cursor.
pub fn input_spans<'a>(input: &'a InputState, theme: &Theme) -> Vec<Span<'a>> {
    let buffer = input.buffer();
    let cursor = input.cursor();
    let mut spans = Vec::new();

    match input.selection() {
        Some(range) => {
            spans.push(Span::styled(&buffer[..range.start], theme.input));
            spans.push(Span::styled(&buffer[range.clone()], theme.selection));
            spans.push(Span::styled(&buffer[range.end..], theme.input));
            spans.push(Span::styled(" ", theme.cursor));
        }
        None => {
            spans.push(Span::styled(&buffer[..cursor], theme.input));
            let rest = &buffer[cursor..];
            match rest.chars().next() {
                Some(c) => {
                    let width = c.len_utf8();
                    spans.push(Span::styled(&rest[..width], theme.cursor));
                    spans.push(Span::styled(&rest[width..], theme.input));
                }
                None => spans.push(Span::styled(" ", theme.cursor)),
            }
        }
    }
    spans
}

impl PickerView<'_> {
    fn item_line<'b>(&self, item: &'b PickerItem, selected: bool, width: usize) -> Line<'b> {
        let theme = self.theme;
        let label_style = if item.dimmed {
            theme.dimmed
        } else {
            theme.item_style(item.icon)
        };

        let mut spans = vec![
            Span::raw(if selected { "▶ " } else { "  " }),
            Span::raw(icon_glyph(item.icon)),
            Span::raw(" "),
            Span::styled(item.label.as_str(), label_style),
        ];
        if let Some(description) = &item.description {
            spans.push(Span::styled(format!("  {description}"), theme.description));
        }
        if let Some(detail) = &item.detail {
            let used: usize = spans.iter().map(|s| s.content.width()).sum();
            if used + detail.width() + 4 < width {
                spans.push(Span::styled(format!("  {detail}"), theme.help_desc));
            }
        }
        for button in &item.buttons {
            spans.push(Span::styled(format!("  [{button}]"), theme.help_key));
        }

        let line = Line::from(spans);
        if selected {
            line.style(theme.selected)
        } else {
            line
        }
    }
}

impl Widget for PickerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let picker = self.picker;

        let mut title = vec![Span::styled(format!(" {} ", picker.title()), theme.title)];
        if picker.is_busy() {
            title.push(Span::styled(
                format!("{} ", SPINNER[self.tick % SPINNER.len()]),
                Style::new().fg(theme.info),
            ));
        }
        let mut block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(theme.border);
        if !picker.buttons().is_empty() {
            let labels: Vec<String> = picker.buttons().iter().map(|b| format!("[{b}]")).collect();
            block = block.title_bottom(Line::styled(format!(" {} ", labels.join(" ")), theme.help_key));
        }

        let inner = block.inner(area);
        block.render(area, buf);

        let [input_area, separator, list_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(inner);

        let mut input_line = vec![Span::styled("› ", theme.prompt)];
        if picker.value().is_empty() {
            input_line.push(Span::styled(" ", theme.cursor));
            input_line.push(Span::styled(picker.placeholder(), theme.placeholder));
        } else {
            input_line.extend(input_spans(picker.input(), theme));
        }
        Paragraph::new(Line::from(input_line)).render(input_area, buf);

        let rule = "─".repeat(separator.width as usize);
        Paragraph::new(Line::styled(rule, theme.border)).render(separator, buf);

        let height = list_area.height as usize;
        let rows = picker.rows();
        if rows.is_empty() {
            let message = if picker.is_busy() { "Searching…" } else { "No items" };
            Paragraph::new(Line::styled(message, theme.help_desc)).render(list_area, buf);
            return;
        }

        let active_row = picker.active_row();
        let offset = match active_row {
            Some(row) if row >= height => row + 1 - height,
            _ => 0,
        };
        let items = picker.items();
        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(row, &index)| {
                self.item_line(&items[index], Some(row) == active_row, list_area.width as usize)
            })
            .collect();
        Paragraph::new(lines).render(list_area, buf);
    }
}
