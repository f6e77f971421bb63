//! Modal dialog widgets.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::app::input::InputState;
use crate::theme::Theme;

use super::picker::input_spans;
use super::popup_area;

/// Text prompt over a pre-filled input.
pub struct InputModal<'a> {
    theme: &'a Theme,
    prompt: &'a str,
    input: &'a InputState,
}

impl<'a> InputModal<'a> {
    pub fn new(theme: &'a Theme, prompt: &'a str, input: &'a InputState) -> Self {
        Self {
            theme,
            prompt,
            input,
        }
    }
}

impl Widget for InputModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = popup_area(area, 60, 5);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(format!(" {} ", self.prompt))
            .title_style(
                Style::default()
                    .fg(self.theme.info)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.info));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut line = vec![Span::styled("› ", self.theme.prompt)];
        line.extend(input_spans(self.input, self.theme));

        let lines = vec![
            Line::from(line),
            Line::raw(""),
            Line::from(vec![
                Span::styled("Enter", self.theme.help_key),
                Span::styled(" confirm  ", self.theme.help_desc),
                Span::styled("Esc", self.theme.help_key),
                Span::styled(" cancel", self.theme.help_desc),
            ]),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}

/// A message with a row of options, one of them selected.
pub struct ChoiceModal<'a> {
    theme: &'a Theme,
    message: &'a str,
    options: &'a [String],
    selected: usize,
}

impl<'a> ChoiceModal<'a> {
    pub fn new(theme: &'a Theme, message: &'a str, options: &'a [String], selected: usize) -> Self {
        Self {
            theme,
            message,
            options,
            selected,
        }
    }
}

impl Widget for ChoiceModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = popup_area(area, 60, 7);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Confirm ")
            .title_style(
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.warning));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut options = Vec::new();
        for (i, option) in self.options.iter().enumerate() {
            let style = if i == self.selected {
                self.theme.selected
            } else {
                self.theme.help_desc
            };
            options.push(Span::styled(format!(" {option} "), style));
            options.push(Span::raw("  "));
        }

        let lines = vec![
            Line::styled(self.message, Style::default().fg(self.theme.foreground)),
            Line::raw(""),
            Line::from(options),
            Line::raw(""),
            Line::from(vec![
                Span::styled("←/→", self.theme.help_key),
                Span::styled(" choose  ", self.theme.help_desc),
                Span::styled("Enter", self.theme.help_key),
                Span::styled(" confirm  ", self.theme.help_desc),
                Span::styled("Esc", self.theme.help_key),
                Span::styled(" cancel", self.theme.help_desc),
            ]),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
