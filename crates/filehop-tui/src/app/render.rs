//! Application rendering.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::host::Notice;
use crate::picker::Picker;
use crate::theme::Theme;
use crate::ui::modals::{ChoiceModal, InputModal};
use crate::ui::{AppLayout, HelpOverlay, PickerView};

use super::Modal;
use super::picker::TerminalPicker;

/// Everything a frame needs.
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    pub picker: &'a TerminalPicker,
    pub notice: Option<&'a Notice>,
    pub modal: Option<&'a Modal>,
    pub show_help: bool,
    pub tick: usize,
}

/// Main render function for the application.
pub fn render_app(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    buf.set_style(area, Style::default().fg(ctx.theme.foreground));

    let layout = AppLayout::new(area);

    if ctx.picker.is_visible() {
        PickerView::new(ctx.picker, ctx.theme, ctx.tick).render(layout.main, buf);
    }

    match ctx.modal {
        Some(Modal::Input { prompt, input }) => {
            InputModal::new(ctx.theme, prompt, input).render(layout.main, buf);
        }
        Some(Modal::Choice {
            message,
            options,
            selected,
        }) => {
            ChoiceModal::new(ctx.theme, message, options, *selected).render(layout.main, buf);
        }
        None => {}
    }

    if ctx.show_help {
        HelpOverlay::new(ctx.theme).render(layout.main, buf);
    }

    render_footer(ctx, layout.footer, buf);
}

fn render_footer(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    let line = match ctx.notice {
        Some(notice) => Line::styled(
            format!(" {}", notice.message),
            Style::default().fg(ctx.theme.notice_color(notice.level)),
        ),
        None => Line::from(vec![
            Span::styled(" F1", ctx.theme.help_key),
            Span::styled(" help  ", ctx.theme.help_desc),
            Span::styled("Ctrl-o", ctx.theme.help_key),
            Span::styled(" actions  ", ctx.theme.help_desc),
            Span::styled("Esc", ctx.theme.help_key),
            Span::styled(" close", ctx.theme.help_desc),
        ]),
    };
    Paragraph::new(line).style(ctx.theme.footer).render(area, buf);
}
