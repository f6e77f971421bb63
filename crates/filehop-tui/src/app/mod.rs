//! The terminal host: a full-screen picker driven by crossterm events.

pub mod input;
pub mod picker;
mod render;
pub mod state;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tracing::{debug, info, warn};

use filehop_core::NavError;
use filehop_ops::{FileStore, LocalFs};

use crate::event::KeyAction;
use crate::host::{Host, HostEvent, InputRequest, Notice, NoticeLevel, Placement};
use crate::opener::{self, OpenResult};
use crate::picker::{Picker, PickerEvent};
use crate::theme::Theme;

use self::input::{InputResult, InputState};
use self::picker::{PAGE_SIZE, TerminalPicker};
use self::render::{RenderContext, render_app};
use self::state::UserSettings;

/// Application result type.
pub type AppResult<T> = color_eyre::Result<T>;

/// Redraw period while the picker shows progress.
const TICK_INTERVAL_MS: u64 = 80;

/// A dialog drawn over the picker.
pub enum Modal {
    Input { prompt: String, input: InputState },
    Choice {
        message: String,
        options: Vec<String>,
        selected: usize,
    },
}

/// Host implementation on top of a ratatui terminal.
pub struct TerminalHost {
    terminal: DefaultTerminal,
    /// Dropped while an editor owns the terminal.
    events: Option<EventStream>,
    picker: TerminalPicker,
    fs: LocalFs,
    store: FileStore,
    settings: UserSettings,
    theme: Theme,
    notice: Option<Notice>,
    modal: Option<Modal>,
    show_help: bool,
    tick: usize,
    active_document: Option<PathBuf>,
    /// Opened on first use; headless sessions never need it.
    clipboard: Option<arboard::Clipboard>,
}

impl TerminalHost {
    pub fn new(
        terminal: DefaultTerminal,
        settings: UserSettings,
        store: FileStore,
        active_document: Option<PathBuf>,
    ) -> Self {
        let theme = Theme::from_variant(settings.theme);
        Self {
            terminal,
            events: Some(EventStream::new()),
            picker: TerminalPicker::new(),
            fs: LocalFs::new(),
            store,
            settings,
            theme,
            notice: None,
            modal: None,
            show_help: false,
            tick: 0,
            active_document,
            clipboard: None,
        }
    }

    fn draw(&mut self) -> std::io::Result<()> {
        let ctx = RenderContext {
            theme: &self.theme,
            picker: &self.picker,
            notice: self.notice.as_ref(),
            modal: self.modal.as_ref(),
            show_help: self.show_help,
            tick: self.tick,
        };
        self.terminal
            .draw(|frame| render_app(&ctx, frame.area(), frame.buffer_mut()))?;
        Ok(())
    }

    /// Redraw, then wait for the next key press. `None` once the terminal
    /// stops producing events.
    async fn next_key(&mut self) -> Option<KeyEvent> {
        let period = Duration::from_millis(TICK_INTERVAL_MS);
        loop {
            if let Err(err) = self.draw() {
                warn!(error = %err, "Failed to draw");
                return None;
            }

            let animate = self.picker.is_busy();
            let events = self.events.as_mut()?;
            let event = tokio::select! {
                event = events.next() => Some(event),
                _ = tokio::time::sleep(period), if animate => None,
            };
            let Some(event) = event else {
                self.tick = self.tick.wrapping_add(1);
                continue;
            };

            match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => return Some(key),
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(error = %err, "Terminal event stream failed");
                    return None;
                }
                None => return None,
            }
        }
    }

    /// Translate a key press into a host event, applying local effects.
    fn handle_key(&mut self, key: KeyEvent) -> Option<HostEvent> {
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return None;
        }

        self.notice = None;
        let action = KeyAction::from_key_event(key, self.picker.value().is_empty());
        match action {
            KeyAction::MoveUp => self.picker.move_by(-1),
            KeyAction::MoveDown => self.picker.move_by(1),
            KeyAction::PageUp => self.picker.move_by(-(PAGE_SIZE as isize)),
            KeyAction::PageDown => self.picker.move_by(PAGE_SIZE as isize),
            KeyAction::ToggleHelp => self.show_help = true,
            KeyAction::Accept => {
                if self.picker.is_enabled() {
                    return Some(HostEvent::Picker(PickerEvent::Accepted));
                }
            }
            KeyAction::Hide => {
                self.picker.hide();
                return Some(HostEvent::Picker(PickerEvent::Hidden));
            }
            KeyAction::ItemButton => {
                let index = self.picker.active()?;
                let button = *self.picker.items().get(index)?.buttons.first()?;
                return Some(HostEvent::Picker(PickerEvent::ItemButtonTriggered {
                    index,
                    button,
                }));
            }
            KeyAction::Command(command) => return Some(HostEvent::Command(command)),
            KeyAction::Edit => {
                if self.picker.input_mut().handle_key(key) == InputResult::Changed {
                    self.picker.refilter();
                    let value = self.picker.value().to_string();
                    return Some(HostEvent::Picker(PickerEvent::ValueChanged(value)));
                }
            }
        }
        None
    }

    /// Hand the terminal to `cmd` until it exits.
    fn suspend_and_run(&mut self, mut cmd: std::process::Command) -> Result<(), NavError> {
        debug!(?cmd, "Suspending terminal");
        self.events = None;
        ratatui::restore();

        let status = cmd.status();

        self.terminal = ratatui::init();
        self.events = Some(EventStream::new());

        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(NavError::other(format!("Editor exited with {status}"))),
            Err(err) => Err(NavError::other(format!("Failed to start editor: {err}"))),
        }
    }

    fn finish_open(&mut self, result: OpenResult) -> Result<(), NavError> {
        match result {
            OpenResult::Opened => Ok(()),
            OpenResult::NeedsSuspend(cmd) => self.suspend_and_run(cmd),
            OpenResult::Error(message) => Err(NavError::other(message)),
        }
    }
}

impl Host for TerminalHost {
    type Picker = TerminalPicker;
    type Fs = LocalFs;
    type Store = FileStore;

    fn picker(&mut self) -> &mut TerminalPicker {
        &mut self.picker
    }

    fn fs(&self) -> &LocalFs {
        &self.fs
    }

    fn store(&mut self) -> &mut FileStore {
        &mut self.store
    }

    fn active_document(&self) -> Option<PathBuf> {
        self.active_document.clone()
    }

    async fn next_event(&mut self) -> Option<HostEvent> {
        loop {
            let key = self.next_key().await?;
            if let Some(event) = self.handle_key(key) {
                return Some(event);
            }
        }
    }

    async fn input_box(&mut self, request: InputRequest) -> Option<String> {
        let input = InputState::with_initial(&request.value).with_selection(request.selection);
        self.modal = Some(Modal::Input {
            prompt: request.prompt,
            input,
        });

        let answer = loop {
            let Some(key) = self.next_key().await else {
                break None;
            };
            let Some(Modal::Input { input, .. }) = self.modal.as_mut() else {
                break None;
            };
            match input.handle_key(key) {
                InputResult::Submit(value) => break Some(value),
                InputResult::Cancel => break None,
                InputResult::Changed | InputResult::Continue => {}
            }
        };
        self.modal = None;
        answer
    }

    async fn choose(&mut self, message: &str, options: &[&str]) -> Option<usize> {
        if options.is_empty() {
            return None;
        }
        self.modal = Some(Modal::Choice {
            message: message.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            selected: 0,
        });

        let last = options.len() - 1;
        let answer = loop {
            let Some(key) = self.next_key().await else {
                break None;
            };
            let Some(Modal::Choice { selected, .. }) = self.modal.as_mut() else {
                break None;
            };
            match key.code {
                KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => {
                    *selected = selected.saturating_sub(1);
                }
                KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => {
                    *selected = (*selected + 1).min(last);
                }
                KeyCode::Enter => break Some(*selected),
                KeyCode::Esc => break None,
                _ => {}
            }
        };
        self.modal = None;
        answer
    }

    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!(message = %notice.message, "Notice"),
            NoticeLevel::Warning | NoticeLevel::Error => {
                warn!(message = %notice.message, "Notice")
            }
        }
        self.notice = Some(notice);
    }

    fn write_clipboard(&mut self, text: &str) -> Result<(), NavError> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()
                .map_err(|e| NavError::other(format!("Clipboard unavailable: {e}")))?,
        };
        let clipboard = self.clipboard.insert(clipboard);
        clipboard
            .set_text(text.to_string())
            .map_err(|e| NavError::other(format!("Failed to copy: {e}")))
    }

    async fn open_file(
        &mut self,
        path: &Path,
        placement: Placement,
        line: Option<u32>,
    ) -> Result<(), NavError> {
        info!(path = %path.display(), ?placement, ?line, "Opening file");
        let result = opener::open_file(path, line, &self.settings.editor);
        self.finish_open(result)?;
        self.active_document = Some(path.to_path_buf());
        Ok(())
    }

    async fn open_untitled(&mut self, path: &Path) -> Result<(), NavError> {
        self.open_file(path, Placement::Active, None).await
    }

    async fn open_folder(&mut self, path: &Path, new_window: bool) -> Result<(), NavError> {
        info!(path = %path.display(), new_window, "Opening folder");
        self.finish_open(opener::open_folder(path))
    }
}
