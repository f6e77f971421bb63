//! Keystroke-driven file navigation for the terminal.
//!
//! This crate hosts the navigator state machine and the search view behind
//! a small set of capabilities ([`Host`] and [`Picker`]), and provides a
//! full-screen ratatui implementation of those capabilities.
//!
//! # Overview
//!
//! - **Navigator** - Walk directories by typing; `~/`, `@/` and `/` jump to
//!   roots, unknown names become "new file" candidates, `Ctrl-o` opens the
//!   action menu for the current item
//! - **Search** - Names or contents through an external ripgrep-compatible
//!   tool, debounced as you type, with a scrollback of accepted queries
//! - **Pins** - Frequently used paths kept at the top of the action menu
//!
//! # Usage
//!
//! ```rust,no_run
//! use filehop_core::PathContext;
//! use filehop_tui::{Command, RunOptions, UserSettings};
//!
//! filehop_tui::run(RunOptions {
//!     settings: UserSettings::load(),
//!     ctx: PathContext::new(dirs::home_dir(), Vec::new()),
//!     document: None,
//!     start: vec![Command::OpenNavigator { query: None }],
//! })
//! .unwrap();
//! ```
//!
//! # Keyboard Navigation
//!
//! - `Enter` - Open the focused file or enter the focused folder
//! - `Backspace` on empty input - Step out
//! - `Tab` - Complete names
//! - `Ctrl-o` - Action menu
//! - `Ctrl-f`/`Ctrl-g` - Search names/contents
//! - `F1` - Help
//! - `Esc` - Close

pub mod app;
pub mod controller;
mod event;
pub mod host;
pub mod navigator;
mod opener;
pub mod picker;
pub mod search;
mod theme;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use filehop_core::PathContext;
use filehop_ops::FileStore;
use filehop_search::TokioRunner;
use tracing::{error, warn};

pub use app::state::UserSettings;
pub use app::{AppResult, TerminalHost};
pub use controller::{Command, Controller};
pub use host::{Host, HostEvent, InputRequest, Notice, NoticeLevel, Placement};
pub use navigator::{Flow, NavState, Navigator};
pub use picker::{ItemButton, ItemIcon, Picker, PickerButton, PickerEvent, PickerItem};
pub use search::SearchView;
pub use theme::{Theme, ThemeVariant};

/// How a terminal session starts.
pub struct RunOptions {
    pub settings: UserSettings,
    pub ctx: PathContext,
    /// The file the session is working on, if any.
    pub document: Option<PathBuf>,
    /// Entry points to run, in order, before handing over to the user.
    pub start: Vec<Command>,
}

/// Run the TUI application.
pub fn run(options: RunOptions) -> AppResult<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let terminal = ratatui::init();
    rt.block_on(run_app(terminal, options));
    ratatui::restore();

    // Shutdown runtime immediately to cancel background searches
    rt.shutdown_timeout(Duration::from_millis(100));

    Ok(())
}

async fn run_app(terminal: ratatui::DefaultTerminal, options: RunOptions) {
    let store_path = FileStore::default_path()
        .unwrap_or_else(|| std::env::temp_dir().join("filehop").join("state.json"));
    let store = FileStore::open(store_path);
    let config = options.settings.navigator.clone();

    let host = TerminalHost::new(terminal, options.settings, store, options.document);
    let mut controller = Controller::new(host, TokioRunner::new(), options.ctx, config);

    for command in options.start {
        if let Err(err) = controller.execute(command).await {
            if err.is_fatal() {
                error!(error = %err, "Failed to start");
            } else {
                warn!(error = %err, "Failed to start");
            }
            controller.host_mut().notify(Notice::error(err.to_string()));
        }
    }
    if controller.is_idle() {
        if let Err(err) = controller.execute(Command::OpenNavigator { query: None }).await {
            warn!(error = %err, "Failed to open navigator");
        }
    }

    controller.run().await;
}
