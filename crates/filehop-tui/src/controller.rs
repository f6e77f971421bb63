//! Entry points and the event loop that owns the open sessions.
//!
//! The [`Controller`] holds at most one navigator and at most one search
//! view. Host events, debounce deadlines and search outcomes are handled
//! one at a time on the calling task.

use std::path::{Path, PathBuf};

use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info};

use filehop_core::{NavError, NavPath, NavigatorConfig, PathContext, RootKind};
use filehop_search::{ProcessRunner, Scrollback, SearchEvent, SearchMode};

use crate::host::{Host, HostEvent, Notice};
use crate::navigator::{Flow, Navigator, SearchRequest};
use crate::picker::{Picker, PickerEvent};
use crate::search::SearchView;

/// An entry point, typically bound to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the navigator, optionally applying `query` as typed input.
    OpenNavigator { query: Option<String> },
    /// Open the navigator with typed names becoming write targets.
    OpenNavigatorWriteMode,
    RenameCurrentOrFocused,
    StepIn,
    StepOut,
    OpenActions,
    TabComplete { forward: bool },
    /// Search the navigator's directory, or the active document's.
    InvokeSearch {
        query: Option<String>,
        mode: SearchMode,
    },
    ToggleSearchScope,
    ToggleSearchMode,
    CloseNavigator,
    Quit,
}

/// Owns the navigator and search sessions for one host.
pub struct Controller<H, R> {
    host: H,
    runner: R,
    ctx: PathContext,
    config: NavigatorConfig,
    navigator: Option<Navigator>,
    search: Option<SearchView<R>>,
    scrollback: Scrollback,
    quit: bool,
}

impl<H: Host, R: ProcessRunner + Clone> Controller<H, R> {
    pub fn new(host: H, runner: R, ctx: PathContext, config: NavigatorConfig) -> Self {
        Self {
            host,
            runner,
            ctx,
            config,
            navigator: None,
            search: None,
            scrollback: Scrollback::new(),
            quit: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn navigator(&self) -> Option<&Navigator> {
        self.navigator.as_ref()
    }

    pub fn search(&self) -> Option<&SearchView<R>> {
        self.search.as_ref()
    }

    /// Path the navigator is showing, if one is open.
    pub fn current_path(&self) -> Option<&NavPath> {
        self.navigator.as_ref().map(Navigator::path)
    }

    /// Text in the picker input.
    pub fn current_input_value(&mut self) -> String {
        self.host.picker().value().to_string()
    }

    /// Nothing is open and the loop should stop.
    pub fn is_idle(&self) -> bool {
        self.quit || (self.navigator.is_none() && self.search.is_none())
    }

    /// Run one entry point.
    ///
    /// Broken preconditions are returned; everything else is reported to
    /// the user.
    pub async fn execute(&mut self, command: Command) -> Result<(), NavError> {
        debug!(?command, "Executing command");
        match command {
            Command::OpenNavigator { query } => self.open_navigator(false, query).await,
            Command::OpenNavigatorWriteMode => self.open_navigator(true, None).await,
            Command::RenameCurrentOrFocused => {
                if self.navigator.is_none() {
                    self.open_navigator(false, None).await?;
                }
                if let Some(navigator) = self.navigator.as_mut() {
                    navigator.rename_current_or_focused(&mut self.host).await?;
                }
                Ok(())
            }
            Command::StepIn => {
                if let Some(navigator) = self.navigator.as_mut() {
                    navigator.step_in(&mut self.host).await;
                }
                Ok(())
            }
            Command::StepOut => {
                if let Some(navigator) = self.navigator.as_mut() {
                    navigator.step_out(&mut self.host).await;
                }
                Ok(())
            }
            Command::OpenActions => {
                if let Some(navigator) = self.navigator.as_mut() {
                    navigator.open_actions(&mut self.host).await;
                }
                Ok(())
            }
            Command::TabComplete { forward } => match self.navigator.as_mut() {
                Some(navigator) => navigator.tab_complete(&mut self.host, forward).await,
                None => Ok(()),
            },
            Command::InvokeSearch { query, mode } => {
                let dir = self.search_origin();
                self.open_search(
                    SearchRequest {
                        dirs: vec![dir],
                        mode,
                    },
                    query,
                );
                Ok(())
            }
            Command::ToggleSearchScope => {
                if let Some(search) = self.search.as_mut() {
                    search.toggle_scope(&mut self.host);
                }
                Ok(())
            }
            Command::ToggleSearchMode => {
                if let Some(search) = self.search.as_mut() {
                    search.toggle_mode(&mut self.host);
                }
                Ok(())
            }
            Command::CloseNavigator => {
                self.close_navigator();
                self.close_search();
                Ok(())
            }
            Command::Quit => {
                self.close_navigator();
                self.close_search();
                self.quit = true;
                Ok(())
            }
        }
    }

    async fn open_navigator(&mut self, write_mode: bool, query: Option<String>) -> Result<(), NavError> {
        self.close_search();
        self.close_navigator();

        let document = self.host.active_document();
        let (start, focus) = self.start_location(document.as_deref());
        info!(path = %start, write_mode, "Opening navigator");
        let navigator = Navigator::new(
            self.ctx.clone(),
            self.config.clone(),
            start,
            write_mode,
            document,
        )
        .with_focus(focus);
        let navigator = self.navigator.insert(navigator);
        navigator.start(&mut self.host, query).await
    }

    /// Where a new navigator starts: beside the active document, else the
    /// workspace, else home, else the filesystem root.
    fn start_location(&self, document: Option<&Path>) -> (NavPath, Option<String>) {
        if let Some(doc) = document {
            if let Some(parent) = doc.parent() {
                let focus = doc.file_name().map(|n| n.to_string_lossy().into_owned());
                return (self.ctx.to_nav_path(parent), focus);
            }
        }
        let start = if self.ctx.workspace_root().is_some() {
            NavPath::new(RootKind::Workspace)
        } else if self.ctx.home.is_some() {
            NavPath::new(RootKind::Home)
        } else {
            NavPath::filesystem_root()
        };
        (start, None)
    }

    /// Directory a search entry point runs in.
    fn search_origin(&self) -> PathBuf {
        if let Some(navigator) = &self.navigator {
            if let Ok(abs) = navigator.resolve(navigator.path()) {
                return if navigator.in_actions() && !abs.is_dir() {
                    abs.parent().map(Path::to_path_buf).unwrap_or(abs)
                } else {
                    abs
                };
            }
        }
        if let Some(doc) = self.host.active_document() {
            if let Some(parent) = doc.parent() {
                return parent.to_path_buf();
            }
        }
        self.ctx
            .workspace_root()
            .map(Path::to_path_buf)
            .or_else(|| self.ctx.home.clone())
            .unwrap_or_else(|| PathBuf::from("/"))
    }

    fn open_search(&mut self, request: SearchRequest, query: Option<String>) {
        self.close_navigator();
        self.close_search();
        info!(mode = %request.mode, dirs = ?request.dirs, "Opening search");
        let scrollback = std::mem::take(&mut self.scrollback);
        let mut view = SearchView::new(
            self.runner.clone(),
            &self.config.search_tool,
            request.dirs,
            self.ctx.workspace_roots.clone(),
            request.mode,
            scrollback,
        );
        view.start(&mut self.host, query);
        self.search = Some(view);
    }

    /// Dispose the navigator if one is open.
    pub fn close_navigator(&mut self) {
        if let Some(mut navigator) = self.navigator.take() {
            navigator.dispose(&mut self.host);
        }
    }

    fn close_search(&mut self) {
        if let Some(mut search) = self.search.take() {
            self.scrollback = search.dispose(&mut self.host);
        }
    }

    fn apply_flow(&mut self, flow: Flow) {
        match flow {
            Flow::Continue => {}
            Flow::Close => self.close_navigator(),
            Flow::Search(request) => self.open_search(request, None),
        }
    }

    /// Handle one host event.
    pub async fn handle_event(&mut self, event: HostEvent) -> Result<(), NavError> {
        match event {
            HostEvent::Command(command) => self.execute(command).await,
            HostEvent::Picker(event) => self.handle_picker_event(event).await,
        }
    }

    async fn handle_picker_event(&mut self, event: PickerEvent) -> Result<(), NavError> {
        if let Some(navigator) = self.navigator.as_mut() {
            match event {
                PickerEvent::ValueChanged(value) => {
                    navigator.on_value_change(&mut self.host, value).await?;
                }
                PickerEvent::Accepted => {
                    let flow = navigator.accept(&mut self.host).await?;
                    self.apply_flow(flow);
                }
                PickerEvent::ItemButtonTriggered { index, button } => {
                    navigator.item_button(&mut self.host, index, button).await;
                }
                PickerEvent::ButtonTriggered(_) => {}
                PickerEvent::Hidden => {
                    if !navigator.keep_alive() {
                        self.close_navigator();
                    }
                }
            }
        } else if let Some(search) = self.search.as_mut() {
            match event {
                PickerEvent::ValueChanged(value) => search.on_value_change(&mut self.host, &value),
                PickerEvent::Accepted => {
                    if search.accept(&mut self.host).await == Flow::Close {
                        self.close_search();
                    }
                }
                PickerEvent::ButtonTriggered(button) => search.on_button(&mut self.host, button),
                PickerEvent::ItemButtonTriggered { .. } => {}
                PickerEvent::Hidden => self.close_search(),
            }
        }
        Ok(())
    }

    fn report(&mut self, err: NavError) {
        if err.is_fatal() {
            error!(error = %err, "Command failed");
        }
        self.host.notify(Notice::error(err.to_string()));
    }

    /// Drive sessions until nothing is open or the host shuts down.
    pub async fn run(&mut self) {
        while !self.is_idle() {
            let deadline = self.search.as_ref().and_then(SearchView::deadline);
            tokio::select! {
                event = self.host.next_event() => {
                    let Some(event) = event else {
                        debug!("Host closed");
                        break;
                    };
                    if let Err(err) = self.handle_event(event).await {
                        self.report(err);
                    }
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(search) = self.search.as_mut() {
                        search.poll_debounce(&mut self.host);
                    }
                }
                Some(event) = search_event(&mut self.search) => {
                    if let Some(search) = self.search.as_mut() {
                        search.on_search_event(&mut self.host, event);
                    }
                }
            }
        }
        self.close_navigator();
        self.close_search();
    }
}

/// Next outcome of the open search, or pending forever without one.
async fn search_event<R: ProcessRunner>(search: &mut Option<SearchView<R>>) -> Option<SearchEvent> {
    match search {
        Some(search) => search.next_event().await,
        None => std::future::pending().await,
    }
}
