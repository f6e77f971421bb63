//! Picker presentation of one search invocation.

use std::path::PathBuf;

use tokio::time::Instant;
use tracing::debug;

use filehop_search::{ProcessRunner, Scrollback, SearchEvent, SearchMode, SearchSession};

use crate::host::{Host, Notice, Placement};
use crate::navigator::Flow;
use crate::picker::{ItemIcon, Picker, PickerButton, PickerItem};

/// A search session bound to the picker.
pub struct SearchView<R> {
    session: SearchSession<R>,
    /// Directories the search was invoked on.
    origin: Vec<PathBuf>,
    /// Workspace roots for the widened scope.
    roots: Vec<PathBuf>,
    workspace_scope: bool,
    /// The picker lists scrollback entries instead of hits.
    showing_history: bool,
}

impl<R: ProcessRunner> SearchView<R> {
    pub fn new(
        runner: R,
        tool: &str,
        origin: Vec<PathBuf>,
        roots: Vec<PathBuf>,
        mode: SearchMode,
        scrollback: Scrollback,
    ) -> Self {
        let session =
            SearchSession::new(runner, tool, origin.clone(), mode).with_scrollback(scrollback);
        Self {
            session,
            origin,
            roots,
            workspace_scope: false,
            showing_history: false,
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.session.mode()
    }

    pub fn dirs(&self) -> &[PathBuf] {
        self.session.dirs()
    }

    pub fn session(&self) -> &SearchSession<R> {
        &self.session
    }

    pub fn is_showing_history(&self) -> bool {
        self.showing_history
    }

    /// Show the picker, launching `query` right away when given.
    pub fn start<H: Host>(&mut self, host: &mut H, query: Option<String>) {
        {
            let picker = host.picker();
            picker.set_placeholder("Regex, then options such as -g '*.rs'");
            picker.set_buttons(vec![PickerButton::SearchMode, PickerButton::SearchScope]);
            picker.set_value(query.as_deref().unwrap_or(""));
            picker.show();
        }
        match query.filter(|q| !q.trim().is_empty()) {
            Some(query) => {
                self.session.launch(&query);
                self.present(host);
            }
            None => self.show_history(host),
        }
    }

    /// Feed an edited input value into the debouncer.
    pub fn on_value_change<H: Host>(&mut self, host: &mut H, value: &str) {
        self.session.on_input(value);
        if value.trim().is_empty() {
            self.show_history(host);
        } else if self.showing_history {
            self.showing_history = false;
            host.picker().set_items(Vec::new());
        }
    }

    /// When the debounced input becomes ready.
    pub fn deadline(&self) -> Option<Instant> {
        self.session.deadline()
    }

    /// Launch the debounced input if it has settled.
    pub fn poll_debounce<H: Host>(&mut self, host: &mut H) {
        if self.session.poll_debounce() {
            self.present(host);
        }
    }

    /// Next outcome of the current generation. Cancel-safe.
    pub async fn next_event(&mut self) -> Option<SearchEvent> {
        self.session.next_event().await
    }

    pub fn on_search_event<H: Host>(&mut self, host: &mut H, event: SearchEvent) {
        match event {
            SearchEvent::Results { dir, added } => {
                debug!(dir = %dir.display(), added, "Search results");
            }
            SearchEvent::Finished { dir } => {
                debug!(dir = %dir.display(), "Search finished");
            }
            SearchEvent::Failed { dir, error } => {
                if !error.is_cancelled() {
                    host.notify(Notice::warning(format!(
                        "Search in {} failed: {error}",
                        dir.display()
                    )));
                }
            }
        }
        self.present(host);
    }

    /// Accept the focused row: replay a scrollback entry or open a hit.
    pub async fn accept<H: Host>(&mut self, host: &mut H) -> Flow {
        let Some(index) = host.picker().active() else {
            return Flow::Continue;
        };

        if self.showing_history {
            let Some(query) = self.session.scrollback().get(index).map(str::to_string) else {
                return Flow::Continue;
            };
            host.picker().set_value(&query);
            self.session.launch(&query);
            self.present(host);
            return Flow::Continue;
        }

        let Some(hit) = self.session.results().get(index).cloned() else {
            return Flow::Continue;
        };
        let query = self.session.query().to_string();
        self.session.record(&query);
        match host
            .open_file(&hit.path, Placement::Active, hit.target_line())
            .await
        {
            Ok(()) => Flow::Close,
            Err(err) => {
                host.notify(Notice::error(err.to_string()));
                Flow::Continue
            }
        }
    }

    pub fn on_button<H: Host>(&mut self, host: &mut H, button: PickerButton) {
        match button {
            PickerButton::SearchMode => self.toggle_mode(host),
            PickerButton::SearchScope => self.toggle_scope(host),
        }
    }

    /// Switch between name and content search, rerunning the query.
    pub fn toggle_mode<H: Host>(&mut self, host: &mut H) {
        self.session.toggle_mode();
        self.refresh(host);
    }

    /// Switch between the invocation directories and the workspace roots.
    pub fn toggle_scope<H: Host>(&mut self, host: &mut H) {
        if self.roots.is_empty() {
            host.notify(Notice::info("No workspace folders to search"));
            return;
        }
        self.workspace_scope = !self.workspace_scope;
        let dirs = if self.workspace_scope {
            self.roots.clone()
        } else {
            self.origin.clone()
        };
        debug!(workspace = self.workspace_scope, "Search scope toggled");
        self.session.set_dirs(dirs);
        self.refresh(host);
    }

    fn refresh<H: Host>(&mut self, host: &mut H) {
        if self.session.query().is_empty() {
            self.show_history(host);
        } else {
            self.present(host);
        }
    }

    /// Stop all processes and hand back the scrollback.
    pub fn dispose<H: Host>(&mut self, host: &mut H) -> Scrollback {
        self.session.dispose();
        let picker = host.picker();
        picker.set_buttons(Vec::new());
        picker.set_busy(false);
        picker.hide();
        self.session.take_scrollback()
    }

    fn title(&self) -> String {
        let dirs: Vec<String> = self
            .session
            .dirs()
            .iter()
            .map(|d| d.display().to_string())
            .collect();
        format!("Search {} in {}", self.session.mode(), dirs.join(", "))
    }

    fn present<H: Host>(&mut self, host: &mut H) {
        self.showing_history = false;
        let items: Vec<PickerItem> = self
            .session
            .results()
            .iter()
            .map(|hit| {
                let mut item = PickerItem::new(&hit.label, ItemIcon::Match)
                    .detail(&hit.detail)
                    .always_show(true);
                if let Some(description) = &hit.description {
                    item = item.description(description);
                }
                item
            })
            .collect();

        let title = self.title();
        let busy = self.session.is_busy();
        let picker = host.picker();
        let active = picker
            .active()
            .filter(|&i| i < items.len())
            .or((!items.is_empty()).then_some(0));
        picker.set_title(&title);
        picker.set_items(items);
        picker.set_active(active);
        picker.set_busy(busy);
    }

    fn show_history<H: Host>(&mut self, host: &mut H) {
        self.showing_history = true;
        let items: Vec<PickerItem> = self
            .session
            .scrollback()
            .iter()
            .map(|query| {
                PickerItem::new(query, ItemIcon::History)
                    .description("recent")
                    .always_show(true)
            })
            .collect();
        let title = self.title();
        let picker = host.picker();
        picker.set_title(&title);
        picker.set_items(items);
        picker.set_active(None);
        picker.set_busy(false);
    }
}
