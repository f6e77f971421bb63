//! The navigator state machine.
//!
//! A [`Navigator`] owns the current [`NavPath`], the item list shown in the
//! picker and the transient flags of one browsing session. Every operation
//! takes the [`Host`] explicitly; the navigator never holds on to it.

mod actions;
mod completion;
mod history;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use filehop_core::{
    Action, Entry, EntryFilter, EntryKind, NavError, NavPath, NavigatorConfig, PINNED_KEY,
    PathContext, PinList, RootKind,
};
use filehop_ops::{FileSystem, KeyValueStore, validate_filename};
use filehop_search::SearchMode;

use crate::host::{Host, Notice};
use crate::picker::{ItemButton, ItemIcon, Picker, PickerItem};

pub use completion::{AutoCompletion, Candidate};
pub use history::PathHistory;

/// Where the navigator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// Listing the children of the current directory.
    Browsing,
    /// Listing actions for the current path. `pushed` is set when entering
    /// the menu appended the focused entry to the path.
    ActionsMenu { pushed: bool },
    /// A rename prompt is open; the picker is hidden.
    Renaming,
    /// A delete confirmation is open; the picker is hidden.
    Deleting,
    Disposed,
}

/// A search the navigator hands off to the search orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub dirs: Vec<PathBuf>,
    pub mode: SearchMode,
}

/// What the owner should do after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The session is done; dispose it.
    Close,
    /// Close the navigator and start a search.
    Search(SearchRequest),
}

/// Keystroke-driven browser over one directory at a time.
#[derive(Debug)]
pub struct Navigator {
    ctx: PathContext,
    filter: EntryFilter,
    path: NavPath,
    /// Entry to focus after the next refresh.
    focus: Option<String>,
    /// Entries of the last refresh.
    listing: Vec<Entry>,
    /// Entries currently in the picker: the listing, possibly with a
    /// synthetic candidate in front.
    items: Vec<Entry>,
    history: PathHistory,
    completion: Option<AutoCompletion>,
    state: NavState,
    write_mode: bool,
    /// Whether the current path is pinned, for the menu's pin label.
    pinned_here: bool,
    active_document: Option<PathBuf>,
}

impl Navigator {
    /// Create a navigator at `path`. When `write_mode` is set, typed names
    /// become write targets instead of new buffers.
    pub fn new(
        ctx: PathContext,
        config: NavigatorConfig,
        path: NavPath,
        write_mode: bool,
        active_document: Option<PathBuf>,
    ) -> Self {
        Self {
            ctx,
            filter: EntryFilter::new(config),
            path,
            focus: None,
            listing: Vec::new(),
            items: Vec::new(),
            history: PathHistory::new(),
            completion: None,
            state: NavState::Browsing,
            write_mode,
            pinned_here: false,
            active_document,
        }
    }

    /// Focus `name` once the first listing is loaded.
    pub fn with_focus(mut self, name: Option<String>) -> Self {
        self.focus = name;
        self
    }

    pub fn path(&self) -> &NavPath {
        &self.path
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn items(&self) -> &[Entry] {
        &self.items
    }

    pub fn is_write_mode(&self) -> bool {
        self.write_mode
    }

    /// Browsing the action menu instead of directory children.
    pub fn in_actions(&self) -> bool {
        matches!(self.state, NavState::ActionsMenu { .. })
    }

    /// A modal sub-flow is open and hiding the picker must not end the
    /// session.
    pub fn keep_alive(&self) -> bool {
        matches!(self.state, NavState::Renaming | NavState::Deleting)
    }

    /// Show the picker and load the first listing, then apply
    /// `initial_query` as if it had been typed.
    pub async fn start<H: Host>(
        &mut self,
        host: &mut H,
        initial_query: Option<String>,
    ) -> Result<(), NavError> {
        debug!(path = %self.path, write_mode = self.write_mode, "Navigator started");
        {
            let picker = host.picker();
            picker.set_buttons(Vec::new());
            picker.set_placeholder(if self.write_mode {
                "Type a file name to write to"
            } else {
                "Type a path, Tab to complete"
            });
            picker.set_value("");
            picker.show();
        }
        self.refresh(host).await;

        match initial_query {
            Some(query) if !query.is_empty() => {
                host.picker().set_value(&query);
                self.on_value_change(host, query).await
            }
            _ => {
                if self.write_mode {
                    self.on_value_change(host, String::new()).await?;
                }
                Ok(())
            }
        }
    }

    /// Re-read the current path and repopulate the picker.
    ///
    /// The picker is busy and refuses accepts until the new list is in
    /// place.
    pub async fn refresh<H: Host>(&mut self, host: &mut H) {
        self.completion = None;
        {
            let picker = host.picker();
            picker.set_busy(true);
            picker.set_enabled(false);
            let mut title = self.path.render();
            if self.write_mode {
                title.push_str("  (write)");
            }
            picker.set_title(&title);
        }

        let entries = match self.path.resolve(&self.ctx) {
            Ok(abs) => self.load(host, &abs).await,
            Err(err) => {
                report(host, &err);
                Vec::new()
            }
        };

        let active = if self.in_actions() {
            (!entries.is_empty()).then_some(0)
        } else {
            let id = self.path.id(&self.ctx);
            let wanted = self
                .focus
                .take()
                .or_else(|| self.history.get(&id).map(str::to_string));
            wanted.and_then(|name| entries.iter().position(|e| e.name() == name))
        };

        self.listing = entries.clone();
        self.items = entries;
        let presented = self.present();
        let picker = host.picker();
        picker.set_items(presented);
        picker.set_active(active);
        picker.set_busy(false);
        picker.set_enabled(true);
    }

    async fn load<H: Host>(&mut self, host: &mut H, abs: &Path) -> Vec<Entry> {
        let kind = match host.fs().stat(abs).await {
            Ok(kind) => kind,
            Err(err) => {
                report(host, &err);
                None
            }
        };

        match kind {
            None => {
                if self.in_actions() {
                    self.state = NavState::Browsing;
                }
                if self.write_mode {
                    vec![Entry::action(Action::NewFolder)]
                } else {
                    Vec::new()
                }
            }
            Some(kind) if self.in_actions() || !kind.is_dir() => {
                if !self.in_actions() {
                    self.state = NavState::ActionsMenu { pushed: true };
                }
                self.menu(host, abs, kind)
            }
            Some(_) => match host.fs().read_directory(abs).await {
                Ok(members) => self.filter.classify(abs, members),
                Err(err) => {
                    report(host, &err);
                    Vec::new()
                }
            },
        }
    }

    fn menu<H: Host>(&mut self, host: &mut H, abs: &Path, kind: EntryKind) -> Vec<Entry> {
        let actions = if kind.is_dir() {
            Action::directory_menu()
        } else {
            Action::file_menu()
        };
        let pins: PinList = host.store().get_or(PINNED_KEY, PinList::new());
        self.pinned_here = pins.contains(&abs.display().to_string());

        actions
            .iter()
            .map(|action| Entry::action(*action))
            .chain(pins.iter().map(|pin| Entry::MenuAction {
                action: Action::OpenPin,
                pinned: Some(pin.clone()),
            }))
            .collect()
    }

    fn present(&self) -> Vec<PickerItem> {
        let label_ignored = self.filter.config().label_ignored_files;
        self.items
            .iter()
            .map(|entry| match entry {
                Entry::RealFile(file) => {
                    let icon = match file.kind {
                        EntryKind::Directory => ItemIcon::Folder,
                        EntryKind::File => ItemIcon::File,
                        EntryKind::Other => ItemIcon::Other,
                    };
                    let mut item = PickerItem::new(&file.name, icon)
                        .dimmed(file.ignored)
                        .always_show(file.always_show);
                    if label_ignored && file.ignored {
                        item = item.description("ignored");
                    }
                    item
                }
                Entry::MenuAction {
                    pinned: Some(pin), ..
                } => {
                    let shown = self.ctx.to_nav_path(Path::new(&pin.path)).render();
                    PickerItem::new(shown, ItemIcon::Pin)
                        .description(if pin.kind.is_dir() { "pinned folder" } else { "pinned file" })
                        .detail(&pin.path)
                        .button(ItemButton::Unpin)
                }
                Entry::MenuAction { action, .. } => {
                    let label = if *action == Action::Pin && self.pinned_here {
                        "Unpin".to_string()
                    } else {
                        action.to_string()
                    };
                    PickerItem::new(label, ItemIcon::Action).always_show(true)
                }
                Entry::Synthetic { name, action } => PickerItem::new(name, ItemIcon::New)
                    .description(action.to_string())
                    .always_show(true),
            })
            .collect()
    }

    /// Put the plain listing back in the picker and focus `active`.
    fn show_listing<H: Host>(&mut self, host: &mut H, active: Option<usize>) {
        if self.items != self.listing {
            self.items = self.listing.clone();
            let presented = self.present();
            host.picker().set_items(presented);
        }
        host.picker().set_active(active);
    }

    /// Show the listing with a synthetic candidate in front, focused.
    fn show_candidate<H: Host>(&mut self, host: &mut H, name: String) {
        let action = if self.write_mode {
            Action::OpenFile
        } else {
            Action::NewFile
        };
        self.items = std::iter::once(Entry::Synthetic { name, action })
            .chain(self.listing.iter().cloned())
            .collect();
        let presented = self.present();
        let picker = host.picker();
        picker.set_items(presented);
        picker.set_active(Some(0));
    }

    /// React to the user editing the input.
    ///
    /// Separators in the value move the navigator: everything up to the
    /// last separator is resolved (root prefixes, `..`, relative names) and
    /// entered, and the remainder becomes the new value. Each move finishes
    /// its refresh before the remainder is looked at.
    pub async fn on_value_change<H: Host>(
        &mut self,
        host: &mut H,
        value: String,
    ) -> Result<(), NavError> {
        if self.state != NavState::Browsing {
            return Ok(());
        }
        self.completion = None;

        let mut value = value;
        loop {
            if value.is_empty() {
                let document_name = self
                    .active_document
                    .as_deref()
                    .and_then(Path::file_name)
                    .map(|n| n.to_string_lossy().into_owned());
                match document_name {
                    Some(name) if self.write_mode => self.show_candidate(host, name),
                    _ => self.show_listing(host, None),
                }
                return Ok(());
            }

            if let Some(index) = self
                .listing
                .iter()
                .position(|e| e.as_file().is_some_and(|f| f.name == value))
            {
                self.show_listing(host, Some(index));
                return Ok(());
            }

            let normalized = value.replace('\\', "/");
            let body = normalized.strip_suffix('/').unwrap_or(&normalized);
            if let Some(pos) = body.rfind('/') {
                let target = self.resolve_prefix(&normalized[..pos]);
                let rest = normalized[pos + 1..].to_string();
                self.jump(host, target).await;
                host.picker().set_value(&rest);
                value = rest;
                continue;
            }

            if let Some(name) = normalized.strip_suffix('/') {
                if name == ".." {
                    self.step_out(host).await;
                } else {
                    let target = self.resolve_prefix(name);
                    self.jump(host, target).await;
                }
                host.picker().set_value("");
                if self.write_mode {
                    value = String::new();
                    continue;
                }
                return Ok(());
            }

            self.show_candidate(host, value);
            return Ok(());
        }
    }

    /// Resolve the directory part of typed input.
    fn resolve_prefix(&self, prefix: &str) -> NavPath {
        if prefix.is_empty() {
            return match self.path.root() {
                RootKind::Drive(letter) => NavPath::new(RootKind::Drive(*letter)),
                _ => NavPath::filesystem_root(),
            };
        }
        NavPath::parse(prefix).unwrap_or_else(|| self.path.join_across_root(prefix, &self.ctx))
    }

    /// Move to `target` in browsing mode.
    async fn jump<H: Host>(&mut self, host: &mut H, target: NavPath) {
        if target == self.path {
            return;
        }
        debug!(from = %self.path, to = %target, "Jumping");
        self.path = target;
        self.focus = None;
        self.state = NavState::Browsing;
        self.refresh(host).await;
    }

    fn focused<H: Host>(&self, host: &mut H) -> Option<&Entry> {
        host.picker().active().and_then(|i| self.items.get(i))
    }

    /// Step into the focused entry. A directory is entered; any other
    /// entry opens its action menu.
    pub async fn step_in<H: Host>(&mut self, host: &mut H) {
        if self.state != NavState::Browsing {
            return;
        }
        let Some(Entry::RealFile(file)) = self.focused(host).cloned() else {
            return;
        };
        self.path.push(&file.name);
        self.focus = None;
        if !file.kind.is_dir() {
            self.state = NavState::ActionsMenu { pushed: true };
        }
        host.picker().set_value("");
        self.refresh(host).await;
    }

    /// Leave the action menu, or go to the parent directory. Symbolic roots
    /// are stepped above; does nothing at the filesystem or a drive root.
    pub async fn step_out<H: Host>(&mut self, host: &mut H) {
        match self.state {
            NavState::ActionsMenu { pushed } => {
                self.state = NavState::Browsing;
                if pushed {
                    self.focus = self.path.pop();
                }
            }
            NavState::Browsing => {
                let mut parent = self.path.clone();
                let Some(left) = parent.pop_across_root(&self.ctx) else {
                    return;
                };
                if let Some(Entry::RealFile(file)) = self.focused(host) {
                    let name = file.name.clone();
                    self.history.record(self.path.id(&self.ctx), name);
                }
                self.path = parent;
                self.focus = Some(left);
            }
            _ => return,
        }
        host.picker().set_value("");
        self.refresh(host).await;
    }

    /// Open the action menu for the focused entry, or for the current
    /// directory when nothing real is focused.
    pub async fn open_actions<H: Host>(&mut self, host: &mut H) {
        if self.state != NavState::Browsing {
            return;
        }
        match self.focused(host).cloned() {
            Some(Entry::RealFile(file)) => {
                self.path.push(&file.name);
                self.state = NavState::ActionsMenu { pushed: true };
            }
            _ => self.state = NavState::ActionsMenu { pushed: false },
        }
        host.picker().set_value("");
        self.refresh(host).await;
    }

    /// Cycle through names matching the input.
    ///
    /// Applying a candidate bypasses [`on_value_change`](Self::on_value_change)
    /// so the completion survives its own edits. A lone matching directory
    /// is entered instead.
    pub async fn tab_complete<H: Host>(
        &mut self,
        host: &mut H,
        forward: bool,
    ) -> Result<(), NavError> {
        if self.state != NavState::Browsing {
            return Ok(());
        }
        match self.completion.as_mut() {
            Some(completion) => completion.advance(forward),
            None => {
                let value = host.picker().value().to_string();
                self.completion = AutoCompletion::build(&self.listing, &value, forward);
            }
        }
        let Some(completion) = &self.completion else {
            return Ok(());
        };

        let candidate = completion.current().clone();
        if completion.is_single_directory() {
            let value = format!("{}/", candidate.name);
            host.picker().set_value(&value);
            return self.on_value_change(host, value).await;
        }

        self.show_listing(host, Some(candidate.index));
        host.picker().set_value(&candidate.name);
        Ok(())
    }

    /// Accept the focused entry.
    pub async fn accept<H: Host>(&mut self, host: &mut H) -> Result<Flow, NavError> {
        if !matches!(self.state, NavState::Browsing | NavState::ActionsMenu { .. }) {
            return Ok(Flow::Continue);
        }
        let Some(entry) = self.focused(host).cloned() else {
            return Ok(Flow::Continue);
        };

        match entry {
            Entry::RealFile(file) if file.kind.is_dir() => {
                self.path.push(&file.name);
                self.focus = None;
                host.picker().set_value("");
                self.refresh(host).await;
                Ok(Flow::Continue)
            }
            Entry::RealFile(file) => {
                let target = self.path.join(&file.name);
                self.dispatch(host, Action::OpenFile, target, None).await
            }
            Entry::MenuAction { action, pinned } => {
                let target = self.path.clone();
                self.dispatch(host, action, target, pinned).await
            }
            Entry::Synthetic { name, action } => {
                if let Err(err) = validate_filename(&name) {
                    report(host, &err);
                    return Ok(Flow::Continue);
                }
                let target = self.path.join(&name);
                if self.write_mode && action == Action::OpenFile {
                    return self.write_and_open(host, target).await;
                }
                self.dispatch(host, action, target, None).await
            }
        }
    }

    /// Handle a per-item button.
    pub async fn item_button<H: Host>(&mut self, host: &mut H, index: usize, button: ItemButton) {
        match (button, self.items.get(index)) {
            (
                ItemButton::Unpin,
                Some(Entry::MenuAction {
                    pinned: Some(pin), ..
                }),
            ) => {
                let path = pin.path.clone();
                let store = host.store();
                let mut pins: PinList = store.get_or(PINNED_KEY, PinList::new());
                pins.remove(&path);
                if let Err(err) = store.set(PINNED_KEY, &pins) {
                    report(host, &err);
                }
                self.refresh(host).await;
            }
            _ => debug!(index, %button, "Ignoring button on item without it"),
        }
    }

    /// Rename the path the user is looking at: the action menu's target,
    /// else the focused entry, else the current directory.
    pub async fn rename_current_or_focused<H: Host>(&mut self, host: &mut H) -> Result<(), NavError> {
        let target = match self.state {
            NavState::ActionsMenu { .. } => self.path.clone(),
            NavState::Browsing => match self.focused(host) {
                Some(Entry::RealFile(file)) => self.path.join(&file.name),
                _ => self.path.clone(),
            },
            _ => return Ok(()),
        };
        self.rename(host, target).await
    }

    /// End the session.
    pub fn dispose<H: Host>(&mut self, host: &mut H) {
        self.state = NavState::Disposed;
        self.completion = None;
        host.picker().hide();
        debug!(path = %self.path, "Navigator disposed");
    }

    /// Resolve a path against this navigator's context.
    pub fn resolve(&self, path: &NavPath) -> Result<PathBuf, NavError> {
        path.resolve(&self.ctx)
    }

    pub fn context(&self) -> &PathContext {
        &self.ctx
    }
}

/// Log a recovered failure and tell the user.
pub(crate) fn report<H: Host>(host: &mut H, err: &NavError) {
    warn!(error = %err, "Operation failed");
    host.notify(Notice::error(err.to_string()));
}
