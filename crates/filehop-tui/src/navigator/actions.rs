//! Action dispatch for accepted menu entries and synthetic candidates.

use std::path::PathBuf;

use tracing::{debug, info};

use filehop_core::{Action, EntryKind, NavError, NavPath, PINNED_KEY, PinList, PinnedItem};
use filehop_ops::{FileSystem, KeyValueStore, validate_relative_name};
use filehop_search::SearchMode;

use super::{Flow, NavState, Navigator, SearchRequest, report};
use crate::host::{Host, InputRequest, Notice, Placement};
use crate::picker::Picker;

impl Navigator {
    /// Run `action` against `target`.
    ///
    /// Host failures are reported as notices and keep the session open;
    /// only broken preconditions are returned as errors.
    pub async fn dispatch<H: Host>(
        &mut self,
        host: &mut H,
        action: Action,
        target: NavPath,
        pinned: Option<PinnedItem>,
    ) -> Result<Flow, NavError> {
        debug!(%action, target = %target, "Dispatching action");
        match action {
            Action::NewFolder => {
                let abs = self.resolve(&target)?;
                match host.fs().create_directory(&abs).await {
                    Ok(()) => {
                        info!(path = %abs.display(), "Created folder");
                        self.state = NavState::Browsing;
                        self.refresh(host).await;
                    }
                    Err(err) => report(host, &err),
                }
                Ok(Flow::Continue)
            }
            Action::NewFile => {
                let abs = self.resolve(&target)?;
                let result = host.open_untitled(&abs).await;
                Ok(close_or_report(host, result))
            }
            Action::OpenFile | Action::OpenFileBeside => {
                let placement = if action == Action::OpenFileBeside {
                    Placement::Beside
                } else {
                    Placement::Active
                };
                let abs = self.resolve(&target)?;
                let result = host.open_file(&abs, placement, None).await;
                Ok(close_or_report(host, result))
            }
            Action::RenameFile => {
                self.rename(host, target).await?;
                Ok(Flow::Continue)
            }
            Action::DeleteFile => {
                self.delete(host, target).await?;
                Ok(Flow::Continue)
            }
            Action::OpenFolder | Action::OpenFolderInNewWindow => {
                let abs = self.resolve(&target)?;
                let new_window = action == Action::OpenFolderInNewWindow;
                let result = host.open_folder(&abs, new_window).await;
                Ok(close_or_report(host, result))
            }
            Action::Pin => {
                self.toggle_pin(host, &target).await?;
                self.refresh(host).await;
                Ok(Flow::Continue)
            }
            Action::OpenPin => {
                let Some(pin) = pinned else {
                    return Ok(Flow::Continue);
                };
                let abs = PathBuf::from(&pin.path);
                if pin.kind.is_dir() {
                    self.path = self.context().to_nav_path(&abs);
                    self.state = NavState::Browsing;
                    self.focus = None;
                    host.picker().set_value("");
                    self.refresh(host).await;
                    Ok(Flow::Continue)
                } else {
                    let result = host.open_file(&abs, Placement::Active, None).await;
                    Ok(close_or_report(host, result))
                }
            }
            Action::FindFiles | Action::FindFilesContent => {
                let abs = self.resolve(&target)?;
                let dir = if host.fs().is_dir(&abs).await {
                    abs
                } else {
                    abs.parent().map(PathBuf::from).unwrap_or(abs)
                };
                let mode = if action == Action::FindFiles {
                    SearchMode::Names
                } else {
                    SearchMode::Content
                };
                Ok(Flow::Search(SearchRequest {
                    dirs: vec![dir],
                    mode,
                }))
            }
            Action::CopyPath => {
                let text = target.display_string(self.context());
                match host.write_clipboard(&text) {
                    Ok(()) => host.notify(Notice::info(format!("Copied {text}"))),
                    Err(err) => report(host, &err),
                }
                Ok(Flow::Continue)
            }
        }
    }

    /// Write the active document's contents to `target` and open it.
    pub(crate) async fn write_and_open<H: Host>(
        &mut self,
        host: &mut H,
        target: NavPath,
    ) -> Result<Flow, NavError> {
        let abs = self.resolve(&target)?;
        let contents = match self.active_document.clone() {
            Some(doc) if doc != abs => match host.fs().read_file(&doc).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    report(host, &err);
                    return Ok(Flow::Continue);
                }
            },
            _ => Vec::new(),
        };
        if let Err(err) = host.fs().write_file(&abs, &contents).await {
            report(host, &err);
            return Ok(Flow::Continue);
        }
        info!(path = %abs.display(), bytes = contents.len(), "Wrote file");
        let result = host.open_file(&abs, Placement::Active, None).await;
        Ok(close_or_report(host, result))
    }

    async fn toggle_pin<H: Host>(&mut self, host: &mut H, target: &NavPath) -> Result<(), NavError> {
        let abs = self.resolve(target)?;
        let kind = match host.fs().stat(&abs).await {
            Ok(Some(kind)) => kind,
            Ok(None) => EntryKind::File,
            Err(err) => {
                report(host, &err);
                return Ok(());
            }
        };
        let shown = target.render();
        let store = host.store();
        let mut pins: PinList = store.get_or(PINNED_KEY, PinList::new());
        let pinned = pins.toggle(PinnedItem::new(abs.display().to_string(), kind));
        match store.set(PINNED_KEY, &pins) {
            Ok(()) if pinned => host.notify(Notice::info(format!("Pinned {shown}"))),
            Ok(()) => host.notify(Notice::info(format!("Unpinned {shown}"))),
            Err(err) => report(host, &err),
        }
        Ok(())
    }

    /// Prompt for a new name and rename `target`.
    pub(crate) async fn rename<H: Host>(&mut self, host: &mut H, target: NavPath) -> Result<(), NavError> {
        let (Some(parent), Some(old_name)) = (target.parent(), target.name().map(str::to_string))
        else {
            return Err(NavError::precondition(format!(
                "cannot rename the root {}",
                target.render()
            )));
        };

        self.state = NavState::Renaming;
        host.picker().hide();

        let stem = old_name
            .rfind('.')
            .filter(|&i| i > 0)
            .unwrap_or(old_name.len());
        let answer = host
            .input_box(InputRequest {
                prompt: format!("Rename {old_name} to"),
                value: old_name.clone(),
                selection: 0..stem,
            })
            .await;

        let mut focus = Some(old_name.clone());
        if let Some(new_name) = answer.filter(|n| !n.trim().is_empty() && *n != old_name) {
            match self.apply_rename(host, &target, &parent, &new_name).await {
                Ok(()) => {
                    info!(from = %target, to = %new_name, "Renamed");
                    focus = new_name
                        .split('/')
                        .find(|s| !s.is_empty())
                        .map(str::to_string);
                }
                Err(err) => report(host, &err),
            }
        }

        self.finish_modal(host, &target, parent, focus).await;
        Ok(())
    }

    async fn apply_rename<H: Host>(
        &self,
        host: &mut H,
        target: &NavPath,
        parent: &NavPath,
        new_name: &str,
    ) -> Result<(), NavError> {
        validate_relative_name(new_name)?;
        let from = self.resolve(target)?;
        let to = self.resolve(&parent.join(new_name))?;
        host.fs().rename(&from, &to).await
    }

    /// Confirm and delete `target`, recursively for directories.
    pub(crate) async fn delete<H: Host>(&mut self, host: &mut H, target: NavPath) -> Result<(), NavError> {
        let (Some(parent), Some(name)) = (target.parent(), target.name().map(str::to_string)) else {
            return Err(NavError::precondition(format!(
                "cannot delete the root {}",
                target.render()
            )));
        };

        let abs = self.resolve(&target)?;
        self.state = NavState::Deleting;
        host.picker().hide();

        let recursive = host.fs().is_dir(&abs).await;
        let message = if recursive {
            format!("Delete '{name}' and all its contents?")
        } else {
            format!("Delete '{name}'?")
        };

        let mut focus = Some(name.clone());
        if host.choose(&message, &["Delete", "Cancel"]).await == Some(0) {
            match host.fs().delete(&abs, recursive).await {
                Ok(()) => {
                    info!(path = %abs.display(), recursive, "Deleted");
                    host.notify(Notice::info(format!("Deleted {name}")));
                    focus = None;
                }
                Err(err) => report(host, &err),
            }
        }

        self.finish_modal(host, &target, parent, focus).await;
        Ok(())
    }

    /// Return to browsing after a rename or delete prompt.
    async fn finish_modal<H: Host>(
        &mut self,
        host: &mut H,
        target: &NavPath,
        parent: NavPath,
        focus: Option<String>,
    ) {
        if self.path == *target {
            self.path = parent;
        }
        self.state = NavState::Browsing;
        self.focus = focus;
        let picker = host.picker();
        picker.set_value("");
        picker.show();
        self.refresh(host).await;
    }
}

/// Close the session on success, report and stay open on failure.
fn close_or_report<H: Host>(host: &mut H, result: Result<(), NavError>) -> Flow {
    match result {
        Ok(()) => Flow::Close,
        Err(err) => {
            report(host, &err);
            Flow::Continue
        }
    }
}
