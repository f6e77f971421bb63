use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use filehop_core::{Action, Entry, NavError, NavPath, NavigatorConfig, PathContext, RootKind};
use filehop_ops::{LocalFs, MemoryStore};
use filehop_search::{SearchMode, TokioRunner};
use filehop_tui::navigator::SearchRequest;
use filehop_tui::{
    Command, Controller, Flow, Host, HostEvent, InputRequest, ItemIcon, NavState, Navigator,
    Notice, Picker, PickerButton, PickerItem, Placement,
};

/// Picker that records what the navigator asked it to show.
#[derive(Default)]
struct RecordingPicker {
    title: String,
    placeholder: String,
    items: Vec<PickerItem>,
    value: String,
    active: Option<usize>,
    buttons: Vec<PickerButton>,
    busy: bool,
    enabled: bool,
    visible: bool,
}

impl RecordingPicker {
    fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.label.as_str()).collect()
    }
}

impl Picker for RecordingPicker {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    fn set_items(&mut self, items: Vec<PickerItem>) {
        self.items = items;
        self.active = None;
    }

    fn items(&self) -> &[PickerItem] {
        &self.items
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn set_active(&mut self, index: Option<usize>) {
        self.active = index.filter(|&i| i < self.items.len());
    }

    fn active(&self) -> Option<usize> {
        self.active
    }

    fn set_buttons(&mut self, buttons: Vec<PickerButton>) {
        self.buttons = buttons;
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Host with scripted prompt answers over a real temp directory.
#[derive(Default)]
struct TestHost {
    picker: RecordingPicker,
    fs: LocalFs,
    store: MemoryStore,
    document: Option<PathBuf>,
    inputs: VecDeque<Option<String>>,
    choices: VecDeque<Option<usize>>,
    prompts: Vec<InputRequest>,
    notices: Vec<Notice>,
    clipboard: Option<String>,
    opened: Vec<PathBuf>,
    untitled: Vec<PathBuf>,
}

impl Host for TestHost {
    type Picker = RecordingPicker;
    type Fs = LocalFs;
    type Store = MemoryStore;

    fn picker(&mut self) -> &mut RecordingPicker {
        &mut self.picker
    }

    fn fs(&self) -> &LocalFs {
        &self.fs
    }

    fn store(&mut self) -> &mut MemoryStore {
        &mut self.store
    }

    fn active_document(&self) -> Option<PathBuf> {
        self.document.clone()
    }

    async fn next_event(&mut self) -> Option<HostEvent> {
        None
    }

    async fn input_box(&mut self, request: InputRequest) -> Option<String> {
        self.prompts.push(request);
        self.inputs.pop_front().flatten()
    }

    async fn choose(&mut self, _message: &str, _options: &[&str]) -> Option<usize> {
        self.choices.pop_front().flatten()
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn write_clipboard(&mut self, text: &str) -> Result<(), NavError> {
        self.clipboard = Some(text.to_string());
        Ok(())
    }

    async fn open_file(
        &mut self,
        path: &Path,
        _placement: Placement,
        _line: Option<u32>,
    ) -> Result<(), NavError> {
        self.opened.push(path.to_path_buf());
        Ok(())
    }

    async fn open_untitled(&mut self, path: &Path) -> Result<(), NavError> {
        self.untitled.push(path.to_path_buf());
        Ok(())
    }

    async fn open_folder(&mut self, path: &Path, _new_window: bool) -> Result<(), NavError> {
        self.opened.push(path.to_path_buf());
        Ok(())
    }
}

/// `a.txt`, `b.txt` and `sub/inner.txt`.
fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("inner.txt"), "").unwrap();
    dir
}

fn config() -> NavigatorConfig {
    NavigatorConfig {
        hide_ignored_files: false,
        ..Default::default()
    }
}

fn navigator(dir: &TempDir, write_mode: bool, document: Option<PathBuf>) -> Navigator {
    let ctx = PathContext::new(None, vec![dir.path().to_path_buf()]);
    Navigator::new(ctx, config(), NavPath::new(RootKind::Workspace), write_mode, document)
}

fn navigator_in(ctx: PathContext) -> Navigator {
    Navigator::new(ctx, config(), NavPath::new(RootKind::Workspace), false, None)
}

/// The folder holding `dir`, and `dir`'s own name.
fn parent_and_name(dir: &TempDir) -> (PathBuf, String) {
    let parent = dir.path().parent().unwrap().to_path_buf();
    let name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
    (parent, name)
}

fn focused_label(host: &TestHost) -> Option<String> {
    host.picker
        .active()
        .map(|i| host.picker.items[i].label.clone())
}

fn action_index(navigator: &Navigator, wanted: Action) -> Option<usize> {
    navigator
        .items()
        .iter()
        .position(|e| matches!(e, Entry::MenuAction { action, pinned: None } if *action == wanted))
}

#[tokio::test]
async fn test_start_lists_workspace() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);

    nav.start(&mut host, None).await.unwrap();

    assert_eq!(host.picker.labels(), vec!["a.txt", "b.txt", "sub"]);
    assert_eq!(host.picker.active(), None);
    assert_eq!(host.picker.title, "@");
    assert!(host.picker.visible);
    assert!(host.picker.enabled);
    assert!(!host.picker.busy);
    assert_eq!(host.picker.items[2].icon, ItemIcon::Folder);
}

#[tokio::test]
async fn test_typing_directory_with_separator_enters_it() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    nav.on_value_change(&mut host, "sub/".to_string()).await.unwrap();

    assert_eq!(nav.path().render(), "@/sub");
    assert_eq!(host.picker.value(), "");
    assert_eq!(host.picker.labels(), vec!["inner.txt"]);
}

#[tokio::test]
async fn test_typed_path_moves_then_keeps_remainder() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    nav.on_value_change(&mut host, "sub/inn".to_string()).await.unwrap();

    assert_eq!(nav.path().render(), "@/sub");
    assert_eq!(host.picker.value(), "inn");
    assert_eq!(host.picker.labels(), vec!["inn", "inner.txt"]);
    assert_eq!(host.picker.items[0].icon, ItemIcon::New);
}

#[tokio::test]
async fn test_exact_name_focuses_entry() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    nav.on_value_change(&mut host, "b.txt".to_string()).await.unwrap();

    assert_eq!(host.picker.labels(), vec!["a.txt", "b.txt", "sub"]);
    assert_eq!(host.picker.active(), Some(1));
}

#[tokio::test]
async fn test_unknown_name_creates_new_file() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    nav.on_value_change(&mut host, "newfile.txt".to_string())
        .await
        .unwrap();
    assert_eq!(host.picker.labels()[0], "newfile.txt");
    assert_eq!(host.picker.active(), Some(0));
    assert!(host.picker.items[0].always_show);

    let flow = nav.accept(&mut host).await.unwrap();
    assert_eq!(flow, Flow::Close);
    assert_eq!(host.untitled, vec![dir.path().join("newfile.txt")]);
}

#[tokio::test]
async fn test_invalid_new_name_is_reported() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    nav.on_value_change(&mut host, "draft.".to_string())
        .await
        .unwrap();
    assert_eq!(host.picker.labels()[0], "draft.");

    let flow = nav.accept(&mut host).await.unwrap();
    assert_eq!(flow, Flow::Continue);
    assert!(host.untitled.is_empty());
    assert_eq!(host.notices.len(), 1);
}

#[tokio::test]
async fn test_step_out_remembers_focus() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    host.picker.set_active(Some(2));
    nav.step_in(&mut host).await;
    assert_eq!(nav.path().render(), "@/sub");

    host.picker.set_active(Some(0));
    nav.step_out(&mut host).await;
    assert_eq!(nav.path().render(), "@");
    assert_eq!(host.picker.active(), Some(2));

    host.picker.set_active(Some(2));
    nav.step_in(&mut host).await;
    assert_eq!(host.picker.active(), Some(0));
}

#[tokio::test]
async fn test_step_out_of_workspace_reaches_its_parent() {
    let dir = workspace();
    let (parent, name) = parent_and_name(&dir);
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    nav.step_out(&mut host).await;

    assert_eq!(nav.path().root(), &RootKind::Filesystem);
    assert_eq!(nav.resolve(nav.path()).unwrap(), parent);
    assert_eq!(focused_label(&host), Some(name));
}

#[tokio::test]
async fn test_typed_parent_leaves_workspace() {
    let dir = workspace();
    let (parent, name) = parent_and_name(&dir);
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    nav.on_value_change(&mut host, "../".to_string()).await.unwrap();

    assert_eq!(nav.resolve(nav.path()).unwrap(), parent);
    assert_eq!(host.picker.value(), "");
    assert_eq!(focused_label(&host), Some(name));
}

#[tokio::test]
async fn test_typed_parent_inside_workspace() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();
    nav.on_value_change(&mut host, "sub/".to_string()).await.unwrap();

    nav.on_value_change(&mut host, "../".to_string()).await.unwrap();

    assert_eq!(nav.path().render(), "@");
    assert_eq!(host.picker.value(), "");
    assert_eq!(host.picker.labels(), vec!["a.txt", "b.txt", "sub"]);
    assert_eq!(focused_label(&host).as_deref(), Some("sub"));
}

#[tokio::test]
async fn test_home_shortcut() {
    let dir = workspace();
    let ctx = PathContext::new(Some(dir.path().join("sub")), vec![dir.path().to_path_buf()]);
    let mut host = TestHost::default();
    let mut nav = navigator_in(ctx);
    nav.start(&mut host, None).await.unwrap();

    nav.on_value_change(&mut host, "~/".to_string()).await.unwrap();

    assert_eq!(nav.path().render(), "~");
    assert_eq!(host.picker.value(), "");
    assert_eq!(host.picker.labels(), vec!["inner.txt"]);
}

#[tokio::test]
async fn test_workspace_shortcut() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();
    nav.on_value_change(&mut host, "sub/".to_string()).await.unwrap();

    nav.on_value_change(&mut host, "@/".to_string()).await.unwrap();

    assert_eq!(nav.path().render(), "@");
    assert_eq!(host.picker.value(), "");
    assert_eq!(host.picker.labels(), vec!["a.txt", "b.txt", "sub"]);
}

#[tokio::test]
async fn test_filesystem_root_shortcut() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    nav.on_value_change(&mut host, "/".to_string()).await.unwrap();

    assert_eq!(nav.path(), &NavPath::filesystem_root());
    assert_eq!(host.picker.value(), "");
    assert!(!host.picker.items.is_empty());
}

#[tokio::test]
async fn test_env_shortcut() {
    let dir = workspace();
    let ctx = PathContext::new(None, vec![dir.path().to_path_buf()])
        .with_env("FILEHOP_NAV_TEST", dir.path().join("sub"));
    let mut host = TestHost::default();
    let mut nav = navigator_in(ctx);
    nav.start(&mut host, None).await.unwrap();

    nav.on_value_change(&mut host, "$env:FILEHOP_NAV_TEST/".to_string())
        .await
        .unwrap();

    assert_eq!(nav.path().render(), "$env:FILEHOP_NAV_TEST");
    assert_eq!(host.picker.value(), "");
    assert_eq!(host.picker.labels(), vec!["inner.txt"]);
}

#[tokio::test]
async fn test_absolute_path_with_remainder() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    let typed = format!("{}/sub/inn", dir.path().display());
    nav.on_value_change(&mut host, typed).await.unwrap();

    assert_eq!(nav.resolve(nav.path()).unwrap(), dir.path().join("sub"));
    assert_eq!(host.picker.value(), "inn");
    assert_eq!(host.picker.labels(), vec!["inn", "inner.txt"]);
}

#[tokio::test]
async fn test_tab_cycles_then_descends_into_single_directory() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    nav.tab_complete(&mut host, true).await.unwrap();
    assert_eq!(host.picker.value(), "a.txt");
    assert_eq!(host.picker.active(), Some(0));

    nav.tab_complete(&mut host, true).await.unwrap();
    assert_eq!(host.picker.value(), "b.txt");

    nav.tab_complete(&mut host, false).await.unwrap();
    assert_eq!(host.picker.value(), "a.txt");

    nav.on_value_change(&mut host, "su".to_string()).await.unwrap();
    host.picker.set_value("su");
    nav.tab_complete(&mut host, true).await.unwrap();
    assert_eq!(nav.path().render(), "@/sub");
    assert_eq!(host.picker.value(), "");
}

#[tokio::test]
async fn test_pin_toggle_round_trip() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    host.picker.set_active(Some(0));
    nav.open_actions(&mut host).await;
    assert_eq!(nav.state(), NavState::ActionsMenu { pushed: true });
    assert_eq!(nav.path().render(), "@/a.txt");

    let pin = action_index(&nav, Action::Pin).unwrap();
    host.picker.set_active(Some(pin));
    assert_eq!(nav.accept(&mut host).await.unwrap(), Flow::Continue);

    assert!(host.picker.labels().contains(&"Unpin"));
    let pinned: Vec<_> = host
        .picker
        .items
        .iter()
        .filter(|i| i.icon == ItemIcon::Pin)
        .collect();
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned[0].label, "@/a.txt");

    let pin = action_index(&nav, Action::Pin).unwrap();
    host.picker.set_active(Some(pin));
    nav.accept(&mut host).await.unwrap();

    assert!(host.picker.labels().contains(&"Pin"));
    assert!(host.picker.items.iter().all(|i| i.icon != ItemIcon::Pin));
    assert_eq!(host.notices.len(), 2);
}

#[tokio::test]
async fn test_rename_focused_file() {
    let dir = workspace();
    let mut host = TestHost::default();
    host.inputs.push_back(Some("renamed.txt".to_string()));
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    host.picker.set_active(Some(0));
    nav.rename_current_or_focused(&mut host).await.unwrap();

    assert_eq!(host.prompts.len(), 1);
    assert_eq!(host.prompts[0].value, "a.txt");
    assert_eq!(host.prompts[0].selection, 0..1);
    assert!(dir.path().join("renamed.txt").exists());
    assert!(!dir.path().join("a.txt").exists());
    assert_eq!(nav.state(), NavState::Browsing);
    assert!(host.picker.visible);
    assert_eq!(host.picker.labels(), vec!["b.txt", "renamed.txt", "sub"]);
    assert_eq!(host.picker.active(), Some(1));
}

#[tokio::test]
async fn test_rename_cancelled_changes_nothing() {
    let dir = workspace();
    let mut host = TestHost::default();
    host.inputs.push_back(None);
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    host.picker.set_active(Some(1));
    nav.rename_current_or_focused(&mut host).await.unwrap();

    assert!(dir.path().join("b.txt").exists());
    assert_eq!(host.picker.active(), Some(1));
    assert!(host.notices.is_empty());
}

#[tokio::test]
async fn test_rename_root_is_a_precondition_error() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    let err = nav.rename_current_or_focused(&mut host).await.unwrap_err();
    assert!(err.is_fatal());
    assert!(host.prompts.is_empty());
}

#[tokio::test]
async fn test_delete_directory_from_actions() {
    let dir = workspace();
    let mut host = TestHost::default();
    host.choices.push_back(Some(0));
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    host.picker.set_active(Some(2));
    nav.open_actions(&mut host).await;
    assert_eq!(nav.path().render(), "@/sub");

    let delete = action_index(&nav, Action::DeleteFile).unwrap();
    host.picker.set_active(Some(delete));
    assert_eq!(nav.accept(&mut host).await.unwrap(), Flow::Continue);

    assert!(!dir.path().join("sub").exists());
    assert_eq!(nav.path().render(), "@");
    assert_eq!(nav.state(), NavState::Browsing);
    assert_eq!(host.picker.labels(), vec!["a.txt", "b.txt"]);
}

#[tokio::test]
async fn test_delete_under_unresolved_root_keeps_browsing() {
    let mut host = TestHost::default();
    host.picker.visible = true;
    let target = NavPath::parse("@/gone").unwrap();
    let mut nav = Navigator::new(PathContext::default(), config(), target.clone(), false, None);

    let err = nav
        .dispatch(&mut host, Action::DeleteFile, target, None)
        .await
        .unwrap_err();

    assert!(matches!(err, NavError::UnresolvedRoot { .. }));
    assert_eq!(nav.state(), NavState::Browsing);
    assert!(!nav.keep_alive());
    assert!(host.picker.visible);
}

#[tokio::test]
async fn test_find_files_from_file_menu_searches_parent() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    host.picker.set_active(Some(0));
    nav.open_actions(&mut host).await;
    let find = action_index(&nav, Action::FindFilesContent).unwrap();
    host.picker.set_active(Some(find));

    let flow = nav.accept(&mut host).await.unwrap();
    assert_eq!(
        flow,
        Flow::Search(SearchRequest {
            dirs: vec![dir.path().to_path_buf()],
            mode: SearchMode::Content,
        })
    );
}

#[tokio::test]
async fn test_copy_path_uses_display_form() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, false, None);
    nav.start(&mut host, None).await.unwrap();

    host.picker.set_active(Some(1));
    nav.open_actions(&mut host).await;
    let copy = action_index(&nav, Action::CopyPath).unwrap();
    host.picker.set_active(Some(copy));
    nav.accept(&mut host).await.unwrap();

    let copied = host.clipboard.unwrap();
    assert!(copied.ends_with("b.txt"));
}

#[tokio::test]
async fn test_write_mode_saves_copy_of_document() {
    let dir = workspace();
    let mut host = TestHost::default();
    let document = dir.path().join("a.txt");
    host.document = Some(document.clone());
    let mut nav = navigator(&dir, true, Some(document));
    nav.start(&mut host, None).await.unwrap();

    assert!(nav.is_write_mode());
    assert_eq!(host.picker.placeholder, "Type a file name to write to");
    assert_eq!(host.picker.labels()[0], "a.txt");
    assert_eq!(host.picker.items[0].icon, ItemIcon::New);

    nav.on_value_change(&mut host, "copy.txt".to_string())
        .await
        .unwrap();
    let flow = nav.accept(&mut host).await.unwrap();

    assert_eq!(flow, Flow::Close);
    assert_eq!(
        fs::read_to_string(dir.path().join("copy.txt")).unwrap(),
        "hello"
    );
    assert_eq!(host.opened, vec![dir.path().join("copy.txt")]);
}

#[tokio::test]
async fn test_missing_directory_offers_folder_creation_in_write_mode() {
    let dir = workspace();
    let mut host = TestHost::default();
    let mut nav = navigator(&dir, true, None);
    nav.start(&mut host, None).await.unwrap();

    nav.on_value_change(&mut host, "fresh/".to_string()).await.unwrap();
    assert_eq!(nav.path().render(), "@/fresh");
    let create = action_index(&nav, Action::NewFolder).unwrap();
    host.picker.set_active(Some(create));

    nav.accept(&mut host).await.unwrap();
    assert!(dir.path().join("fresh").is_dir());
    assert!(host.picker.items.is_empty());
}

#[tokio::test]
async fn test_controller_opens_and_quits() {
    let dir = workspace();
    let ctx = PathContext::new(None, vec![dir.path().to_path_buf()]);
    let mut controller = Controller::new(TestHost::default(), TokioRunner::new(), ctx, config());

    controller
        .execute(Command::OpenNavigator {
            query: Some("sub/".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(controller.current_path().unwrap().render(), "@/sub");
    assert_eq!(controller.current_input_value(), "");
    assert!(!controller.is_idle());
    assert!(controller.host().picker.buttons.is_empty());

    controller.execute(Command::Quit).await.unwrap();
    assert!(controller.is_idle());
    assert!(controller.navigator().is_none());
    assert!(!controller.host().picker.visible);
}
