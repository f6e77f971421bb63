use std::fs;

use tempfile::TempDir;

use filehop_core::{
    EntryFilter, EntryKind, NavigatorConfig, PINNED_KEY, PinList, PinnedItem,
};
use filehop_ops::{FileStore, FileSystem, KeyValueStore, LocalFs};

#[tokio::test]
async fn test_listing_flows_through_filter() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
    fs::write(dir.path().join("run.log"), "").unwrap();
    fs::write(dir.path().join("Cargo.toml"), "").unwrap();

    let members = LocalFs.read_directory(dir.path()).await.unwrap();
    let config = NavigatorConfig {
        hide_dotfiles: true,
        remove_ignored_files: true,
        ..Default::default()
    };
    let entries = EntryFilter::new(config).classify(dir.path(), members);
    let names: Vec<String> = entries.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["Cargo.toml", "src"]);
}

#[test]
fn test_pin_toggle_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    let item = PinnedItem::new("/work/project/src", EntryKind::Directory);

    {
        let mut store = FileStore::open(&path);
        let mut pins: PinList = store.get_or(PINNED_KEY, PinList::new());
        assert!(pins.toggle(item.clone()));
        store.set(PINNED_KEY, &pins).unwrap();
    }

    let mut store = FileStore::open(&path);
    let mut pins: PinList = store.get_or(PINNED_KEY, PinList::new());
    assert!(pins.contains(&item.path));

    assert!(!pins.toggle(item.clone()));
    store.set(PINNED_KEY, &pins).unwrap();
    let pins: PinList = FileStore::open(&path).get_or(PINNED_KEY, PinList::new());
    assert!(pins.is_empty());
}

#[tokio::test]
async fn test_is_dir_on_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, "").unwrap();
    assert!(!LocalFs.is_dir(&file).await);
    assert!(LocalFs.is_dir(dir.path()).await);
}
