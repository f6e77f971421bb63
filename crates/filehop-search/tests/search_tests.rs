use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use filehop_search::{SearchError, SearchEvent, SearchMode, SearchSession, TokioRunner};

async fn drain(session: &mut SearchSession<TokioRunner>) -> Vec<SearchEvent> {
    let mut events = Vec::new();
    while session.is_busy() {
        match session.next_event().await {
            Some(event) => events.push(event),
            None => break,
        }
    }
    events
}

#[tokio::test]
async fn test_missing_tool_fails_each_directory() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    let mut session = SearchSession::new(
        TokioRunner::new(),
        "filehop-no-such-search-tool",
        vec![a.path().to_path_buf(), b.path().to_path_buf()],
        SearchMode::Content,
    );

    session.launch("needle");
    let events = drain(&mut session).await;

    assert_eq!(events.len(), 2);
    for event in events {
        match event {
            SearchEvent::Failed { error, .. } => {
                assert!(matches!(error, SearchError::ToolNotFound { .. }))
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
    assert!(session.results().is_empty());
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/x.ts"), "one\ntwo\nFoo bar baz\n").unwrap();
    fs::write(dir.path().join("notes.md"), "nothing here\n").unwrap();
    dir
}

#[tokio::test]
#[ignore = "needs rg"]
async fn test_content_search_with_ripgrep() {
    let dir = fixture();
    let mut session = SearchSession::new(
        TokioRunner::new(),
        "rg",
        vec![dir.path().to_path_buf()],
        SearchMode::Content,
    );

    session.launch("foo bar");
    drain(&mut session).await;

    let hits = session.results();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].num, Some(3));
    assert_eq!(hits[0].target_line(), Some(2));
    assert_eq!(hits[0].path, dir.path().join("src").join("x.ts"));
}

#[tokio::test]
#[ignore = "needs rg"]
async fn test_name_search_with_ripgrep() {
    let dir = fixture();
    let mut session = SearchSession::new(
        TokioRunner::new(),
        "rg",
        vec![dir.path().to_path_buf()],
        SearchMode::Names,
    );

    session.launch("NOTES");
    drain(&mut session).await;

    let labels: Vec<&str> = session.results().iter().map(|h| h.label.as_str()).collect();
    assert_eq!(labels, vec!["notes.md"]);
}

#[tokio::test]
#[ignore = "needs rg"]
async fn test_no_match_is_not_a_failure() {
    let dir = fixture();
    let mut session = SearchSession::new(
        TokioRunner::new(),
        "rg",
        vec![PathBuf::from(dir.path())],
        SearchMode::Content,
    );

    session.launch("zzz-absent");
    let events = drain(&mut session).await;
    assert!(matches!(events[..], [SearchEvent::Finished { .. }]));
    assert!(session.results().is_empty());
}
