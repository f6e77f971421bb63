//! One search invocation: debounced generations over a set of directories.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{Pipeline, SearchMode};
use crate::debounce::Debouncer;
use crate::error::SearchError;
use crate::parse::{SearchHit, parse_lines};
use crate::query::{has_pattern, tokenize};
use crate::runner::ProcessRunner;
use crate::scrollback::Scrollback;

#[derive(Debug)]
enum Update {
    Lines(Vec<String>),
    Done(Result<(), SearchError>),
}

/// Output or end of one directory's run, tagged with its generation.
#[derive(Debug)]
struct DirectoryOutcome {
    generation: u64,
    dir: PathBuf,
    update: Update,
}

/// Progress of the current generation, reported to the caller.
#[derive(Debug)]
pub enum SearchEvent {
    /// A directory produced output; `added` hits were appended to the
    /// results.
    Results { dir: PathBuf, added: usize },
    /// A directory's run ended without error.
    Finished { dir: PathBuf },
    /// A directory failed. Other directories are unaffected.
    Failed { dir: PathBuf, error: SearchError },
}

/// Owns the in-flight processes of one search invocation.
///
/// At most one generation is live. Launching a generation cancels the
/// previous one first, and outcomes from older generations are dropped.
/// Dropping the session cancels whatever is still running.
pub struct SearchSession<R> {
    runner: R,
    tool: String,
    dirs: Vec<PathBuf>,
    mode: SearchMode,
    scrollback: Scrollback,
    debouncer: Debouncer<String>,
    generation: u64,
    cancel: Option<CancellationToken>,
    pending: usize,
    query: String,
    results: Vec<SearchHit>,
    tx: mpsc::UnboundedSender<DirectoryOutcome>,
    rx: mpsc::UnboundedReceiver<DirectoryOutcome>,
}

impl<R: ProcessRunner> SearchSession<R> {
    /// Create a session searching `dirs` with `tool`.
    pub fn new(runner: R, tool: impl Into<String>, dirs: Vec<PathBuf>, mode: SearchMode) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runner,
            tool: tool.into(),
            dirs,
            mode,
            scrollback: Scrollback::new(),
            debouncer: Debouncer::default(),
            generation: 0,
            cancel: None,
            pending: 0,
            query: String::new(),
            results: Vec::new(),
            tx,
            rx,
        }
    }

    /// Start with previously accepted queries.
    pub fn with_scrollback(mut self, scrollback: Scrollback) -> Self {
        self.scrollback = scrollback;
        self
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Query of the current generation.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Hits gathered so far for the current generation.
    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    /// Hand the scrollback back when the session ends.
    pub fn take_scrollback(&mut self) -> Scrollback {
        std::mem::take(&mut self.scrollback)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check if directories of the current generation are still running.
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    /// Feed a new input value. Non-empty values start a generation once
    /// the input has been quiet for the debounce window; an empty value
    /// stops the current one.
    pub fn on_input(&mut self, value: &str) {
        if value.trim().is_empty() {
            self.debouncer.clear();
            self.stop();
            self.query.clear();
            self.results.clear();
        } else {
            self.debouncer.push(value.to_string());
        }
    }

    /// When a debounced value becomes ready.
    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Launch the debounced value if its window elapsed. Returns `true`
    /// when a generation started.
    pub fn poll_debounce(&mut self) -> bool {
        match self.debouncer.take_ready() {
            Some(query) => {
                self.launch(&query);
                true
            }
            None => false,
        }
    }

    /// Start a new generation for `query` right away.
    pub fn launch(&mut self, query: &str) {
        self.stop();
        self.generation += 1;
        self.query = query.to_string();
        self.results.clear();

        let argv = tokenize(query);
        if !has_pattern(&argv) {
            debug!(query, "Query has no pattern, not searching");
            return;
        }

        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        self.pending = self.dirs.len();
        info!(generation = self.generation, mode = %self.mode, dirs = self.dirs.len(), "Starting search");

        for dir in &self.dirs {
            let pipeline = Pipeline::for_mode(self.mode, &self.tool, &argv);
            let (lines_tx, mut lines_rx) = mpsc::unbounded_channel();
            let run = self.runner.run(pipeline, dir.clone(), lines_tx, token.clone());
            let tx = self.tx.clone();
            let generation = self.generation;
            let dir = dir.clone();
            tokio::spawn(async move {
                // Send failures mean the session is gone; nobody is waiting then.
                let forward = async {
                    while let Some(lines) = lines_rx.recv().await {
                        let _ = tx.send(DirectoryOutcome {
                            generation,
                            dir: dir.clone(),
                            update: Update::Lines(lines),
                        });
                    }
                };
                let (result, ()) = tokio::join!(run, forward);
                let _ = tx.send(DirectoryOutcome {
                    generation,
                    dir,
                    update: Update::Done(result),
                });
            });
        }
    }

    /// Flip between name and content search and rerun the current query.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        debug!(mode = %self.mode, "Search mode toggled");
        self.relaunch();
    }

    /// Replace the searched directories and rerun the current query.
    pub fn set_dirs(&mut self, dirs: Vec<PathBuf>) {
        self.dirs = dirs;
        self.relaunch();
    }

    fn relaunch(&mut self) {
        if !self.query.is_empty() {
            let query = self.query.clone();
            self.launch(&query);
        }
    }

    /// Remember an accepted query.
    pub fn record(&mut self, query: &str) {
        self.scrollback.record(query);
    }

    /// Wait for the next output or outcome of the current generation and
    /// fold it into the results. Stale updates are discarded.
    ///
    /// Cancel-safe: all state changes happen after the channel yields.
    pub async fn next_event(&mut self) -> Option<SearchEvent> {
        loop {
            let outcome = self.rx.recv().await?;
            if outcome.generation != self.generation || self.pending == 0 {
                debug!(generation = outcome.generation, "Dropping stale search output");
                continue;
            }
            let dir = outcome.dir;
            return Some(match outcome.update {
                Update::Lines(lines) => {
                    let hits = parse_lines(self.mode, &dir, lines.iter().map(String::as_str));
                    let added = hits.len();
                    self.results.extend(hits);
                    SearchEvent::Results { dir, added }
                }
                Update::Done(Ok(())) => {
                    self.pending -= 1;
                    SearchEvent::Finished { dir }
                }
                Update::Done(Err(error)) => {
                    self.pending -= 1;
                    warn!(dir = %dir.display(), %error, "Search failed");
                    SearchEvent::Failed { dir, error }
                }
            });
        }
    }

    fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.pending = 0;
    }

    /// Cancel everything in flight and drop pending input.
    pub fn dispose(&mut self) {
        self.debouncer.clear();
        self.stop();
    }
}

impl<R> Drop for SearchSession<R> {
    fn drop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use futures::FutureExt;
    use futures::future::BoxFuture;

    use super::*;
    use crate::runner::LineSender;

    /// Records every run. Output from a per-directory table is sent right
    /// away; the run then ends after a fixed delay, unless cancelled first.
    #[derive(Clone, Default)]
    struct FakeRunner {
        runs: Arc<Mutex<Vec<(Pipeline, PathBuf, CancellationToken)>>>,
        answers: Arc<Mutex<HashMap<PathBuf, Result<String, String>>>>,
    }

    impl FakeRunner {
        fn answer(&self, dir: &str, output: Result<&str, &str>) {
            self.answers.lock().unwrap().insert(
                PathBuf::from(dir),
                output.map(String::from).map_err(String::from),
            );
        }

        fn runs(&self) -> Vec<(Pipeline, PathBuf, CancellationToken)> {
            self.runs.lock().unwrap().clone()
        }
    }

    impl ProcessRunner for FakeRunner {
        fn run(
            &self,
            pipeline: Pipeline,
            cwd: PathBuf,
            lines: LineSender,
            cancel: CancellationToken,
        ) -> BoxFuture<'static, Result<(), SearchError>> {
            self.runs
                .lock()
                .unwrap()
                .push((pipeline, cwd.clone(), cancel.clone()));
            let answer = self.answers.lock().unwrap().get(&cwd).cloned();
            async move {
                if let Some(Ok(out)) = &answer {
                    let _ = lines.send(out.lines().map(String::from).collect());
                }
                tokio::select! {
                    _ = cancel.cancelled() => Err(SearchError::Cancelled),
                    _ = tokio::time::sleep(Duration::from_millis(10)) => match answer {
                        Some(Err(msg)) => Err(SearchError::io(cwd, std::io::Error::other(msg))),
                        _ => Ok(()),
                    },
                }
            }
            .boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_produces_one_generation() {
        let runner = FakeRunner::default();
        let mut session =
            SearchSession::new(runner.clone(), "rg", vec![PathBuf::from("/a")], SearchMode::Content);

        for value in ["f", "fo", "foo"] {
            session.on_input(value);
            tokio::time::advance(Duration::from_millis(20)).await;
            assert!(!session.poll_debounce());
        }
        tokio::time::sleep_until(session.deadline().unwrap()).await;
        assert!(session.poll_debounce());

        let runs = runner.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(session.query(), "foo");
        assert_eq!(session.generation(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_generation_cancels_previous() {
        let runner = FakeRunner::default();
        runner.answer("/a", Ok("x.rs:1:old\n"));
        let mut session =
            SearchSession::new(runner.clone(), "rg", vec![PathBuf::from("/a")], SearchMode::Content);

        session.launch("old");
        session.launch("new");

        let runs = runner.runs();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].2.is_cancelled());
        assert!(!runs[1].2.is_cancelled());

        // Only the live generation reports.
        let event = session.next_event().await.unwrap();
        assert!(matches!(event, SearchEvent::Results { added: 1, .. }));
        assert_eq!(session.results()[0].description.as_deref(), Some("old"));
        let event = session.next_event().await.unwrap();
        assert!(matches!(event, SearchEvent::Finished { .. }));
        assert_eq!(session.generation(), 2);
        assert_eq!(session.results().len(), 1);
        assert!(!session.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_arrive_while_running() {
        let runner = FakeRunner::default();
        runner.answer("/a", Ok("a.rs:1:one\nb.rs:2:two\n"));
        let mut session =
            SearchSession::new(runner, "rg", vec![PathBuf::from("/a")], SearchMode::Content);

        session.launch("one");
        let event = session.next_event().await.unwrap();
        assert!(matches!(event, SearchEvent::Results { added: 2, .. }));
        assert!(session.is_busy());
        assert_eq!(session.results().len(), 2);

        let event = session.next_event().await.unwrap();
        assert!(matches!(event, SearchEvent::Finished { .. }));
        assert!(!session.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flags_only_query_does_not_search() {
        let runner = FakeRunner::default();
        let mut session =
            SearchSession::new(runner.clone(), "rg", vec![PathBuf::from("/a")], SearchMode::Content);

        session.launch("--hidden");

        assert!(runner.runs().is_empty());
        assert!(!session.is_busy());
        assert_eq!(session.query(), "--hidden");
        assert!(session.results().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_directory_does_not_hide_others() {
        let runner = FakeRunner::default();
        runner.answer("/ok", Ok("src/x.ts:12:foo bar baz\n"));
        runner.answer("/bad", Err("permission denied"));
        let mut session = SearchSession::new(
            runner,
            "rg",
            vec![PathBuf::from("/ok"), PathBuf::from("/bad")],
            SearchMode::Content,
        );

        session.launch("-i foo bar");
        let mut failures = Vec::new();
        while session.is_busy() {
            match session.next_event().await.unwrap() {
                SearchEvent::Failed { dir, .. } => failures.push(dir),
                SearchEvent::Results { .. } | SearchEvent::Finished { .. } => {}
            }
        }

        assert_eq!(failures, vec![PathBuf::from("/bad")]);
        let hits = session.results();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].num, Some(12));
        assert_eq!(hits[0].target_line(), Some(11));
        assert!(hits[0].detail.ends_with("src/x.ts"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_mode_reruns_query() {
        let runner = FakeRunner::default();
        let mut session =
            SearchSession::new(runner.clone(), "rg", vec![PathBuf::from("/a")], SearchMode::Names);

        session.toggle_mode();
        assert!(runner.runs().is_empty());

        session.launch("main");
        session.toggle_mode();
        let runs = runner.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].0.stages.len(), 2);
        assert_eq!(runs[1].0.stages.len(), 1);
        assert!(runs[0].2.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_stops_search() {
        let runner = FakeRunner::default();
        let mut session =
            SearchSession::new(runner.clone(), "rg", vec![PathBuf::from("/a")], SearchMode::Names);

        session.launch("x");
        session.on_input("");
        assert!(!session.is_busy());
        assert!(runner.runs()[0].2.is_cancelled());
        assert!(session.deadline().is_none());
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let runner = FakeRunner::default();
        let mut session =
            SearchSession::new(runner.clone(), "rg", vec![PathBuf::from("/a")], SearchMode::Names);
        session.launch("x");
        drop(session);
        assert!(runner.runs()[0].2.is_cancelled());
    }
}
