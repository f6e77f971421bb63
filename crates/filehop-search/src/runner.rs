//! Process execution for search pipelines.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::command::{CommandSpec, Pipeline};
use crate::error::SearchError;

/// Most lines sent in one batch.
pub const MAX_BATCH_LINES: usize = 256;

/// Receives batches of output lines while a pipeline runs.
pub type LineSender = mpsc::UnboundedSender<Vec<String>>;

/// Runs a [`Pipeline`] in a directory, sending the last stage's stdout to
/// `lines` in batches as it is produced. Resolves once the pipeline exits.
///
/// A cancelled run resolves to [`SearchError::Cancelled`] and must not
/// leave processes behind.
pub trait ProcessRunner {
    fn run(
        &self,
        pipeline: Pipeline,
        cwd: PathBuf,
        lines: LineSender,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<(), SearchError>>;
}

/// Spawns real processes with tokio. Children are killed on drop, so
/// cancelling (which drops the in-flight wait) terminates them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

impl TokioRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for TokioRunner {
    fn run(
        &self,
        pipeline: Pipeline,
        cwd: PathBuf,
        lines: LineSender,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<(), SearchError>> {
        async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(SearchError::Cancelled),
                result = run_pipeline(pipeline, cwd, lines) => result,
            }
        }
        .boxed()
    }
}

fn spawn(spec: &CommandSpec, cwd: &Path, stdin: Stdio, last: bool) -> Result<Child, SearchError> {
    let program = which::which(&spec.program).map_err(|_| SearchError::ToolNotFound {
        program: spec.program.clone(),
    })?;
    Command::new(program)
        .args(&spec.args)
        .current_dir(cwd)
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(if last { Stdio::piped() } else { Stdio::null() })
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| SearchError::Spawn {
            program: spec.program.clone(),
            source,
        })
}

/// Exit status 1 means "no matches" for ripgrep-compatible tools.
fn is_success(status: ExitStatus) -> bool {
    status.success() || status.code() == Some(1)
}

fn not_captured(cwd: &Path, stream: &str) -> SearchError {
    SearchError::io(cwd, std::io::Error::other(format!("{stream} not captured")))
}

/// Forward `stdout` line by line. A batch is flushed once nothing more is
/// buffered, or when it reaches [`MAX_BATCH_LINES`].
async fn stream_lines<R: AsyncRead + Unpin>(
    stdout: R,
    lines: &LineSender,
) -> std::io::Result<usize> {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    let mut batch = Vec::new();
    let mut total = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        batch.push(line.trim_end_matches(['\n', '\r']).to_string());
        total += 1;

        if batch.len() >= MAX_BATCH_LINES || reader.buffer().is_empty() {
            if lines.send(std::mem::take(&mut batch)).is_err() {
                // Nobody is listening; drain so the process can exit.
                tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
                return Ok(total);
            }
        }
    }

    if !batch.is_empty() {
        let _ = lines.send(batch);
    }
    Ok(total)
}

async fn read_stderr<R: AsyncRead + Unpin>(stderr: Option<R>) -> String {
    let Some(mut stderr) = stderr else {
        return String::new();
    };
    let mut bytes = Vec::new();
    if let Err(err) = stderr.read_to_end(&mut bytes).await {
        debug!(error = %err, "Failed to read search stderr");
    }
    String::from_utf8_lossy(&bytes).trim().to_string()
}

async fn run_pipeline(
    pipeline: Pipeline,
    cwd: PathBuf,
    lines: LineSender,
) -> Result<(), SearchError> {
    let mut upstream: Vec<Child> = Vec::new();
    let mut stdin = Stdio::null();
    let last = pipeline.stages.len().saturating_sub(1);

    for (i, spec) in pipeline.stages.iter().enumerate() {
        debug!(program = %spec.program, args = ?spec.args, cwd = %cwd.display(), "Spawning search stage");
        let mut child = spawn(spec, &cwd, stdin, i == last)?;
        if i == last {
            let stdout = child.stdout.take().ok_or_else(|| not_captured(&cwd, "stdout"))?;
            let stderr = child.stderr.take();

            let (streamed, stderr) =
                tokio::join!(stream_lines(stdout, &lines), read_stderr(stderr));
            let total = streamed.map_err(|e| SearchError::io(&cwd, e))?;
            let status = child.wait().await.map_err(|e| SearchError::io(&cwd, e))?;

            for mut stage in upstream {
                let status = stage.wait().await.map_err(|e| SearchError::io(&cwd, e))?;
                if !is_success(status) {
                    warn!(status = %status, "Upstream search stage failed");
                }
            }

            if !is_success(status) {
                return Err(SearchError::Process {
                    dir: cwd,
                    status,
                    stderr,
                });
            }
            if !stderr.is_empty() {
                warn!(dir = %cwd.display(), %stderr, "Search tool reported warnings");
            }
            debug!(dir = %cwd.display(), lines = total, "Search stage finished");
            return Ok(());
        }

        let stdout = child.stdout.take().ok_or_else(|| not_captured(&cwd, "stdout"))?;
        stdin = stdout.try_into().map_err(|e| SearchError::io(&cwd, e))?;
        upstream.push(child);
    }

    Ok(())
}
