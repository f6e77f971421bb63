//! filehop - keystroke-driven file navigation for the terminal.
//!
//! Usage:
//!   hop [PATH]               Browse from PATH (a folder, or a file to work on)
//!   hop --write FILE         Save a copy of FILE under a typed name
//!   hop --find [QUERY]       Search file names
//!   hop --grep [QUERY]       Search file contents
//!   hop --help               Show help

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use filehop_core::PathContext;
use filehop_search::SearchMode;
use filehop_tui::{Command, RunOptions, UserSettings};

#[derive(Parser)]
#[command(
    name = "filehop",
    version,
    about = "Keystroke-driven filesystem navigator",
    long_about = "filehop walks directories as you type.\n\n\
                  Type a name to focus it, end it with `/` to enter it, start with \
                  `~/`, `@/` or `/` to jump to home, the workspace or the root. \
                  Press F1 inside the picker for all key bindings."
)]
struct Cli {
    /// Folder to start in, or file to work on (defaults to the workspace)
    path: Option<PathBuf>,

    /// Save a copy of PATH under a name typed in the navigator
    #[arg(short, long, requires = "path")]
    write: bool,

    /// Search file names, optionally starting with QUERY
    #[arg(short, long, value_name = "QUERY", num_args = 0..=1, default_missing_value = "")]
    find: Option<String>,

    /// Search file contents, optionally starting with QUERY
    #[arg(short, long, value_name = "QUERY", num_args = 0..=1, default_missing_value = "",
          conflicts_with = "find")]
    grep: Option<String>,

    /// Workspace folder; `@/` resolves to the first one (repeatable)
    #[arg(long = "workspace", value_name = "DIR")]
    workspaces: Vec<PathBuf>,

    /// Hide entries whose names start with a dot
    #[arg(long)]
    hide_dotfiles: bool,

    /// Show entries matched by ignore files without dimming them
    #[arg(long)]
    no_ignore: bool,

    /// Search tool to run (ripgrep-compatible)
    #[arg(long, value_name = "TOOL")]
    search_tool: Option<String>,

    /// Log file (defaults to the cache directory)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let _guard = init_logging(cli.log_file.clone(), cli.verbose)?;

    let mut settings = UserSettings::load();
    if cli.hide_dotfiles {
        settings.navigator.hide_dotfiles = true;
    }
    if cli.no_ignore {
        settings.navigator.hide_ignored_files = false;
    }
    if let Some(tool) = cli.search_tool.clone() {
        settings.navigator.search_tool = tool;
    }

    let cwd = std::env::current_dir().context("Cannot read the current directory")?;
    let target = match &cli.path {
        Some(path) => Some(absolute(&cwd, path)),
        None => None,
    };
    let (document, start_dir) = match target {
        Some(path) if path.is_dir() => (None, Some(path)),
        Some(path) => (Some(path), None),
        None => (None, None),
    };

    let workspaces = if cli.workspaces.is_empty() {
        let base = start_dir
            .as_deref()
            .or_else(|| document.as_deref().and_then(Path::parent))
            .unwrap_or(&cwd);
        vec![find_workspace(base).unwrap_or_else(|| base.to_path_buf())]
    } else {
        cli.workspaces.iter().map(|w| absolute(&cwd, w)).collect()
    };
    info!(?workspaces, ?document, "Starting filehop");

    let ctx = PathContext::new(dirs::home_dir(), workspaces);
    let start = start_commands(&cli, &ctx, start_dir.as_deref());
    debug!(?start, "Start commands");

    filehop_tui::run(RunOptions {
        settings,
        ctx,
        document,
        start,
    })
}

/// Entry points that reproduce the command line.
fn start_commands(cli: &Cli, ctx: &PathContext, start_dir: Option<&Path>) -> Vec<Command> {
    let mut commands = Vec::new();

    let query = start_dir.map(|dir| {
        let mut rendered = ctx.to_nav_path(dir).render();
        if !rendered.ends_with('/') {
            rendered.push('/');
        }
        rendered
    });

    if cli.write {
        commands.push(Command::OpenNavigatorWriteMode);
    } else if query.is_some() || (cli.find.is_none() && cli.grep.is_none()) {
        commands.push(Command::OpenNavigator { query });
    }

    let search = match (&cli.find, &cli.grep) {
        (Some(query), _) => Some((SearchMode::Names, query)),
        (None, Some(query)) => Some((SearchMode::Content, query)),
        (None, None) => None,
    };
    if let Some((mode, query)) = search {
        commands.push(Command::InvokeSearch {
            query: Some(query.clone()).filter(|q| !q.is_empty()),
            mode,
        });
    }

    commands
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Nearest ancestor of `dir` holding a `.git` entry.
fn find_workspace(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .find(|ancestor| ancestor.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Send logs to a file; the terminal belongs to the picker.
///
/// Filter priority: `FILEHOP_LOG`, then `RUST_LOG`, then `--verbose`.
fn init_logging(log_file: Option<PathBuf>, verbose: bool) -> Result<WorkerGuard> {
    let path = log_file
        .or_else(|| dirs::cache_dir().map(|d| d.join("filehop").join("filehop.log")))
        .unwrap_or_else(|| std::env::temp_dir().join("filehop.log"));
    let dir = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "filehop.log".into());

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = std::env::var("FILEHOP_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| {
            EnvFilter::new(if verbose {
                "warn,filehop=debug"
            } else {
                "warn,filehop=info"
            })
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("hop").chain(args.iter().copied()))
    }

    #[test]
    fn test_default_opens_navigator() {
        let ctx = PathContext::new(None, vec![PathBuf::from("/work")]);
        let commands = start_commands(&cli(&[]), &ctx, None);
        assert_eq!(commands, vec![Command::OpenNavigator { query: None }]);
    }

    #[test]
    fn test_start_dir_becomes_typed_path() {
        let ctx = PathContext::new(None, vec![PathBuf::from("/work")]);
        let commands = start_commands(&cli(&[]), &ctx, Some(Path::new("/work/src")));
        assert_eq!(
            commands,
            vec![Command::OpenNavigator {
                query: Some("@/src/".to_string())
            }]
        );
    }

    #[test]
    fn test_find_without_query() {
        let ctx = PathContext::new(None, Vec::new());
        let commands = start_commands(&cli(&["--find"]), &ctx, None);
        assert_eq!(
            commands,
            vec![Command::InvokeSearch {
                query: None,
                mode: SearchMode::Names
            }]
        );
    }

    #[test]
    fn test_grep_with_query_in_folder() {
        let ctx = PathContext::new(None, vec![PathBuf::from("/work")]);
        let commands = start_commands(&cli(&["--grep", "todo"]), &ctx, Some(Path::new("/work")));
        assert_eq!(
            commands,
            vec![
                Command::OpenNavigator {
                    query: Some("@/".to_string())
                },
                Command::InvokeSearch {
                    query: Some("todo".to_string()),
                    mode: SearchMode::Content
                },
            ]
        );
    }

    #[test]
    fn test_find_workspace_walks_up() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_workspace(&nested), Some(dir.path().to_path_buf()));
    }
}
