//! Launching editors and the system opener.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

/// Known text/code file extensions that should be opened with an editor.
const TEXT_EXTENSIONS: &[&str] = &[
    // Programming languages
    "rs", "py", "js", "ts", "jsx", "tsx", "go", "c", "cpp", "h", "hpp",
    "java", "kt", "swift", "rb", "php", "cs", "fs", "scala", "clj",
    "hs", "ml", "elm", "ex", "exs", "erl", "lua", "r", "jl", "nim",
    "zig", "v", "d", "pl", "pm", "tcl", "awk", "sed",
    // Web
    "html", "htm", "css", "scss", "sass", "less", "vue", "svelte",
    // Config/Data
    "json", "yaml", "yml", "toml", "xml", "ini", "conf", "cfg", "lock", "env",
    // Shell/Scripts
    "sh", "bash", "zsh", "fish", "ps1", "bat", "cmd",
    // Documentation
    "md", "markdown", "txt", "rst", "adoc", "org", "tex", "bib",
    // Other
    "sql", "graphql", "proto", "dockerfile", "makefile", "cmake",
    "gitignore", "gitattributes", "editorconfig", "log", "csv", "diff", "patch",
];

/// Editor used when neither settings nor environment name one.
const FALLBACK_EDITOR: &str = "vi";

/// Result of attempting to open something.
#[derive(Debug)]
pub enum OpenResult {
    /// Handed to a detached application.
    Opened,
    /// A terminal program that needs the terminal while it runs.
    NeedsSuspend(Command),
    Error(String),
}

/// Decide how to open a file.
///
/// Text files, extensionless files, files that do not exist yet and any
/// request with a line number go to the editor; everything else goes to the
/// system opener. `line` is 0-based.
pub fn open_file(path: &Path, line: Option<u32>, config: &opensesame::EditorConfig) -> OpenResult {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase);

    let use_editor = line.is_some()
        || !path.exists()
        || match extension.as_deref() {
            None => true,
            Some(ext) => is_text_extension(ext),
        };

    if use_editor {
        open_with_editor(path, line, config)
    } else {
        open_with_system(path)
    }
}

/// Open a folder with the system opener.
pub fn open_folder(path: &Path) -> OpenResult {
    open_with_system(path)
}

fn is_text_extension(ext: &str) -> bool {
    TEXT_EXTENSIONS.contains(&ext)
}

/// The editor command line.
///
/// Resolution order:
/// 1. User config editor (from settings)
/// 2. $VISUAL environment variable
/// 3. $EDITOR environment variable
/// 4. Fallback to vi
pub fn editor_command(config: &opensesame::EditorConfig) -> String {
    config
        .editor
        .clone()
        .filter(|e| !e.trim().is_empty())
        .or_else(|| std::env::var("VISUAL").ok().filter(|e| !e.trim().is_empty()))
        .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

fn open_with_editor(path: &Path, line: Option<u32>, config: &opensesame::EditorConfig) -> OpenResult {
    let editor = editor_command(config);
    let mut words = editor.split_whitespace();
    let Some(program) = words.next() else {
        return OpenResult::Error("No editor configured".to_string());
    };
    if which::which(program).is_err() {
        return OpenResult::Error(format!("Editor '{program}' not found"));
    }

    let mut cmd = Command::new(program);
    cmd.args(words);
    if let Some(line) = line {
        cmd.arg(format!("+{}", line + 1));
    }
    cmd.arg(path);

    // Inherit stdio for terminal editors
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    OpenResult::NeedsSuspend(cmd)
}

fn open_with_system(path: &Path) -> OpenResult {
    match open::that(path) {
        Ok(()) => OpenResult::Opened,
        Err(e) => OpenResult::Error(format!("Failed to open {}: {e}", path.display())),
    }
}
