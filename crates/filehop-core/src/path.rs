//! Navigation paths anchored to a root kind.
//!
//! A [`NavPath`] is a list of segments below a [`RootKind`]. The root is kept
//! symbolic (`~`, `@`, `$env:NAME`) so the path renders the way the user typed
//! it, and is only turned into a real filesystem location through a
//! [`PathContext`].

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf, Prefix};

use serde::{Deserialize, Serialize};

use crate::error::NavError;

/// Prefix that introduces an environment variable root.
const ENV_PREFIX: &str = "$env:";

/// The anchor a [`NavPath`] is interpreted relative to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RootKind {
    /// The filesystem root, `/`.
    Filesystem,
    /// A drive root such as `C:/`.
    Drive(char),
    /// The user's home directory, `~`.
    Home,
    /// The first workspace folder, `@`.
    Workspace,
    /// The value of an environment variable, `$env:NAME`.
    Env(String),
}

impl RootKind {
    /// Render the root prefix without a trailing separator.
    fn prefix(&self) -> String {
        match self {
            Self::Filesystem => String::new(),
            Self::Drive(letter) => format!("{letter}:"),
            Self::Home => "~".to_string(),
            Self::Workspace => "@".to_string(),
            Self::Env(name) => format!("{ENV_PREFIX}{name}"),
        }
    }
}

/// A filesystem location as a root plus ordered segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavPath {
    root: RootKind,
    segments: Vec<String>,
}

impl NavPath {
    /// Create a path pointing at a root.
    pub fn new(root: RootKind) -> Self {
        Self {
            root,
            segments: Vec::new(),
        }
    }

    /// The filesystem root, `/`.
    pub fn filesystem_root() -> Self {
        Self::new(RootKind::Filesystem)
    }

    /// Build a path from an absolute filesystem location.
    ///
    /// `..` components are folded, `.` components are dropped. Relative
    /// input is anchored at the filesystem root.
    pub fn from_absolute(path: &Path) -> Self {
        let mut nav = Self::filesystem_root();
        for component in path.components() {
            match component {
                Component::Prefix(prefix) => match prefix.kind() {
                    Prefix::Disk(letter) | Prefix::VerbatimDisk(letter) => {
                        nav = Self::new(RootKind::Drive(char::from(letter)));
                    }
                    _ => {}
                },
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir => {
                    nav.pop();
                }
                Component::Normal(name) => nav.push(&name.to_string_lossy()),
            }
        }
        nav
    }

    /// Parse user input that starts with a root prefix.
    ///
    /// Recognized prefixes: `/`, `X:` / `X:/`, `~`, `@` and `$env:NAME`.
    /// Backslashes are treated as separators. Returns `None` for relative
    /// input, which callers resolve against the current directory instead.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.replace('\\', "/");
        let (root, rest) = split_root(&text)?;
        let mut path = Self::new(root);
        path.append(rest);
        Some(path)
    }

    /// The root this path is anchored to.
    pub fn root(&self) -> &RootKind {
        &self.root
    }

    /// The segments below the root.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, if any.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Append a single segment.
    pub fn push(&mut self, name: &str) {
        if !name.is_empty() {
            self.segments.push(name.to_string());
        }
    }

    /// Remove and return the last segment. Returns `None` at the root and
    /// leaves the path unchanged.
    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Append a relative path (`a/b`, `../c`). `..` steps out but never past
    /// the root.
    pub fn append(&mut self, relative: &str) {
        for part in relative.split(['/', '\\']) {
            match part {
                "" | "." => {}
                ".." => {
                    self.pop();
                }
                name => self.push(name),
            }
        }
    }

    /// A copy of this path with a relative path appended.
    pub fn join(&self, relative: &str) -> Self {
        let mut path = self.clone();
        path.append(relative);
        path
    }

    /// The containing path, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let mut parent = self.clone();
        parent.pop().map(|_| parent)
    }

    /// Remove the last segment, stepping above a symbolic root when the path
    /// is already at it: `@` becomes the workspace folder's parent,
    /// expressed again through [`PathContext::to_nav_path`]. Returns `None`
    /// only at the filesystem or a drive root, or when the root does not
    /// resolve.
    pub fn pop_across_root(&mut self, ctx: &PathContext) -> Option<String> {
        if !self.at_top() {
            return self.pop();
        }
        let resolved = self.resolve(ctx).ok()?;
        let name = resolved.file_name()?.to_string_lossy().into_owned();
        let parent = resolved.parent().filter(|p| !p.as_os_str().is_empty())?;
        *self = ctx.to_nav_path(parent);
        Some(name)
    }

    /// Like [`join`](Self::join), except that `..` steps above symbolic
    /// roots the way [`pop_across_root`](Self::pop_across_root) does.
    pub fn join_across_root(&self, relative: &str, ctx: &PathContext) -> Self {
        let mut path = self.clone();
        for part in relative.split(['/', '\\']) {
            match part {
                "" | "." => {}
                ".." => {
                    path.pop_across_root(ctx);
                }
                name => path.push(name),
            }
        }
        path
    }

    /// Whether no further [`pop`](Self::pop) is possible.
    pub fn at_top(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render the path in its symbolic form. Parsing the result with
    /// [`parse`](Self::parse) yields an equal path.
    pub fn render(&self) -> String {
        let mut out = self.root.prefix();
        if self.segments.is_empty() {
            if matches!(self.root, RootKind::Filesystem | RootKind::Drive(_)) {
                out.push('/');
            }
            return out;
        }
        for segment in &self.segments {
            out.push('/');
            out.push_str(segment);
        }
        out
    }

    /// Resolve to a real filesystem location.
    pub fn resolve(&self, ctx: &PathContext) -> Result<PathBuf, NavError> {
        let mut path = ctx
            .root_path(&self.root)
            .ok_or_else(|| NavError::UnresolvedRoot {
                root: self.root.prefix(),
            })?;
        path.extend(&self.segments);
        Ok(path)
    }

    /// Normalized absolute string used as a history key. Falls back to the
    /// symbolic rendering when the root cannot be resolved.
    pub fn id(&self, ctx: &PathContext) -> String {
        match self.resolve(ctx) {
            Ok(path) => path.to_string_lossy().replace('\\', "/"),
            Err(_) => self.render(),
        }
    }

    /// Absolute display string, as written to the clipboard.
    pub fn display_string(&self, ctx: &PathContext) -> String {
        match self.resolve(ctx) {
            Ok(path) => path.display().to_string(),
            Err(_) => self.render(),
        }
    }

    /// This path relative to `other_root`, using `/` separators. `None` when
    /// the path does not live below `other_root`.
    pub fn relative_to(&self, other_root: &Path, ctx: &PathContext) -> Option<String> {
        let path = self.resolve(ctx).ok()?;
        let rel = path.strip_prefix(other_root).ok()?;
        Some(
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
        )
    }
}

impl fmt::Display for NavPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Split `text` into a root and the remainder after the root prefix.
fn split_root(text: &str) -> Option<(RootKind, &str)> {
    if let Some(rest) = text.strip_prefix(ENV_PREFIX) {
        let (name, rest) = rest.split_once('/').unwrap_or((rest, ""));
        if name.is_empty() {
            return None;
        }
        return Some((RootKind::Env(name.to_string()), rest));
    }

    for (marker, root) in [('~', RootKind::Home), ('@', RootKind::Workspace)] {
        if let Some(rest) = text.strip_prefix(marker) {
            if rest.is_empty() || rest.starts_with('/') {
                return Some((root, rest));
            }
        }
    }

    let bytes = text.as_bytes();
    if bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/')
    {
        return Some((RootKind::Drive(char::from(bytes[0])), &text[2..]));
    }

    text.strip_prefix('/').map(|rest| (RootKind::Filesystem, rest))
}

/// Resolves symbolic roots to real locations.
#[derive(Debug, Clone, Default)]
pub struct PathContext {
    /// The user's home directory.
    pub home: Option<PathBuf>,
    /// Workspace folders; `@` resolves to the first one.
    pub workspace_roots: Vec<PathBuf>,
    /// Environment values consulted before the process environment.
    env_overrides: HashMap<String, PathBuf>,
}

impl PathContext {
    /// Create a context from a home directory and workspace roots.
    pub fn new(home: Option<PathBuf>, workspace_roots: Vec<PathBuf>) -> Self {
        Self {
            home,
            workspace_roots,
            env_overrides: HashMap::new(),
        }
    }

    /// Pin an environment variable to a value instead of reading the process
    /// environment.
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<PathBuf>) -> Self {
        self.env_overrides.insert(name.into(), value.into());
        self
    }

    /// The first workspace folder.
    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_roots.first().map(PathBuf::as_path)
    }

    /// Resolve a root kind to a real location.
    pub fn root_path(&self, root: &RootKind) -> Option<PathBuf> {
        match root {
            RootKind::Filesystem => Some(PathBuf::from("/")),
            RootKind::Drive(letter) => Some(PathBuf::from(format!("{letter}:/"))),
            RootKind::Home => self.home.clone(),
            RootKind::Workspace => self.workspace_root().map(Path::to_path_buf),
            RootKind::Env(name) => self
                .env_overrides
                .get(name)
                .cloned()
                .or_else(|| std::env::var_os(name).map(PathBuf::from)),
        }
    }

    /// Express an absolute location with the most specific symbolic root:
    /// the workspace if it contains the location, then home, then the
    /// filesystem root.
    pub fn to_nav_path(&self, abs: &Path) -> NavPath {
        let anchors = [
            (RootKind::Workspace, self.workspace_root()),
            (RootKind::Home, self.home.as_deref()),
        ];
        for (root, base) in anchors {
            let Some(base) = base else { continue };
            if let Ok(rel) = abs.strip_prefix(base) {
                let mut nav = NavPath::new(root);
                nav.append(&rel.to_string_lossy());
                return nav;
            }
        }
        NavPath::from_absolute(abs)
    }
}
