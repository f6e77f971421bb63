//! Parsing of search tool output into result rows.

use std::path::{Path, PathBuf};

use crate::command::SearchMode;

/// Content rows whose matched text is longer than this are dropped.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Base name of the matching file.
    pub label: String,
    /// Matched line text, for content search.
    pub description: Option<String>,
    /// Absolute path rendered for display.
    pub detail: String,
    /// Absolute path of the matching file.
    pub path: PathBuf,
    /// 1-based line number reported by the tool, for content search.
    pub num: Option<u32>,
}

impl SearchHit {
    /// 0-based line to place the cursor on.
    pub fn target_line(&self) -> Option<u32> {
        self.num.map(|n| n.saturating_sub(1))
    }
}

fn strip_dot_slash(rel: &str) -> &str {
    rel.strip_prefix("./")
        .or_else(|| rel.strip_prefix(".\\"))
        .unwrap_or(rel)
}

fn base_name(rel: &str) -> String {
    rel.rsplit(['/', '\\']).next().unwrap_or(rel).to_string()
}

/// Parse one line of name-search output (a path relative to `dir`).
pub fn parse_name_line(dir: &Path, line: &str) -> Option<SearchHit> {
    let rel = strip_dot_slash(line.trim_end_matches('\r'));
    if rel.is_empty() {
        return None;
    }
    let path = dir.join(rel);
    Some(SearchHit {
        label: base_name(rel),
        description: None,
        detail: path.display().to_string(),
        path,
        num: None,
    })
}

/// Parse one line of content-search output: `path:line:text`.
///
/// Lines without a numeric line number, or whose text exceeds
/// [`MAX_DESCRIPTION_LEN`] bytes, yield `None`.
pub fn parse_content_line(dir: &Path, line: &str) -> Option<SearchHit> {
    let line = line.trim_end_matches('\r');
    let mut parts = line.splitn(3, ':');
    let rel = strip_dot_slash(parts.next()?);
    let num: u32 = parts.next()?.parse().ok()?;
    let text = parts.next()?;
    if rel.is_empty() || text.len() > MAX_DESCRIPTION_LEN {
        return None;
    }
    let path = dir.join(rel);
    Some(SearchHit {
        label: base_name(rel),
        description: Some(text.trim().to_string()),
        detail: path.display().to_string(),
        path,
        num: Some(num),
    })
}

/// Parse output lines for `mode`, skipping rows that do not parse.
pub fn parse_lines<'a>(
    mode: SearchMode,
    dir: &Path,
    lines: impl IntoIterator<Item = &'a str>,
) -> Vec<SearchHit> {
    let parse = match mode {
        SearchMode::Names => parse_name_line,
        SearchMode::Content => parse_content_line,
    };
    lines.into_iter().filter_map(|line| parse(dir, line)).collect()
}

/// Parse a full output buffer for `mode`.
pub fn parse_output(mode: SearchMode, dir: &Path, output: &str) -> Vec<SearchHit> {
    parse_lines(mode, dir, output.lines())
}
