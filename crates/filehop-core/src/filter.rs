//! Entry classification: dotfile hiding, ignore-file rules and sort order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ignore::Match;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{debug, warn};

use crate::config::NavigatorConfig;
use crate::entry::{DirMember, Entry, FileEntry};

/// Ignore rules found in one directory.
#[derive(Debug, Clone)]
struct DirRules {
    matcher: Option<Gitignore>,
    /// The directory holds a `.git` entry; ancestors above it are not read.
    is_repo_root: bool,
}

/// Decides which directory members are shown and in what order.
///
/// Ignore files are parsed at most once per directory for the lifetime of
/// the filter.
#[derive(Debug)]
pub struct EntryFilter {
    config: NavigatorConfig,
    cache: HashMap<PathBuf, DirRules>,
}

impl EntryFilter {
    /// Create a filter for the given configuration.
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            config,
            cache: HashMap::new(),
        }
    }

    /// The configuration this filter applies.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Forget cached ignore rules, e.g. after an ignore file was edited.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Classify and sort the members of `dir`.
    ///
    /// Rules apply in order: dotfile hiding, ignore-file matching, then
    /// removal of ignored entries when configured. Entries listed in
    /// `always_show` survive every rule.
    pub fn classify(&mut self, dir: &Path, members: Vec<DirMember>) -> Vec<Entry> {
        let chain = if self.config.hide_ignored_files {
            self.load_chain(dir)
        } else {
            Vec::new()
        };
        let matchers: Vec<&Gitignore> = chain
            .iter()
            .filter_map(|d| self.cache.get(d).and_then(|r| r.matcher.as_ref()))
            .collect();

        let mut entries = Vec::with_capacity(members.len());
        for member in members {
            let always_show = self.config.is_always_shown(&member.name);
            if self.config.should_skip_hidden(&member.name) {
                continue;
            }

            let ignored = !always_show
                && is_ignored(&matchers, &dir.join(&member.name), member.kind.is_dir());
            if ignored && self.config.remove_ignored_files {
                continue;
            }

            entries.push(Entry::RealFile(FileEntry {
                name: member.name,
                kind: member.kind,
                always_show,
                ignored,
            }));
        }

        sort_entries(&mut entries);
        entries
    }

    /// Make sure rules for `dir` and its ancestors up to the repository root
    /// are cached. Returns the chain, nearest directory first.
    fn load_chain(&mut self, dir: &Path) -> Vec<PathBuf> {
        let mut chain = Vec::new();
        for ancestor in dir.ancestors() {
            let rules = self
                .cache
                .entry(ancestor.to_path_buf())
                .or_insert_with(|| load_rules(ancestor, &self.config.ignore_file_types));
            let stop = rules.is_repo_root;
            chain.push(ancestor.to_path_buf());
            if stop {
                break;
            }
        }
        chain
    }
}

fn load_rules(dir: &Path, ignore_files: &[String]) -> DirRules {
    let mut builder = GitignoreBuilder::new(dir);
    let mut found = false;
    for name in ignore_files {
        let file = dir.join(name);
        if !file.is_file() {
            continue;
        }
        found = true;
        if let Some(err) = builder.add(&file) {
            warn!(path = %file.display(), error = %err, "Failed to parse ignore file");
        }
    }

    let matcher = if found {
        match builder.build() {
            Ok(matcher) => {
                debug!(dir = %dir.display(), rules = matcher.num_ignores(), "Loaded ignore rules");
                Some(matcher)
            }
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "Failed to build ignore rules");
                None
            }
        }
    } else {
        None
    };

    DirRules {
        matcher,
        is_repo_root: dir.join(".git").exists(),
    }
}

/// Nearest matcher with an opinion wins; a whitelist rule un-ignores.
fn is_ignored(matchers: &[&Gitignore], path: &Path, is_dir: bool) -> bool {
    for matcher in matchers {
        match matcher.matched_path_or_any_parents(path, is_dir) {
            Match::Ignore(_) => return true,
            Match::Whitelist(_) => return false,
            Match::None => {}
        }
    }
    false
}

/// Sort case-insensitively by name; on a case-insensitive tie directories
/// come first.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by_cached_key(|e| {
        let name = e.name();
        (name.to_lowercase(), u8::from(!e.is_dir()), name)
    });
}
