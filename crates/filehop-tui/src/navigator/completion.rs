//! Tab completion over the current item list.

use filehop_core::Entry;

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub is_dir: bool,
    /// Position in the navigator's item list.
    pub index: usize,
}

/// Snapshot of matching candidates and a cyclic cursor over them.
#[derive(Debug, Clone)]
pub struct AutoCompletion {
    candidates: Vec<Candidate>,
    cursor: usize,
}

impl AutoCompletion {
    /// Collect real entries whose name contains `input`, case-insensitively.
    ///
    /// Candidates are ordered by the position of the match, then by name,
    /// so prefix matches come before buried substrings. The cursor starts
    /// on the first candidate when cycling forward and on the last when
    /// cycling backward. Returns `None` when nothing matches.
    pub fn build(items: &[Entry], input: &str, forward: bool) -> Option<Self> {
        let needle = input.to_lowercase();
        let mut scored: Vec<(usize, String, Candidate)> = items
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let file = entry.as_file()?;
                let lower = file.name.to_lowercase();
                let pos = lower.find(&needle)?;
                Some((
                    pos,
                    lower,
                    Candidate {
                        name: file.name.clone(),
                        is_dir: file.kind.is_dir(),
                        index,
                    },
                ))
            })
            .collect();
        if scored.is_empty() {
            return None;
        }
        scored.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));

        let candidates: Vec<Candidate> = scored.into_iter().map(|(_, _, c)| c).collect();
        let cursor = if forward { 0 } else { candidates.len() - 1 };
        Some(Self { candidates, cursor })
    }

    /// Move the cursor by one with wraparound.
    pub fn advance(&mut self, forward: bool) {
        let len = self.candidates.len();
        self.cursor = if forward {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    pub fn current(&self) -> &Candidate {
        &self.candidates[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Exactly one candidate matched and it is a directory.
    pub fn is_single_directory(&self) -> bool {
        self.candidates.len() == 1 && self.candidates[0].is_dir
    }
}
