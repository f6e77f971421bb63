//! Bounded history of accepted search queries.

use std::collections::VecDeque;

/// Maximum number of remembered queries.
pub const SCROLLBACK_CAPACITY: usize = 20;

/// Most recent query first. Re-recording a query moves it to the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scrollback {
    entries: VecDeque<String>,
}

impl Scrollback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted query, evicting the oldest past capacity.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.entries.retain(|q| q != query);
        self.entries.push_front(query.to_string());
        self.entries.truncate(SCROLLBACK_CAPACITY);
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_and_order() {
        let mut scrollback = Scrollback::new();
        for i in 0..30 {
            scrollback.record(&format!("query {i}"));
            assert!(scrollback.len() <= SCROLLBACK_CAPACITY);
            assert_eq!(scrollback.get(0), Some(format!("query {i}").as_str()));
        }
        assert_eq!(scrollback.len(), SCROLLBACK_CAPACITY);
        assert_eq!(scrollback.iter().last(), Some("query 10"));
    }

    #[test]
    fn test_rerecord_moves_to_front() {
        let mut scrollback = Scrollback::new();
        scrollback.record("a");
        scrollback.record("b");
        scrollback.record("a");
        assert_eq!(scrollback.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_blank_is_ignored() {
        let mut scrollback = Scrollback::new();
        scrollback.record("  ");
        assert!(scrollback.is_empty());
    }
}
