//! Run-scoped set of links that already produced a record.

use std::collections::HashSet;

/// Links accepted so far in a run.
///
/// A link is inserted once, when the first record carrying it parses in
/// full. Nothing is ever removed. Share one instance across every parse
/// call of a run; a fresh instance starts a fresh dedup scope.
#[derive(Debug, Clone, Default)]
pub struct DedupSet {
    links: HashSet<String>,
}

impl DedupSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `link` was already recorded.
    #[must_use]
    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// Record `link`. Returns `false` if it was already present.
    pub fn insert(&mut self, link: impl Into<String>) -> bool {
        self.links.insert(link.into())
    }

    /// Number of distinct links recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether no link has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
