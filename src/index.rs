//! Index collaborator
//!
//! The persisted manual index lives outside this crate. The resolver only
//! needs its answer for a query: a ranked candidate list and whether that
//! answer can be trusted.

use crate::manpage::{Candidate, MatchKind};
use crate::query::{MatchMode, Query};
use crate::search_path::SearchPath;

/// Answer of an index lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexResult {
    pub candidates: Vec<Candidate>,
    /// False when the index is missing or known to be incomplete
    pub authoritative: bool,
}

/// Source of indexed manual candidates
pub trait ManIndex {
    /// Look up a query across the search path
    fn search(&self, query: &Query, paths: &SearchPath) -> IndexResult;
}

/// Stand-in for an absent index
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndex;

impl ManIndex for NoIndex {
    fn search(&self, _query: &Query, _paths: &SearchPath) -> IndexResult {
        IndexResult::default()
    }
}

/// Fixed in-memory index
///
/// Name lookups match page names exactly; keyword and expression lookups
/// match a case-insensitive substring of the names or the description.
#[derive(Debug, Clone, Default)]
pub struct StaticIndex {
    entries: Vec<Candidate>,
}

impl StaticIndex {
    #[must_use]
    pub fn new(entries: Vec<Candidate>) -> Self {
        Self { entries }
    }

    fn matches(entry: &Candidate, query: &Query, term: &str) -> bool {
        if let Some(section) = &query.section
            && crate::query::section_number(section) != entry.section
        {
            return false;
        }
        match query.mode {
            MatchMode::Name | MatchMode::File => entry.names.iter().any(|n| n == term),
            MatchMode::Keyword | MatchMode::Expression => {
                let needle = term.to_lowercase();
                entry.names.iter().any(|n| n.to_lowercase().contains(&needle))
                    || entry
                        .description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
        }
    }
}

impl ManIndex for StaticIndex {
    fn search(&self, query: &Query, _paths: &SearchPath) -> IndexResult {
        let mut candidates = Vec::new();
        for term in &query.names {
            for entry in &self.entries {
                if Self::matches(entry, query, term) && !candidates.contains(entry) {
                    candidates.push(entry.clone().with_match(MatchKind::Index));
                    if query.first_match {
                        return IndexResult {
                            candidates,
                            authoritative: true,
                        };
                    }
                }
            }
        }
        IndexResult {
            candidates,
            authoritative: true,
        }
    }
}
