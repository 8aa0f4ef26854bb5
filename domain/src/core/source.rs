//! Extraction source identity and the static reliability ranking

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Identifier of an extraction source (Value Object)
///
/// A source is one independent labeler over the same document
/// (e.g. "doubao", "deepseek", "tongyi").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Immutable mapping from source to its static reliability rank.
///
/// Higher rank means more reliable. The table is built once from
/// configuration and passed explicitly to the analyzer, the review
/// selector and the resolver.
///
/// # Example
///
/// ```
/// use annoquorum_domain::core::source::{ReliabilityTable, SourceId};
///
/// let table = ReliabilityTable::from_pairs([("doubao", 3), ("deepseek", 2), ("tongyi", 1)]);
/// assert_eq!(table.max_rank(), 3);
/// assert!(table.is_top(&SourceId::from("doubao")));
/// assert!(!table.is_top(&SourceId::from("tongyi")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReliabilityTable {
    ranks: BTreeMap<SourceId, u32>,
}

impl ReliabilityTable {
    pub fn new(ranks: BTreeMap<SourceId, u32>) -> Self {
        Self { ranks }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<SourceId>,
    {
        Self {
            ranks: pairs.into_iter().map(|(s, r)| (s.into(), r)).collect(),
        }
    }

    /// Reject empty tables and zero ranks
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.ranks.is_empty() {
            return Err(DomainError::NoSources);
        }
        if let Some((source, rank)) = self.ranks.iter().find(|(_, r)| **r == 0) {
            return Err(DomainError::InvalidRank {
                source_id: source.to_string(),
                rank: *rank,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn contains(&self, source: &SourceId) -> bool {
        self.ranks.contains_key(source)
    }

    /// Rank of a source; unknown sources rank 0
    pub fn rank(&self, source: &SourceId) -> u32 {
        self.ranks.get(source).copied().unwrap_or(0)
    }

    /// Highest rank present in the table
    pub fn max_rank(&self) -> u32 {
        self.ranks.values().copied().max().unwrap_or(0)
    }

    /// Sources ordered from most to least reliable (ties by id)
    pub fn ranked(&self) -> Vec<SourceId> {
        let mut sources: Vec<_> = self.ranks.keys().cloned().collect();
        sources.sort_by(|a, b| self.rank(b).cmp(&self.rank(a)).then_with(|| a.cmp(b)));
        sources
    }

    /// Distinct rank values, descending
    fn distinct_ranks(&self) -> Vec<u32> {
        let set: BTreeSet<u32> = self.ranks.values().copied().collect();
        set.into_iter().rev().collect()
    }

    /// Whether the source holds the highest rank
    pub fn is_top(&self, source: &SourceId) -> bool {
        let rank = self.rank(source);
        rank > 0 && rank == self.max_rank()
    }

    /// Whether the source holds the second-highest distinct rank
    pub fn is_second(&self, source: &SourceId) -> bool {
        let rank = self.rank(source);
        rank > 0 && self.distinct_ranks().get(1) == Some(&rank)
    }

    /// Reliability score of a supporter set.
    ///
    /// `sum(rank) / (supporters * max_rank)`, in `[0.0, 1.0]`. Purely
    /// diagnostic; tiers never depend on it.
    pub fn score<'a>(&self, supporters: impl IntoIterator<Item = &'a SourceId>) -> f64 {
        let ranks: Vec<u32> = supporters.into_iter().map(|s| self.rank(s)).collect();
        let max_possible = ranks.len() as u64 * self.max_rank() as u64;
        if max_possible == 0 {
            return 0.0;
        }
        let total: u64 = ranks.iter().map(|r| *r as u64).sum();
        total as f64 / max_possible as f64
    }

    /// Supporter ranks sorted descending, used for tie-breaking
    pub fn rank_profile<'a>(&self, supporters: impl IntoIterator<Item = &'a SourceId>) -> Vec<u32> {
        let mut ranks: Vec<u32> = supporters.into_iter().map(|s| self.rank(s)).collect();
        ranks.sort_unstable_by(|a, b| b.cmp(a));
        ranks
    }
}
