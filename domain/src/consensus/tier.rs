//! Agreement tiers
//!
//! A tier is derived from support-set size relative to the number of sources
//! that returned successfully for the document. It is never stored.

use serde::{Deserialize, Serialize};

/// Agreement level of a canonical key
///
/// # Example
///
/// ```
/// use annoquorum_domain::consensus::AgreementTier;
///
/// assert_eq!(AgreementTier::classify(3, 3), AgreementTier::Unanimous);
/// assert_eq!(AgreementTier::classify(2, 3), AgreementTier::Majority);
/// assert_eq!(AgreementTier::classify(1, 3), AgreementTier::Disputed);
/// // A lone successful source is still a single voice.
/// assert_eq!(AgreementTier::classify(1, 1), AgreementTier::Disputed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementTier {
    /// Every successful source supports the key
    Unanimous,
    /// At least two, but not all, successful sources support the key
    Majority,
    /// Exactly one source supports the key
    Disputed,
}

impl AgreementTier {
    /// Classify a support count against the successful-source total.
    ///
    /// Single support is disputed even when only one source succeeded.
    pub fn classify(support: usize, total: usize) -> Self {
        if support <= 1 {
            AgreementTier::Disputed
        } else if support >= total {
            AgreementTier::Unanimous
        } else {
            AgreementTier::Majority
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgreementTier::Unanimous => "unanimous",
            AgreementTier::Majority => "majority",
            AgreementTier::Disputed => "disputed",
        }
    }
}

impl std::fmt::Display for AgreementTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Count of keys per tier, plus conflicts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub unanimous: usize,
    pub majority: usize,
    pub disputed: usize,
    pub conflicts: usize,
}

impl TierCounts {
    pub fn record(&mut self, tier: AgreementTier) {
        match tier {
            AgreementTier::Unanimous => self.unanimous += 1,
            AgreementTier::Majority => self.majority += 1,
            AgreementTier::Disputed => self.disputed += 1,
        }
    }

    pub fn total_keys(&self) -> usize {
        self.unanimous + self.majority + self.disputed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_equal_total_is_unanimous_from_two() {
        for total in 2..=5 {
            assert_eq!(AgreementTier::classify(total, total), AgreementTier::Unanimous);
        }
    }

    #[test]
    fn test_lone_successful_source_is_disputed() {
        assert_eq!(AgreementTier::classify(1, 1), AgreementTier::Disputed);
    }

    #[test]
    fn test_majority_range() {
        assert_eq!(AgreementTier::classify(2, 5), AgreementTier::Majority);
        assert_eq!(AgreementTier::classify(4, 5), AgreementTier::Majority);
        assert_eq!(AgreementTier::classify(1, 2), AgreementTier::Disputed);
    }

    #[test]
    fn test_tier_counts() {
        let mut counts = TierCounts::default();
        counts.record(AgreementTier::Unanimous);
        counts.record(AgreementTier::Disputed);
        counts.record(AgreementTier::Disputed);
        assert_eq!(counts.disputed, 2);
        assert_eq!(counts.total_keys(), 3);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(AgreementTier::Majority.to_string(), "majority");
        let json = serde_json::to_string(&AgreementTier::Disputed).unwrap();
        assert_eq!(json, "\"disputed\"");
    }
}
