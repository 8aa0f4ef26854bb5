//! Picking which subjects go to human review

use super::store::ReviewLookup;
use super::task::{Priority, ReviewCandidate, ReviewReason};
use crate::consensus::{AgreementTier, ConsensusAnalysis};
use crate::core::source::ReliabilityTable;
use std::collections::BTreeSet;

/// Default number of disputed entities considered per document
pub const DEFAULT_REVIEW_CAP: usize = 10;

/// Select review candidates for one analyzed document.
///
/// Conflicts come first at high priority. Disputed entities are ranked by
/// the rank of their sole source (ties by text). Those already decided or
/// pending are passed over, and the top `cap` of the rest are emitted at
/// medium priority, so later batches surface the remainder. No subject is
/// emitted twice.
pub fn select_candidates(
    analysis: &ConsensusAnalysis,
    table: &ReliabilityTable,
    reviews: &dyn ReviewLookup,
    pending_subjects: &BTreeSet<String>,
    cap: usize,
) -> Vec<ReviewCandidate> {
    let mut emitted: BTreeSet<String> = BTreeSet::new();
    let mut candidates = Vec::new();

    let is_open = |subject: &str| !reviews.contains(subject) && !pending_subjects.contains(subject);

    for conflict in &analysis.conflicts {
        if !is_open(&conflict.text) || !emitted.insert(conflict.text.clone()) {
            continue;
        }
        let reported = conflict
            .assignments
            .iter()
            .flat_map(|(t, sources)| sources.iter().map(move |s| (s.clone(), *t)))
            .fold(std::collections::BTreeMap::new(), |mut acc, (s, t)| {
                // a source voting several types keeps the first in type order
                acc.entry(s).or_insert(t);
                acc
            });
        candidates.push(ReviewCandidate {
            subject: conflict.text.clone(),
            priority: Priority::High,
            reason: ReviewReason::TypeConflict,
            reported,
        });
    }

    let mut disputed: Vec<_> = analysis
        .entities_in_tier(AgreementTier::Disputed)
        .filter_map(|g| g.sole_supporter().map(|s| (g, s)))
        .collect();
    disputed.sort_by(|(ga, sa), (gb, sb)| {
        table
            .rank(sb)
            .cmp(&table.rank(sa))
            .then_with(|| ga.text().cmp(gb.text()))
            .then_with(|| ga.entity_type().cmp(&gb.entity_type()))
    });

    let mut taken = 0;
    for (group, source) in disputed {
        if taken == cap {
            break;
        }
        let subject = group.text();
        if !is_open(subject) || !emitted.insert(subject.to_string()) {
            continue;
        }
        taken += 1;
        candidates.push(ReviewCandidate {
            subject: subject.to_string(),
            priority: Priority::Medium,
            reason: ReviewReason::SingleModel,
            reported: [(source.clone(), group.entity_type())].into_iter().collect(),
        });
    }

    candidates
}
