mod config;
mod folding;
mod verdict;

pub use config::{ReviewPolicy, DEFAULT_MIN_REVIEWERS};
pub use folding::fold_effective_records;
pub use verdict::{BlockReason, IncompleteReason, Verdict};

use serde::{Deserialize, Serialize};

use super::domain::{ReviewDecision, ReviewRecord};

/// Aggregated review state of one material at one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialAggregate {
    pub verdict: Verdict,
    /// Distinct reviewers with an effective record after folding.
    pub reviewer_count: usize,
}

/// Stateless aggregator folding raw review records into a per-material
/// verdict under the injected policy. Single source of truth consumed by
/// review summaries, application evaluation, and score gating.
#[derive(Debug, Clone)]
pub struct ReviewAggregator {
    policy: ReviewPolicy,
}

impl ReviewAggregator {
    pub fn new(policy: ReviewPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ReviewPolicy {
        &self.policy
    }

    /// Fold and aggregate all records for one material against the material's
    /// current version.
    pub fn aggregate(&self, records: &[ReviewRecord], current_version: u32) -> MaterialAggregate {
        let folded = fold_effective_records(records, current_version);
        self.aggregate_folded(&folded)
    }

    /// Aggregate an already folded record set (one record per reviewer).
    pub fn aggregate_folded(&self, folded: &[ReviewRecord]) -> MaterialAggregate {
        let reviewer_count = folded.len();

        // An arbiter ruling short-circuits quorum and conflict rules.
        if let Some(ruling) = self.latest_arbiter_ruling(folded) {
            let verdict = match ruling.decision {
                ReviewDecision::Reject => Verdict::HasReject,
                ReviewDecision::Pass => Verdict::AllPass,
            };
            return MaterialAggregate {
                verdict,
                reviewer_count,
            };
        }

        if reviewer_count == 0 {
            return MaterialAggregate {
                verdict: Verdict::Incomplete(IncompleteReason::NoReviews),
                reviewer_count,
            };
        }
        if reviewer_count < self.policy.min_reviewers() {
            return MaterialAggregate {
                verdict: Verdict::Incomplete(IncompleteReason::NotEnoughReviewers),
                reviewer_count,
            };
        }

        let has_pass = folded
            .iter()
            .any(|record| record.decision == ReviewDecision::Pass);
        let has_reject = folded
            .iter()
            .any(|record| record.decision == ReviewDecision::Reject);

        let verdict = if has_pass && has_reject {
            Verdict::Conflict
        } else if has_reject {
            Verdict::HasReject
        } else {
            Verdict::AllPass
        };

        MaterialAggregate {
            verdict,
            reviewer_count,
        }
    }

    /// Latest arbiter record in the folded set. A timestamp tie between two
    /// arbiters resolves to the lowest reviewer id.
    fn latest_arbiter_ruling<'a>(&self, folded: &'a [ReviewRecord]) -> Option<&'a ReviewRecord> {
        folded
            .iter()
            .filter(|record| self.policy.is_arbiter(record.reviewer_id))
            .fold(None, |best: Option<&ReviewRecord>, record| match best {
                None => Some(record),
                Some(incumbent)
                    if record.created_at > incumbent.created_at
                        || (record.created_at == incumbent.created_at
                            && record.reviewer_id < incumbent.reviewer_id) =>
                {
                    Some(record)
                }
                Some(incumbent) => Some(incumbent),
            })
    }
}
