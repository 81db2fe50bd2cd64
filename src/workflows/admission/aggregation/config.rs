use std::collections::BTreeSet;

use super::super::domain::ReviewerId;

/// Minimum number of distinct effective reviewers before a non-arbitrated
/// verdict can be conclusive.
pub const DEFAULT_MIN_REVIEWERS: usize = 2;

/// Process-wide review policy: which reviewers arbitrate and how many
/// effective reviewers form a quorum. Injected into the aggregator so the
/// engine stays pure and testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPolicy {
    arbiter_reviewers: BTreeSet<ReviewerId>,
    min_reviewers: usize,
}

impl ReviewPolicy {
    pub fn new(arbiter_reviewers: BTreeSet<ReviewerId>, min_reviewers: usize) -> Self {
        Self {
            arbiter_reviewers,
            min_reviewers: min_reviewers.max(1),
        }
    }

    pub fn with_arbiters(arbiters: impl IntoIterator<Item = ReviewerId>) -> Self {
        Self::new(arbiters.into_iter().collect(), DEFAULT_MIN_REVIEWERS)
    }

    pub fn is_arbiter(&self, reviewer: ReviewerId) -> bool {
        self.arbiter_reviewers.contains(&reviewer)
    }

    pub fn min_reviewers(&self) -> usize {
        self.min_reviewers
    }
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self::new(BTreeSet::new(), DEFAULT_MIN_REVIEWERS)
    }
}
