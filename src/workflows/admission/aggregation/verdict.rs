use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-material aggregation outcome. The incompleteness reason travels inside
/// the variant instead of being re-derived elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    AllPass,
    HasReject,
    Conflict,
    Incomplete(IncompleteReason),
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::AllPass => "ALL_PASS",
            Verdict::HasReject => "HAS_REJECT",
            Verdict::Conflict => "CONFLICT",
            Verdict::Incomplete(_) => "INCOMPLETE",
        }
    }

    pub const fn is_all_pass(self) -> bool {
        matches!(self, Verdict::AllPass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why the review facts are insufficient for a conclusive verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncompleteReason {
    NoReviews,
    NotEnoughReviewers,
}

impl IncompleteReason {
    pub const fn label(self) -> &'static str {
        match self {
            IncompleteReason::NoReviews => "NO_REVIEWS",
            IncompleteReason::NotEnoughReviewers => "NOT_ENOUGH_REVIEWERS",
        }
    }
}

/// Application-level diagnostic for why an evaluation left the application
/// under review. Reported, never persisted; conflict outranks incompleteness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockReason {
    ConflictingReviews,
    InsufficientReviewers,
}

impl BlockReason {
    pub const fn label(self) -> &'static str {
        match self {
            BlockReason::ConflictingReviews => "CONFLICTING_REVIEWS",
            BlockReason::InsufficientReviewers => "INSUFFICIENT_REVIEWERS",
        }
    }
}
