use super::aggregation::{BlockReason, MaterialAggregate, Verdict};

/// Decision the evaluator derived from the per-material aggregates. Computing
/// it is pure; committing the transition is a separate, explicit step in the
/// service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDecision {
    /// Every material is ALL_PASS.
    Approve,
    /// Some material has a rejecting verdict; found first, wins immediately.
    Reject,
    /// Stay under review. The optional reason is diagnostic only and
    /// best-effort: a rejection short-circuits before remaining materials are
    /// inspected, so it is never persisted.
    Hold(Option<BlockReason>),
}

/// Roll per-material aggregates up into one application-level decision.
///
/// The first rejecting material decides the outcome without inspecting the
/// rest. Approval requires every material to pass. Otherwise the application
/// holds, with conflict taking priority over incompleteness when both occur
/// across different materials.
pub fn decide_transition(aggregates: &[MaterialAggregate]) -> TransitionDecision {
    if aggregates.is_empty() {
        return TransitionDecision::Hold(None);
    }

    let mut all_pass = true;
    let mut has_conflict = false;
    let mut has_incomplete = false;

    for aggregate in aggregates {
        match aggregate.verdict {
            Verdict::HasReject => return TransitionDecision::Reject,
            Verdict::AllPass => {}
            Verdict::Conflict => {
                all_pass = false;
                has_conflict = true;
            }
            Verdict::Incomplete(_) => {
                all_pass = false;
                has_incomplete = true;
            }
        }
    }

    if all_pass {
        return TransitionDecision::Approve;
    }

    let reason = if has_conflict {
        Some(BlockReason::ConflictingReviews)
    } else if has_incomplete {
        Some(BlockReason::InsufficientReviewers)
    } else {
        None
    };

    TransitionDecision::Hold(reason)
}
