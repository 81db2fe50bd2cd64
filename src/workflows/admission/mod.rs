//! Application intake, review aggregation, and lifecycle evaluation.
//!
//! Raw review records are folded per reviewer, aggregated into per-material
//! verdicts under an injected review policy, and rolled up into application
//! lifecycle transitions. Every mutating action is gated by the current
//! lifecycle stage.

pub mod aggregation;
pub mod domain;
pub mod evaluation;
pub mod lifecycle;
pub mod report;
pub mod repository;
pub mod scoring;
pub mod submission;
pub mod validation;

pub mod service;

#[cfg(test)]
mod tests;

pub use aggregation::{
    fold_effective_records, BlockReason, IncompleteReason, MaterialAggregate, ReviewAggregator,
    ReviewPolicy, Verdict, DEFAULT_MIN_REVIEWERS,
};
pub use domain::{
    Application, ApplicationId, ApplicationStatus, Material, MaterialId, MaterialRevision,
    MaterialScore, MaterialScoreId, NewMaterial, ReviewDecision, ReviewRecord, ReviewRecordId,
    ReviewerId, ScoreMode, UserId,
};
pub use evaluation::{decide_transition, TransitionDecision};
pub use lifecycle::{
    allowed_actions, blocked_actions, ApplicationAction, ApplicationStage, BlockedAction,
    LifecycleError,
};
pub use report::{
    ApplicationConclusion, ApplicationDashboard, ApplicationOverview, ApplicationReviewSummary,
    LifecycleSummary, MaterialBlockingReason, MaterialReviewSummary,
};
pub use repository::{
    ApplicationStore, MaterialScoreStore, MaterialStore, RepositoryError, ReviewRecordStore,
};
pub use scoring::{MaterialScoreItem, ScoreError, ScoreSummary};
pub use submission::{
    evaluate_submission, SubmissionCheckItem, SubmissionCheckSummary, SubmissionCheckType,
};
pub use validation::ValidationError;
pub use service::{AdmissionService, AdmissionServiceError};
