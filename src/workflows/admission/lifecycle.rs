use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationStatus};

/// Transition attempted from a state where it is not defined. Never retried
/// or auto-corrected; the caller must re-query state.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("cannot {attempted} an application in {from} status")]
    InvalidTransition {
        from: ApplicationStatus,
        attempted: &'static str,
    },
}

/// Coarse stage grouping statuses that share the same permitted actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStage {
    Drafting,
    Submission,
    Reviewing,
    Finalized,
}

impl ApplicationStage {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStage::Drafting => "DRAFTING",
            ApplicationStage::Submission => "SUBMISSION",
            ApplicationStage::Reviewing => "REVIEWING",
            ApplicationStage::Finalized => "FINALIZED",
        }
    }

    pub const fn from_status(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Draft => ApplicationStage::Drafting,
            ApplicationStatus::Submitted => ApplicationStage::Submission,
            ApplicationStatus::UnderReview => ApplicationStage::Reviewing,
            ApplicationStatus::Approved | ApplicationStatus::Rejected => {
                ApplicationStage::Finalized
            }
        }
    }

    pub fn allows(self, action: ApplicationAction) -> bool {
        allowed_actions(self).contains(&action)
    }
}

/// Actions gated by the lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationAction {
    AddMaterial,
    RemoveMaterial,
    SubmitApplication,
    CreateReview,
    ViewResult,
}

impl ApplicationAction {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationAction::AddMaterial => "ADD_MATERIAL",
            ApplicationAction::RemoveMaterial => "REMOVE_MATERIAL",
            ApplicationAction::SubmitApplication => "SUBMIT_APPLICATION",
            ApplicationAction::CreateReview => "CREATE_REVIEW",
            ApplicationAction::ViewResult => "VIEW_RESULT",
        }
    }
}

/// An action the current stage forbids, with a machine-readable reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockedAction {
    pub action: ApplicationAction,
    pub reason: &'static str,
}

pub fn allowed_actions(stage: ApplicationStage) -> &'static [ApplicationAction] {
    match stage {
        ApplicationStage::Drafting => &[
            ApplicationAction::AddMaterial,
            ApplicationAction::RemoveMaterial,
            ApplicationAction::SubmitApplication,
        ],
        ApplicationStage::Submission | ApplicationStage::Reviewing => &[
            ApplicationAction::CreateReview,
            ApplicationAction::ViewResult,
        ],
        ApplicationStage::Finalized => &[ApplicationAction::ViewResult],
    }
}

pub fn blocked_actions(stage: ApplicationStage) -> Vec<BlockedAction> {
    match stage {
        ApplicationStage::Drafting => vec![
            BlockedAction {
                action: ApplicationAction::CreateReview,
                reason: "APPLICATION_NOT_SUBMITTED",
            },
            BlockedAction {
                action: ApplicationAction::ViewResult,
                reason: "NO_REVIEW_YET",
            },
        ],
        ApplicationStage::Submission | ApplicationStage::Reviewing => vec![
            BlockedAction {
                action: ApplicationAction::AddMaterial,
                reason: "MATERIAL_FROZEN_AFTER_SUBMISSION",
            },
            BlockedAction {
                action: ApplicationAction::RemoveMaterial,
                reason: "MATERIAL_FROZEN_AFTER_SUBMISSION",
            },
        ],
        ApplicationStage::Finalized => vec![
            BlockedAction {
                action: ApplicationAction::AddMaterial,
                reason: "APPLICATION_FINALIZED",
            },
            BlockedAction {
                action: ApplicationAction::RemoveMaterial,
                reason: "APPLICATION_FINALIZED",
            },
            BlockedAction {
                action: ApplicationAction::CreateReview,
                reason: "APPLICATION_FINALIZED",
            },
        ],
    }
}

/// DRAFT -> SUBMITTED.
pub fn mark_submitted(
    application: Application,
    now: DateTime<Utc>,
) -> Result<Application, LifecycleError> {
    match application.status {
        ApplicationStatus::Draft => Ok(application.with_status(ApplicationStatus::Submitted, now)),
        from => Err(LifecycleError::InvalidTransition {
            from,
            attempted: "submit",
        }),
    }
}

/// SUBMITTED -> UNDER_REVIEW.
pub fn mark_under_review(
    application: Application,
    now: DateTime<Utc>,
) -> Result<Application, LifecycleError> {
    match application.status {
        ApplicationStatus::Submitted => {
            Ok(application.with_status(ApplicationStatus::UnderReview, now))
        }
        from => Err(LifecycleError::InvalidTransition {
            from,
            attempted: "start review for",
        }),
    }
}

/// UNDER_REVIEW -> APPROVED. Driven only by the evaluator.
pub fn mark_approved(
    application: Application,
    now: DateTime<Utc>,
) -> Result<Application, LifecycleError> {
    match application.status {
        ApplicationStatus::UnderReview => {
            Ok(application.with_status(ApplicationStatus::Approved, now))
        }
        from => Err(LifecycleError::InvalidTransition {
            from,
            attempted: "approve",
        }),
    }
}

/// UNDER_REVIEW -> REJECTED. Driven only by the evaluator.
pub fn mark_rejected(
    application: Application,
    now: DateTime<Utc>,
) -> Result<Application, LifecycleError> {
    match application.status {
        ApplicationStatus::UnderReview => {
            Ok(application.with_status(ApplicationStatus::Rejected, now))
        }
        from => Err(LifecycleError::InvalidTransition {
            from,
            attempted: "reject",
        }),
    }
}
