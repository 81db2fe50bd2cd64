use serde::Serialize;

use super::domain::{Application, ApplicationId, ApplicationStatus};
use super::lifecycle::{ApplicationAction, ApplicationStage};

/// The three independent checks gating DRAFT -> SUBMITTED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionCheckType {
    StatusIsDraft,
    HasAtLeastOneMaterial,
    ActionAllowed,
}

impl SubmissionCheckType {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionCheckType::StatusIsDraft => "STATUS_IS_DRAFT",
            SubmissionCheckType::HasAtLeastOneMaterial => "HAS_AT_LEAST_ONE_MATERIAL",
            SubmissionCheckType::ActionAllowed => "ACTION_ALLOWED",
        }
    }
}

/// Outcome of a single submission check; failing checks carry a
/// machine-readable reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmissionCheckItem {
    pub check: SubmissionCheckType,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// Report of all submission checks. `can_submit` is the AND of every item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionCheckSummary {
    pub application_id: ApplicationId,
    pub can_submit: bool,
    pub checks: Vec<SubmissionCheckItem>,
}

impl SubmissionCheckSummary {
    /// First failing reason, if any. Used by `submit` to explain a refusal.
    pub fn first_blocker(&self) -> Option<&'static str> {
        self.checks
            .iter()
            .find(|item| !item.passed)
            .and_then(|item| item.reason)
    }
}

/// Evaluate whether the application may transition DRAFT -> SUBMITTED.
/// Pure over the supplied state; never mutates anything.
pub fn evaluate_submission(
    application: &Application,
    material_count: usize,
) -> SubmissionCheckSummary {
    let stage = ApplicationStage::from_status(application.status);

    let is_draft = application.status == ApplicationStatus::Draft;
    let has_material = material_count > 0;
    let action_allowed = stage.allows(ApplicationAction::SubmitApplication);

    let checks = vec![
        SubmissionCheckItem {
            check: SubmissionCheckType::StatusIsDraft,
            passed: is_draft,
            reason: (!is_draft).then_some("APPLICATION_NOT_IN_DRAFT"),
        },
        SubmissionCheckItem {
            check: SubmissionCheckType::HasAtLeastOneMaterial,
            passed: has_material,
            reason: (!has_material).then_some("NO_MATERIAL_ATTACHED"),
        },
        SubmissionCheckItem {
            check: SubmissionCheckType::ActionAllowed,
            passed: action_allowed,
            reason: (!action_allowed).then_some("SUBMISSION_NOT_ALLOWED_IN_CURRENT_STAGE"),
        },
    ];

    SubmissionCheckSummary {
        application_id: application.id,
        can_submit: checks.iter().all(|item| item.passed),
        checks,
    }
}
