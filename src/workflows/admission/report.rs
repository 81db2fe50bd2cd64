use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregation::{MaterialAggregate, Verdict};
use super::domain::{Application, ApplicationId, ApplicationStatus, Material, MaterialId};
use super::lifecycle::{
    allowed_actions, blocked_actions, ApplicationAction, ApplicationStage, BlockedAction,
};
use super::scoring::ScoreSummary;
use super::submission::SubmissionCheckSummary;

/// Application-level reading of the material verdicts, independent of the
/// committed status (the status only changes through the evaluator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationConclusion {
    Approved,
    Rejected,
    UnderReview,
}

impl ApplicationConclusion {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationConclusion::Approved => "APPROVED",
            ApplicationConclusion::Rejected => "REJECTED",
            ApplicationConclusion::UnderReview => "UNDER_REVIEW",
        }
    }
}

/// Why one material is not (yet) passing, as shown to readers of the review
/// summary. Both incompleteness reasons surface as the reviewer-count gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialBlockingReason {
    NotEnoughReviewers,
    Conflict,
    HasReject,
}

/// Aggregated review state of one material for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialReviewSummary {
    pub material_id: MaterialId,
    pub current_version: u32,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_reason: Option<MaterialBlockingReason>,
    pub effective_reviewer_count: usize,
}

impl MaterialReviewSummary {
    pub fn from_aggregate(material: &Material, aggregate: MaterialAggregate) -> Self {
        let blocking_reason = match aggregate.verdict {
            Verdict::AllPass => None,
            Verdict::Incomplete(_) => Some(MaterialBlockingReason::NotEnoughReviewers),
            Verdict::Conflict => Some(MaterialBlockingReason::Conflict),
            Verdict::HasReject => Some(MaterialBlockingReason::HasReject),
        };
        Self {
            material_id: material.id,
            current_version: material.version,
            verdict: aggregate.verdict,
            blocking_reason,
            effective_reviewer_count: aggregate.reviewer_count,
        }
    }
}

/// Read-only explanation of an application's review state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationReviewSummary {
    pub application_id: ApplicationId,
    pub application_status: ApplicationStatus,
    pub materials: Vec<MaterialReviewSummary>,
    pub overall_conclusion: ApplicationConclusion,
}

impl ApplicationReviewSummary {
    pub fn new(
        application_id: ApplicationId,
        application_status: ApplicationStatus,
        materials: Vec<MaterialReviewSummary>,
    ) -> Self {
        let overall_conclusion = conclusion_of(&materials);
        Self {
            application_id,
            application_status,
            materials,
            overall_conclusion,
        }
    }

    pub fn material(&self, material_id: MaterialId) -> Option<&MaterialReviewSummary> {
        self.materials
            .iter()
            .find(|summary| summary.material_id == material_id)
    }
}

/// Unlike the evaluator's committed transition, this reading never
/// short-circuits; it describes all materials as they stand.
fn conclusion_of(materials: &[MaterialReviewSummary]) -> ApplicationConclusion {
    if materials
        .iter()
        .any(|summary| summary.verdict == Verdict::HasReject)
    {
        return ApplicationConclusion::Rejected;
    }
    if !materials.is_empty() && materials.iter().all(|summary| summary.verdict.is_all_pass()) {
        return ApplicationConclusion::Approved;
    }
    ApplicationConclusion::UnderReview
}

/// Read-only explanation of the lifecycle stage and permitted actions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleSummary {
    pub application_id: ApplicationId,
    pub application_status: ApplicationStatus,
    pub stage: ApplicationStage,
    pub overall_conclusion: ApplicationConclusion,
    pub allowed_actions: Vec<ApplicationAction>,
    pub blocked_actions: Vec<BlockedAction>,
}

impl LifecycleSummary {
    pub fn derive(application: &Application, overall_conclusion: ApplicationConclusion) -> Self {
        let stage = ApplicationStage::from_status(application.status);
        Self {
            application_id: application.id,
            application_status: application.status,
            stage,
            overall_conclusion,
            allowed_actions: allowed_actions(stage).to_vec(),
            blocked_actions: blocked_actions(stage),
        }
    }
}

/// Per-application row of the global overview listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationOverview {
    pub application_id: ApplicationId,
    pub application_status: ApplicationStatus,
    pub stage: ApplicationStage,
    pub overall_conclusion: ApplicationConclusion,
}

/// Single read model bundling every explanation view of one application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationDashboard {
    pub application_id: ApplicationId,
    pub application_status: ApplicationStatus,
    pub review_summary: ApplicationReviewSummary,
    pub score_summary: ScoreSummary,
    pub submission_check: SubmissionCheckSummary,
    pub generated_at: DateTime<Utc>,
}
