use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregation::Verdict;
use super::domain::{
    ApplicationId, ApplicationStatus, Material, MaterialId, MaterialScore, ScoreMode,
};

/// Precondition failures for creating an approved score. Each violation is
/// distinct so callers can tell a duplicate from a gating problem.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("material is non-scoring")]
    NonScoringMaterial,
    #[error("application must be under review to approve a score")]
    ApplicationNotUnderReview,
    #[error("material verdict is {verdict}, expected ALL_PASS")]
    VerdictNotAllPass { verdict: Verdict },
    #[error("a score already exists for material {material} at version {version}")]
    DuplicateScore { material: MaterialId, version: u32 },
}

/// Check every precondition for approving a score on the material's current
/// version. Order matters: gating problems surface before the duplicate
/// check. Retries after a failure re-validate from scratch.
pub fn validate_score_creation(
    material: &Material,
    application_status: ApplicationStatus,
    verdict: Verdict,
    existing: &[MaterialScore],
) -> Result<(), ScoreError> {
    if material.score_mode == ScoreMode::None {
        return Err(ScoreError::NonScoringMaterial);
    }
    if application_status != ApplicationStatus::UnderReview {
        return Err(ScoreError::ApplicationNotUnderReview);
    }
    if !verdict.is_all_pass() {
        return Err(ScoreError::VerdictNotAllPass { verdict });
    }
    if !existing.is_empty() {
        return Err(ScoreError::DuplicateScore {
            material: material.id,
            version: material.version,
        });
    }
    Ok(())
}

/// One material's scoring state at its current version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialScoreItem {
    pub material_id: MaterialId,
    pub material_version: u32,
    pub declared_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_score: Option<f64>,
    pub has_score: bool,
}

/// Read-only score rollup for an application: per-material approved scores at
/// the current version, their total, and which scoring materials still lack
/// one. Never writes or transitions anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub application_id: ApplicationId,
    pub items: Vec<MaterialScoreItem>,
    pub total_approved_score: f64,
    pub missing_score_material_ids: Vec<MaterialId>,
    pub generated_at: DateTime<Utc>,
}

/// Build the score summary from each material paired with its score at the
/// material's current version, if any.
pub fn score_summary(
    application_id: ApplicationId,
    entries: &[(Material, Option<MaterialScore>)],
    now: DateTime<Utc>,
) -> ScoreSummary {
    let mut items = Vec::with_capacity(entries.len());
    let mut total = 0.0;
    let mut missing = Vec::new();

    for (material, score) in entries {
        let approved = score.as_ref().map(|score| score.approved_score);
        if let Some(value) = approved {
            total += value;
        } else if material.score_mode == ScoreMode::Declared {
            missing.push(material.id);
        }
        items.push(MaterialScoreItem {
            material_id: material.id,
            material_version: material.version,
            declared_score: material.declared_score,
            approved_score: approved,
            has_score: approved.is_some(),
        });
    }

    ScoreSummary {
        application_id,
        items,
        total_approved_score: total,
        missing_score_material_ids: missing,
        generated_at: now,
    }
}
