use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub u64);

/// Identifier wrapper for supporting materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u64);

/// Identifier wrapper for review records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewRecordId(pub u64);

/// Identifier wrapper for reviewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewerId(pub u64);

/// Identifier wrapper for approved score records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialScoreId(pub u64);

/// Identifier wrapper for the applicant owning an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ReviewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status tracked on every application. Transitions only move
/// forward; `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "DRAFT",
            ApplicationStatus::Submitted => "SUBMITTED",
            ApplicationStatus::UnderReview => "UNDER_REVIEW",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a material carries an applicant-declared score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreMode {
    /// Qualification-only material; reviewed pass/reject, never scored.
    None,
    /// Applicant declares a score that reviewers confirm.
    Declared,
}

/// Individual reviewer decision on one material version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Pass,
    Reject,
}

/// An application owned by a single user. At most one draft exists per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn create_draft(id: ApplicationId, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            status: ApplicationStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Snapshot with a new status and refreshed `updated_at`. Guarded
    /// transitions live in the lifecycle module; this only produces the value.
    pub(crate) fn with_status(self, status: ApplicationStatus, now: DateTime<Utc>) -> Self {
        Self {
            status,
            updated_at: now,
            ..self
        }
    }
}

/// A versioned supporting material. The version increments on every accepted
/// content edit or revision, invalidating prior review records for
/// aggregation while keeping them for history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub application_id: ApplicationId,
    pub category: String,
    pub content: Option<String>,
    pub attachment_ref: Option<String>,
    pub declared_score: f64,
    pub score_mode: ScoreMode,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Material {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: MaterialId,
        application_id: ApplicationId,
        category: String,
        content: Option<String>,
        attachment_ref: Option<String>,
        declared_score: f64,
        score_mode: ScoreMode,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            application_id,
            category,
            content,
            attachment_ref,
            declared_score,
            score_mode,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Pre-submission content edit. Always advances the version.
    pub fn with_content(
        self,
        content: Option<String>,
        attachment_ref: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            content,
            attachment_ref,
            version: self.version + 1,
            updated_at: now,
            ..self
        }
    }

    /// Under-review revision applying only the supplied fields. Always
    /// advances the version, which retires earlier review records from
    /// aggregation.
    pub fn revised(self, revision: MaterialRevision, declared_score: f64, now: DateTime<Utc>) -> Self {
        Self {
            content: revision.description.or(self.content),
            attachment_ref: revision.attachment_ref.or(self.attachment_ref),
            declared_score,
            version: self.version + 1,
            updated_at: now,
            ..self
        }
    }
}

/// Applicant-provided snapshot for attaching a new material to a draft
/// application. Validation happens at intake, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMaterial {
    pub category: String,
    pub content: Option<String>,
    pub attachment_ref: Option<String>,
    pub declared_score: Option<f64>,
    pub score_mode: ScoreMode,
}

/// Fields an applicant may change when revising a rejected material. `None`
/// leaves the current value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialRevision {
    pub description: Option<String>,
    pub attachment_ref: Option<String>,
    pub declared_score: Option<f64>,
}

/// One reviewer decision cast against a specific material version. Several
/// records may exist for the same (material, version, reviewer); only the
/// most recent is effective after folding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: ReviewRecordId,
    pub material_id: MaterialId,
    pub material_version: u32,
    pub reviewer_id: ReviewerId,
    pub decision: ReviewDecision,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Immutable approved score for one material version. At most one exists per
/// (material, version); the engine enforces this, not just the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialScore {
    pub id: MaterialScoreId,
    pub material_id: MaterialId,
    pub material_version: u32,
    pub approved_score: f64,
    pub decided_at: DateTime<Utc>,
}

impl MaterialScore {
    pub fn new(
        id: MaterialScoreId,
        material_id: MaterialId,
        material_version: u32,
        approved_score: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            material_id,
            material_version,
            approved_score,
            decided_at: now,
        }
    }
}
