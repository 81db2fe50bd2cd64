use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::aggregation::{ReviewAggregator, ReviewPolicy, Verdict};
use super::domain::{
    Application, ApplicationId, ApplicationStatus, Material, MaterialId, MaterialRevision,
    MaterialScore, MaterialScoreId, NewMaterial, ReviewDecision, ReviewRecord, ReviewRecordId,
    ReviewerId, UserId,
};
use super::evaluation::{decide_transition, TransitionDecision};
use super::lifecycle::{self, ApplicationAction, ApplicationStage};
use super::report::{
    ApplicationDashboard, ApplicationOverview, ApplicationReviewSummary, LifecycleSummary,
    MaterialReviewSummary,
};
use super::repository::{
    ApplicationStore, MaterialScoreStore, MaterialStore, RepositoryError, ReviewRecordStore,
};
use super::scoring::{self, ScoreError, ScoreSummary};
use super::submission::{evaluate_submission, SubmissionCheckSummary};
use super::validation::{self, ValidationError};

/// Error raised by the admission service. Every failure aborts the unit of
/// work before any mutation.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),
    #[error("material {0} not found")]
    MaterialNotFound(MaterialId),
    #[error("material {material} does not belong to application {application}")]
    ForeignMaterial {
        material: MaterialId,
        application: ApplicationId,
    },
    #[error("user {0} already has a draft application")]
    DraftAlreadyExists(UserId),
    #[error("application belongs to another user")]
    Forbidden,
    #[error("cannot {action} while the application is {status}")]
    InvalidState {
        action: &'static str,
        status: ApplicationStatus,
    },
    #[error("submission blocked: {0}")]
    SubmissionBlocked(&'static str),
    #[error("material verdict is {verdict}, revision requires HAS_REJECT")]
    RevisionNotAllowed { verdict: Verdict },
    #[error(transparent)]
    Lifecycle(#[from] lifecycle::LifecycleError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static MATERIAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static REVIEW_RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static MATERIAL_SCORE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    ApplicationId(APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

fn next_material_id() -> MaterialId {
    MaterialId(MATERIAL_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

fn next_review_record_id() -> ReviewRecordId {
    ReviewRecordId(REVIEW_RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

fn next_material_score_id() -> MaterialScoreId {
    MaterialScoreId(MATERIAL_SCORE_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Service composing the four repositories with the review aggregator and
/// lifecycle rules. Each public operation is one synchronous unit of work;
/// concurrent safety beyond that rests on the storage layer.
pub struct AdmissionService<A, M, R, S> {
    applications: Arc<A>,
    materials: Arc<M>,
    reviews: Arc<R>,
    scores: Arc<S>,
    aggregator: ReviewAggregator,
}

impl<A, M, R, S> AdmissionService<A, M, R, S>
where
    A: ApplicationStore,
    M: MaterialStore,
    R: ReviewRecordStore,
    S: MaterialScoreStore,
{
    pub fn new(
        applications: Arc<A>,
        materials: Arc<M>,
        reviews: Arc<R>,
        scores: Arc<S>,
        policy: ReviewPolicy,
    ) -> Self {
        Self {
            applications,
            materials,
            reviews,
            scores,
            aggregator: ReviewAggregator::new(policy),
        }
    }

    // ----- mutating operations -----

    /// Create a draft application. A user may hold at most one draft.
    pub fn create_draft(&self, user_id: UserId) -> Result<Application, AdmissionServiceError> {
        if self.applications.find_draft_by_user(user_id)?.is_some() {
            return Err(AdmissionServiceError::DraftAlreadyExists(user_id));
        }

        let draft = Application::create_draft(next_application_id(), user_id, Utc::now());
        let stored = self.applications.save(draft)?;
        info!(application_id = %stored.id, user_id = %user_id, "draft application created");
        Ok(stored)
    }

    /// Submit a draft. Only the owning user may submit, and all submission
    /// gate checks must pass.
    pub fn submit(
        &self,
        user_id: UserId,
        application_id: ApplicationId,
    ) -> Result<Application, AdmissionServiceError> {
        let application = self.application(application_id)?;
        if application.user_id != user_id {
            return Err(AdmissionServiceError::Forbidden);
        }

        let materials = self.materials.find_by_application_id(application_id)?;
        let gate = evaluate_submission(&application, materials.len());
        if !gate.can_submit {
            return Err(AdmissionServiceError::SubmissionBlocked(
                gate.first_blocker().unwrap_or("SUBMISSION_NOT_ALLOWED"),
            ));
        }

        let submitted = lifecycle::mark_submitted(application, Utc::now())?;
        let stored = self.applications.save(submitted)?;
        info!(application_id = %application_id, "application submitted");
        Ok(stored)
    }

    /// SUBMITTED -> UNDER_REVIEW, normally triggered by the first review
    /// record rather than called directly.
    pub fn start_review(
        &self,
        application_id: ApplicationId,
    ) -> Result<Application, AdmissionServiceError> {
        let application = self.application(application_id)?;
        let reviewing = lifecycle::mark_under_review(application, Utc::now())?;
        let stored = self.applications.save(reviewing)?;
        info!(application_id = %application_id, "application entered review");
        Ok(stored)
    }

    /// Attach a new material to a pre-submission application.
    pub fn create_material(
        &self,
        application_id: ApplicationId,
        new_material: NewMaterial,
    ) -> Result<Material, AdmissionServiceError> {
        let application = self.application(application_id)?;
        self.require_action(&application, ApplicationAction::AddMaterial, "add a material")?;

        validation::validate_material_fields(
            new_material.content.as_deref(),
            new_material.attachment_ref.as_deref(),
        )?;
        let declared_score = validation::normalized_declared_score(
            new_material.score_mode,
            new_material.declared_score,
        )?;

        let material = Material::new(
            next_material_id(),
            application_id,
            new_material.category,
            new_material.content,
            new_material.attachment_ref,
            declared_score,
            new_material.score_mode,
            Utc::now(),
        );
        Ok(self.materials.save(material)?)
    }

    /// Pre-submission content edit; every accepted edit advances the version.
    pub fn update_material_content(
        &self,
        application_id: ApplicationId,
        material_id: MaterialId,
        content: Option<String>,
        attachment_ref: Option<String>,
    ) -> Result<Material, AdmissionServiceError> {
        let application = self.application(application_id)?;
        self.require_action(&application, ApplicationAction::AddMaterial, "edit a material")?;

        let material = self.material_in_application(application_id, material_id)?;
        validation::validate_material_fields(content.as_deref(), attachment_ref.as_deref())?;

        let updated = material.with_content(content, attachment_ref, Utc::now());
        Ok(self.materials.save(updated)?)
    }

    /// Remove a material from a pre-submission application.
    pub fn delete_material(
        &self,
        application_id: ApplicationId,
        material_id: MaterialId,
    ) -> Result<(), AdmissionServiceError> {
        let application = self.application(application_id)?;
        self.require_action(
            &application,
            ApplicationAction::RemoveMaterial,
            "remove a material",
        )?;

        let material = self.material_in_application(application_id, material_id)?;
        Ok(self.materials.delete(&material)?)
    }

    /// Revise a material under review. Allowed only while the material's
    /// current verdict is HAS_REJECT; the new version retires earlier review
    /// records from aggregation.
    pub fn revise_material(
        &self,
        material_id: MaterialId,
        revision: MaterialRevision,
    ) -> Result<Material, AdmissionServiceError> {
        let material = self.material(material_id)?;
        let application = self.application(material.application_id)?;

        if application.status != ApplicationStatus::UnderReview {
            return Err(AdmissionServiceError::InvalidState {
                action: "revise a material",
                status: application.status,
            });
        }

        let records = self.reviews.find_by_material_id(material_id)?;
        let aggregate = self.aggregator.aggregate(&records, material.version);
        if aggregate.verdict != Verdict::HasReject {
            return Err(AdmissionServiceError::RevisionNotAllowed {
                verdict: aggregate.verdict,
            });
        }

        let declared_score = validation::validate_revision(&material, &revision)?;
        let revised = material.revised(revision, declared_score, Utc::now());
        let stored = self.materials.save(revised)?;
        info!(
            material_id = %material_id,
            version = stored.version,
            "material revised"
        );
        Ok(stored)
    }

    /// Record one reviewer decision against the material's current version.
    /// The first record under a SUBMITTED application starts the review.
    pub fn create_review_record(
        &self,
        material_id: MaterialId,
        reviewer_id: ReviewerId,
        decision: ReviewDecision,
        comment: Option<String>,
        material_version: Option<u32>,
    ) -> Result<ReviewRecord, AdmissionServiceError> {
        let material = self.material(material_id)?;
        let version = validation::validate_version_pin(material.version, material_version)?;

        let application = self.application(material.application_id)?;
        match application.status {
            ApplicationStatus::Draft
            | ApplicationStatus::Approved
            | ApplicationStatus::Rejected => {
                return Err(AdmissionServiceError::InvalidState {
                    action: "create a review record",
                    status: application.status,
                });
            }
            ApplicationStatus::Submitted => {
                let application_id = application.id;
                let reviewing = lifecycle::mark_under_review(application, Utc::now())?;
                self.applications.save(reviewing)?;
                info!(application_id = %application_id, "application entered review");
            }
            ApplicationStatus::UnderReview => {}
        }

        let record = ReviewRecord {
            id: next_review_record_id(),
            material_id,
            material_version: version,
            reviewer_id,
            decision,
            comment,
            created_at: Utc::now(),
        };
        Ok(self.reviews.save(record)?)
    }

    /// Re-derive the application status from the current review facts and
    /// commit the resulting transition. The explicit commit counterpart of
    /// the pure `decide_transition`.
    pub fn evaluate_after_review(
        &self,
        application_id: ApplicationId,
    ) -> Result<ApplicationStatus, AdmissionServiceError> {
        let mut application = self.application(application_id)?;

        // Lazy entry into review: the first review fact moves a submitted
        // application into UNDER_REVIEW.
        if application.status == ApplicationStatus::Submitted {
            if !self.has_any_review(application_id)? {
                return Ok(application.status);
            }
            let reviewing = lifecycle::mark_under_review(application, Utc::now())?;
            application = self.applications.save(reviewing)?;
            info!(application_id = %application_id, "application entered review");
        }

        if application.status != ApplicationStatus::UnderReview {
            return Ok(application.status);
        }

        let materials = self.materials.find_by_application_id(application_id)?;
        if materials.is_empty() {
            return Ok(application.status);
        }

        // First rejecting material decides the outcome; remaining materials
        // are not inspected, so hold diagnostics are best-effort.
        let mut aggregates = Vec::with_capacity(materials.len());
        for material in &materials {
            let records = self.reviews.find_by_material_id(material.id)?;
            let aggregate = self.aggregator.aggregate(&records, material.version);
            let rejecting = aggregate.verdict == Verdict::HasReject;
            aggregates.push(aggregate);
            if rejecting {
                break;
            }
        }

        match decide_transition(&aggregates) {
            TransitionDecision::Reject => {
                let rejecting_material = materials[aggregates.len() - 1].id;
                let rejected = lifecycle::mark_rejected(application, Utc::now())?;
                let stored = self.applications.save(rejected)?;
                info!(
                    application_id = %application_id,
                    material_id = %rejecting_material,
                    "application rejected"
                );
                Ok(stored.status)
            }
            TransitionDecision::Approve => {
                let approved = lifecycle::mark_approved(application, Utc::now())?;
                let stored = self.applications.save(approved)?;
                info!(application_id = %application_id, "application approved");
                Ok(stored.status)
            }
            TransitionDecision::Hold(reason) => {
                if let Some(reason) = reason {
                    debug!(
                        application_id = %application_id,
                        reason = reason.label(),
                        "application held under review"
                    );
                }
                Ok(application.status)
            }
        }
    }

    /// Approve the declared score of a material at its current version.
    /// At most one score may ever exist per (material, version).
    pub fn create_score(
        &self,
        material_id: MaterialId,
    ) -> Result<MaterialScore, AdmissionServiceError> {
        let material = self.material(material_id)?;
        let application = self.application(material.application_id)?;

        let records = self.reviews.find_by_material_id(material_id)?;
        let aggregate = self.aggregator.aggregate(&records, material.version);
        let existing = self
            .scores
            .find_by_material_id_and_version(material_id, material.version)?;

        scoring::validate_score_creation(
            &material,
            application.status,
            aggregate.verdict,
            &existing,
        )?;

        let score = MaterialScore::new(
            next_material_score_id(),
            material_id,
            material.version,
            material.declared_score,
            Utc::now(),
        );
        let stored = self.scores.save(score)?;
        info!(
            material_id = %material_id,
            version = material.version,
            approved_score = stored.approved_score,
            "material score approved"
        );
        Ok(stored)
    }

    // ----- read-only views -----

    pub fn get_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Application, AdmissionServiceError> {
        self.application(application_id)
    }

    pub fn materials_of(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<Material>, AdmissionServiceError> {
        self.application(application_id)?;
        Ok(self.materials.find_by_application_id(application_id)?)
    }

    pub fn review_records_of(
        &self,
        material_id: MaterialId,
    ) -> Result<Vec<ReviewRecord>, AdmissionServiceError> {
        self.material(material_id)?;
        Ok(self.reviews.find_by_material_id(material_id)?)
    }

    /// Per-material verdicts and the non-mutating overall conclusion.
    pub fn review_summary(
        &self,
        application_id: ApplicationId,
    ) -> Result<ApplicationReviewSummary, AdmissionServiceError> {
        let application = self.application(application_id)?;
        let materials = self.materials.find_by_application_id(application_id)?;

        let mut summaries = Vec::with_capacity(materials.len());
        for material in &materials {
            let records = self.reviews.find_by_material_id(material.id)?;
            let aggregate = self.aggregator.aggregate(&records, material.version);
            summaries.push(MaterialReviewSummary::from_aggregate(material, aggregate));
        }

        Ok(ApplicationReviewSummary::new(
            application_id,
            application.status,
            summaries,
        ))
    }

    pub fn lifecycle_summary(
        &self,
        application_id: ApplicationId,
    ) -> Result<LifecycleSummary, AdmissionServiceError> {
        let application = self.application(application_id)?;
        let review = self.review_summary(application_id)?;
        Ok(LifecycleSummary::derive(
            &application,
            review.overall_conclusion,
        ))
    }

    pub fn submission_check(
        &self,
        application_id: ApplicationId,
    ) -> Result<SubmissionCheckSummary, AdmissionServiceError> {
        let application = self.application(application_id)?;
        let materials = self.materials.find_by_application_id(application_id)?;
        Ok(evaluate_submission(&application, materials.len()))
    }

    /// Approved scores of every material at its current version, their
    /// total, and which scoring materials still lack one.
    pub fn score_summary(
        &self,
        application_id: ApplicationId,
    ) -> Result<ScoreSummary, AdmissionServiceError> {
        self.application(application_id)?;
        let materials = self.materials.find_by_application_id(application_id)?;

        let mut entries = Vec::with_capacity(materials.len());
        for material in materials {
            let score = self
                .scores
                .find_by_material_id_and_version(material.id, material.version)?
                .into_iter()
                .next();
            entries.push((material, score));
        }

        Ok(scoring::score_summary(application_id, &entries, Utc::now()))
    }

    pub fn overviews(&self) -> Result<Vec<ApplicationOverview>, AdmissionServiceError> {
        let applications = self.applications.find_all()?;
        let mut overviews = Vec::with_capacity(applications.len());
        for application in applications {
            let review = self.review_summary(application.id)?;
            overviews.push(ApplicationOverview {
                application_id: application.id,
                application_status: application.status,
                stage: ApplicationStage::from_status(application.status),
                overall_conclusion: review.overall_conclusion,
            });
        }
        Ok(overviews)
    }

    /// One read model bundling review, score, and submission explanations.
    pub fn dashboard(
        &self,
        application_id: ApplicationId,
    ) -> Result<ApplicationDashboard, AdmissionServiceError> {
        let application = self.application(application_id)?;
        Ok(ApplicationDashboard {
            application_id,
            application_status: application.status,
            review_summary: self.review_summary(application_id)?,
            score_summary: self.score_summary(application_id)?,
            submission_check: self.submission_check(application_id)?,
            generated_at: Utc::now(),
        })
    }

    // ----- helpers -----

    fn application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Application, AdmissionServiceError> {
        self.applications
            .find_by_id(application_id)?
            .ok_or(AdmissionServiceError::ApplicationNotFound(application_id))
    }

    fn material(&self, material_id: MaterialId) -> Result<Material, AdmissionServiceError> {
        self.materials
            .find_by_id(material_id)?
            .ok_or(AdmissionServiceError::MaterialNotFound(material_id))
    }

    fn material_in_application(
        &self,
        application_id: ApplicationId,
        material_id: MaterialId,
    ) -> Result<Material, AdmissionServiceError> {
        let material = self.material(material_id)?;
        if material.application_id != application_id {
            return Err(AdmissionServiceError::ForeignMaterial {
                material: material_id,
                application: application_id,
            });
        }
        Ok(material)
    }

    fn require_action(
        &self,
        application: &Application,
        action: ApplicationAction,
        description: &'static str,
    ) -> Result<(), AdmissionServiceError> {
        let stage = ApplicationStage::from_status(application.status);
        if !stage.allows(action) {
            return Err(AdmissionServiceError::InvalidState {
                action: description,
                status: application.status,
            });
        }
        Ok(())
    }

    fn has_any_review(
        &self,
        application_id: ApplicationId,
    ) -> Result<bool, AdmissionServiceError> {
        let materials = self.materials.find_by_application_id(application_id)?;
        for material in materials {
            if !self.reviews.find_by_material_id(material.id)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
