use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::admission::domain::{
    Application, ApplicationId, ApplicationStatus, Material, MaterialId, MaterialScore,
    NewMaterial, ReviewDecision, ReviewRecord, ReviewRecordId, ReviewerId, ScoreMode, UserId,
};
use crate::workflows::admission::repository::{
    ApplicationStore, MaterialScoreStore, MaterialStore, RepositoryError, ReviewRecordStore,
};
use crate::workflows::admission::{AdmissionService, ReviewPolicy};

pub(super) fn at(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid base timestamp")
        + chrono::Duration::seconds(seconds)
}

pub(super) fn record(
    id: u64,
    reviewer: u64,
    version: u32,
    decision: ReviewDecision,
    seconds: i64,
) -> ReviewRecord {
    ReviewRecord {
        id: ReviewRecordId(id),
        material_id: MaterialId(1),
        material_version: version,
        reviewer_id: ReviewerId(reviewer),
        decision,
        comment: None,
        created_at: at(seconds),
    }
}

pub(super) fn essay() -> NewMaterial {
    NewMaterial {
        category: "ESSAY".to_string(),
        content: Some("Research statement".to_string()),
        attachment_ref: None,
        declared_score: None,
        score_mode: ScoreMode::None,
    }
}

pub(super) fn language_certificate(declared_score: f64) -> NewMaterial {
    NewMaterial {
        category: "LANGUAGE_CERTIFICATE".to_string(),
        content: None,
        attachment_ref: Some("s3://admission/materials/toefl.pdf".to_string()),
        declared_score: Some(declared_score),
        score_mode: ScoreMode::Declared,
    }
}

pub(super) fn policy() -> ReviewPolicy {
    ReviewPolicy::with_arbiters([ReviewerId(1)])
}

#[derive(Default)]
pub(super) struct MemoryApplications {
    records: Mutex<HashMap<ApplicationId, Application>>,
}

impl ApplicationStore for MemoryApplications {
    fn find_by_id(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn find_draft_by_user(&self, user_id: UserId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .find(|app| app.user_id == user_id && app.status == ApplicationStatus::Draft)
            .cloned())
    }

    fn save(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        guard.insert(application.id, application.clone());
        Ok(application)
    }

    fn find_all(&self) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        let mut all: Vec<Application> = guard.values().cloned().collect();
        all.sort_by_key(|app| app.id);
        Ok(all)
    }
}

#[derive(Default)]
pub(super) struct MemoryMaterials {
    records: Mutex<HashMap<MaterialId, Material>>,
}

impl MaterialStore for MemoryMaterials {
    fn find_by_id(&self, id: MaterialId) -> Result<Option<Material>, RepositoryError> {
        let guard = self.records.lock().expect("material mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn find_by_application_id(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<Material>, RepositoryError> {
        let guard = self.records.lock().expect("material mutex poisoned");
        let mut matching: Vec<Material> = guard
            .values()
            .filter(|material| material.application_id == application_id)
            .cloned()
            .collect();
        matching.sort_by_key(|material| material.id);
        Ok(matching)
    }

    fn save(&self, material: Material) -> Result<Material, RepositoryError> {
        let mut guard = self.records.lock().expect("material mutex poisoned");
        guard.insert(material.id, material.clone());
        Ok(material)
    }

    fn delete(&self, material: &Material) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("material mutex poisoned");
        guard
            .remove(&material.id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub(super) struct MemoryReviews {
    records: Mutex<Vec<ReviewRecord>>,
}

impl ReviewRecordStore for MemoryReviews {
    fn find_by_material_id(
        &self,
        material_id: MaterialId,
    ) -> Result<Vec<ReviewRecord>, RepositoryError> {
        let guard = self.records.lock().expect("review mutex poisoned");
        Ok(guard
            .iter()
            .filter(|rec| rec.material_id == material_id)
            .cloned()
            .collect())
    }

    fn save(&self, rec: ReviewRecord) -> Result<ReviewRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("review mutex poisoned");
        guard.push(rec.clone());
        Ok(rec)
    }
}

#[derive(Default)]
pub(super) struct MemoryScores {
    records: Mutex<Vec<MaterialScore>>,
}

impl MaterialScoreStore for MemoryScores {
    fn find_by_material_id_and_version(
        &self,
        material_id: MaterialId,
        material_version: u32,
    ) -> Result<Vec<MaterialScore>, RepositoryError> {
        let guard = self.records.lock().expect("score mutex poisoned");
        Ok(guard
            .iter()
            .filter(|score| {
                score.material_id == material_id && score.material_version == material_version
            })
            .cloned()
            .collect())
    }

    fn save(&self, score: MaterialScore) -> Result<MaterialScore, RepositoryError> {
        let mut guard = self.records.lock().expect("score mutex poisoned");
        guard.push(score.clone());
        Ok(score)
    }
}

/// Fails every call, for exercising error propagation.
pub(super) struct UnavailableApplications;

impl ApplicationStore for UnavailableApplications {
    fn find_by_id(&self, _id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_draft_by_user(
        &self,
        _user_id: UserId,
    ) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_all(&self) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type MemoryService =
    AdmissionService<MemoryApplications, MemoryMaterials, MemoryReviews, MemoryScores>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryApplications>,
    Arc<MemoryMaterials>,
    Arc<MemoryReviews>,
    Arc<MemoryScores>,
) {
    let applications = Arc::new(MemoryApplications::default());
    let materials = Arc::new(MemoryMaterials::default());
    let reviews = Arc::new(MemoryReviews::default());
    let scores = Arc::new(MemoryScores::default());
    let service = AdmissionService::new(
        applications.clone(),
        materials.clone(),
        reviews.clone(),
        scores.clone(),
        policy(),
    );
    (service, applications, materials, reviews, scores)
}

/// Draft with one non-scoring material attached, ready to submit.
pub(super) fn draft_with_essay(service: &MemoryService, user: u64) -> (Application, Material) {
    let draft = service
        .create_draft(UserId(user))
        .expect("draft created");
    let material = service
        .create_material(draft.id, essay())
        .expect("material attached");
    (draft, material)
}

/// Submitted application with one non-scoring material.
pub(super) fn submitted_with_essay(service: &MemoryService, user: u64) -> (Application, Material) {
    let (draft, material) = draft_with_essay(service, user);
    let submitted = service
        .submit(UserId(user), draft.id)
        .expect("submission allowed");
    (submitted, material)
}
