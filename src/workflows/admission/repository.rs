use super::domain::{
    Application, ApplicationId, Material, MaterialId, MaterialScore, ReviewRecord, UserId,
};

/// Error enumeration for repository failures. The engine performs no locking;
/// uniqueness and isolation are the storage layer's responsibility.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over applications.
pub trait ApplicationStore: Send + Sync {
    fn find_by_id(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn find_draft_by_user(&self, user_id: UserId) -> Result<Option<Application>, RepositoryError>;
    fn save(&self, application: Application) -> Result<Application, RepositoryError>;
    fn find_all(&self) -> Result<Vec<Application>, RepositoryError>;
}

/// Storage abstraction over materials.
pub trait MaterialStore: Send + Sync {
    fn find_by_id(&self, id: MaterialId) -> Result<Option<Material>, RepositoryError>;
    fn find_by_application_id(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<Material>, RepositoryError>;
    fn save(&self, material: Material) -> Result<Material, RepositoryError>;
    fn delete(&self, material: &Material) -> Result<(), RepositoryError>;
}

/// Storage abstraction over review records. Records are append-only; stale
/// versions stay for history and are filtered out during folding.
pub trait ReviewRecordStore: Send + Sync {
    fn find_by_material_id(
        &self,
        material_id: MaterialId,
    ) -> Result<Vec<ReviewRecord>, RepositoryError>;
    fn save(&self, record: ReviewRecord) -> Result<ReviewRecord, RepositoryError>;
}

/// Storage abstraction over approved material scores.
pub trait MaterialScoreStore: Send + Sync {
    fn find_by_material_id_and_version(
        &self,
        material_id: MaterialId,
        material_version: u32,
    ) -> Result<Vec<MaterialScore>, RepositoryError>;
    fn save(&self, score: MaterialScore) -> Result<MaterialScore, RepositoryError>;
}
