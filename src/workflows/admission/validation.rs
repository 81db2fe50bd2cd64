use super::domain::{Material, MaterialRevision, ScoreMode};

/// Field-level validation failures. Each carries its specific reason; nothing
/// is partially committed when one is raised.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("content and attachment reference cannot both be absent")]
    MissingContent,
    #[error("declared score is required for a declared-score material")]
    MissingDeclaredScore,
    #[error("declared score cannot be negative")]
    NegativeDeclaredScore,
    #[error("revision must change at least one field")]
    NothingToRevise,
    #[error("material version mismatch (current {current}, provided {provided})")]
    VersionMismatch { current: u32, provided: u32 },
}

/// Content and attachment reference may not be simultaneously absent.
pub fn validate_material_fields(
    content: Option<&str>,
    attachment_ref: Option<&str>,
) -> Result<(), ValidationError> {
    if content.is_none() && attachment_ref.is_none() {
        return Err(ValidationError::MissingContent);
    }
    Ok(())
}

/// Score-mode rules: `None` forces the declared score to zero, `Declared`
/// requires a present, non-negative score. Returns the effective score.
pub fn normalized_declared_score(
    score_mode: ScoreMode,
    declared_score: Option<f64>,
) -> Result<f64, ValidationError> {
    match score_mode {
        ScoreMode::None => Ok(0.0),
        ScoreMode::Declared => {
            let score = declared_score.ok_or(ValidationError::MissingDeclaredScore)?;
            if score < 0.0 {
                return Err(ValidationError::NegativeDeclaredScore);
            }
            Ok(score)
        }
    }
}

/// Validate a revision against the material being revised and return the
/// declared score the new version will carry.
///
/// The change check runs against the incoming fields before score
/// normalization, so a no-op request fails even for non-scoring materials.
pub fn validate_revision(
    material: &Material,
    revision: &MaterialRevision,
) -> Result<f64, ValidationError> {
    if revision.description.is_none()
        && revision.attachment_ref.is_none()
        && revision.declared_score.is_none()
    {
        return Err(ValidationError::NothingToRevise);
    }

    match material.score_mode {
        ScoreMode::None => Ok(0.0),
        ScoreMode::Declared => {
            // A revision may keep the declared score by omitting it.
            let score = revision.declared_score.unwrap_or(material.declared_score);
            if score < 0.0 {
                return Err(ValidationError::NegativeDeclaredScore);
            }
            Ok(score)
        }
    }
}

/// A review record may pin the version it was cast against; a stale pin is
/// rejected rather than silently re-targeted.
pub fn validate_version_pin(current: u32, provided: Option<u32>) -> Result<u32, ValidationError> {
    match provided {
        Some(version) if version != current => {
            Err(ValidationError::VersionMismatch { current, provided: version })
        }
        Some(version) => Ok(version),
        None => Ok(current),
    }
}
