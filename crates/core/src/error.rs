use crate::kinds::EntityRef;
use crate::types::EntityId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    /// `parent` exists but has no linked `entity`.
    #[error("{parent} has no {entity}")]
    NotLinked {
        entity: &'static str,
        parent: EntityRef,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A costume number is already used by another costume of the same character.
    #[error("Costume number {number} is already taken. The next available number is {next_free}")]
    DuplicateSequenceNumber { number: i32, next_free: i32 },

    /// A multi-step mutation stopped part way through. `stage` names the step
    /// that failed and `entity` the record it was operating on, so the state
    /// can be reconciled by hand.
    #[error("Cascade failed at step '{stage}' on {entity}: {reason}")]
    CascadeFailed {
        stage: String,
        entity: EntityRef,
        reason: String,
    },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Shorthand used by ownership checks. The message never says whether the
    /// entity exists.
    pub fn forbidden() -> Self {
        CoreError::Forbidden("Access forbidden.".to_string())
    }

    /// Wrap any error raised while executing `stage` on `entity`.
    pub fn cascade(stage: impl Into<String>, entity: EntityRef, reason: impl ToString) -> Self {
        CoreError::CascadeFailed {
            stage: stage.into(),
            entity,
            reason: reason.to_string(),
        }
    }
}
