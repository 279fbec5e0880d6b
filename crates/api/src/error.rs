use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use costume_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and renders every failure as
/// `{"error": message, "code": CODE}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn classify(&self) -> (StatusCode, &'static str, String) {
        let AppError::Core(core) = self;
        match core {
            CoreError::InvalidIdentifier(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_IDENTIFIER", core.to_string())
            }
            CoreError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            CoreError::Unauthenticated(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", msg.clone())
            }
            CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            CoreError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            CoreError::NotLinked { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string()),
            CoreError::DuplicateSequenceNumber { .. } => {
                (StatusCode::CONFLICT, "DUPLICATE_SEQUENCE_NUMBER", core.to_string())
            }
            CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            CoreError::CascadeFailed { stage, entity, reason } => {
                tracing::error!(
                    stage = %stage,
                    entity = %entity,
                    reason = %reason,
                    "Cascade failed",
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CASCADE_FAILED",
                    format!("Operation stopped at step '{stage}' on {entity}"),
                )
            }
            CoreError::StoreUnavailable(msg) => {
                tracing::error!(error = %msg, "Store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE",
                    "The data store is unavailable".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();
        let body = json!({
            "error": message,
            "code": code,
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costume_core::kinds::{EntityKind, EntityRef};
    use costume_core::types::new_id;

    fn status_of(err: CoreError) -> StatusCode {
        AppError::from(err).classify().0
    }

    #[test]
    fn core_errors_map_to_statuses() {
        assert_eq!(
            status_of(CoreError::InvalidIdentifier("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(CoreError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(CoreError::Unauthenticated("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(CoreError::forbidden()), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(CoreError::NotFound { entity: "Project", id: new_id() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoreError::NotLinked {
                entity: "Measurements",
                parent: EntityRef::new(EntityKind::Character, new_id()),
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoreError::DuplicateSequenceNumber { number: 2, next_free: 5 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CoreError::cascade(
                "children_purged",
                EntityRef::new(EntityKind::Costume, new_id()),
                "boom"
            )),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(CoreError::StoreUnavailable("x".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn duplicate_number_message_names_the_next_free_number() {
        let err = CoreError::DuplicateSequenceNumber {
            number: 2,
            next_free: 5,
        };
        let (_, code, message) = AppError::from(err).classify();
        assert_eq!(code, "DUPLICATE_SEQUENCE_NUMBER");
        assert!(message.contains('5'));
    }
}
