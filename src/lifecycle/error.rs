use crate::opening_hours::OpeningHoursError;
use crate::versioning::{ChainError, TransitionError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use std::fmt;

/// Errors of the versioning and publishing operations.
#[derive(Debug)]
pub enum LifecycleError {
    NotFound(String),
    /// The operation does not apply to the version in its current state
    Conflict(String),
    Validation(String),
    Transition(TransitionError),
    /// Stored data breaks a versioning invariant
    Integrity(ChainError),
    Database(DbErr),
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::NotFound(msg) => write!(f, "Not found: {}", msg),
            LifecycleError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            LifecycleError::Validation(msg) => write!(f, "Invalid input: {}", msg),
            LifecycleError::Transition(e) => write!(f, "Invalid status change: {}", e),
            LifecycleError::Integrity(e) => write!(f, "Broken version chain: {}", e),
            LifecycleError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for LifecycleError {}

impl From<DbErr> for LifecycleError {
    fn from(e: DbErr) -> Self {
        LifecycleError::Database(e)
    }
}

impl From<TransitionError> for LifecycleError {
    fn from(e: TransitionError) -> Self {
        LifecycleError::Transition(e)
    }
}

impl From<ChainError> for LifecycleError {
    fn from(e: ChainError) -> Self {
        LifecycleError::Integrity(e)
    }
}

impl From<OpeningHoursError> for LifecycleError {
    fn from(e: OpeningHoursError) -> Self {
        LifecycleError::Validation(e.to_string())
    }
}

impl From<validator::ValidationErrors> for LifecycleError {
    fn from(e: validator::ValidationErrors) -> Self {
        LifecycleError::Validation(e.to_string())
    }
}

impl ResponseError for LifecycleError {
    fn status_code(&self) -> StatusCode {
        match self {
            LifecycleError::NotFound(_) => StatusCode::NOT_FOUND,
            LifecycleError::Conflict(_) => StatusCode::CONFLICT,
            LifecycleError::Validation(_) => StatusCode::BAD_REQUEST,
            LifecycleError::Transition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LifecycleError::Integrity(_) | LifecycleError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let LifecycleError::Database(e) = self {
            log::error!("Database error: {}", e);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
