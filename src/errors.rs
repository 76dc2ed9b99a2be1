use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use thiserror::Error;

/// Errors surfaced by the admin-facing operations.
///
/// Reads never produce these: the aggregation service logs and degrades
/// instead. Writes return them to the caller untouched, with no retry.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required field is missing. Raised before any request is issued.
    #[error("{0}")]
    Validation(String),

    /// Malformed input such as a bad URL, file or query.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Store(#[from] DbErr),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Auth(String),
}

impl ServiceError {
    /// Turn a store `RecordNotFound` into `NotFound`, leave everything else as a store error.
    pub fn from_store(e: DbErr) -> Self {
        match e {
            DbErr::RecordNotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Store(other),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Store(_) | ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
