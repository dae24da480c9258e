use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::db::DbError;
use crate::schema::SchemaError;
use crate::utils::response::create_error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid JSON document: {0}")]
    InvalidDocument(String),

    #[error("Unknown reference: {0}")]
    UnknownReference(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Database error")]
    Database(#[source] DbError),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Maps a unique-constraint failure to a conflict naming the offending value.
    pub fn unique(err: DbError, detail: impl FnOnce() -> String) -> Self {
        match err {
            DbError::UniqueViolation(_) => AppError::Conflict(detail()),
            other => other.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::InvalidDocument(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownReference(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppError::UnsupportedMediaType(_) => "Unsupported media type",
            AppError::InvalidDocument(_) => "Invalid JSON document",
            AppError::UnknownReference(_) => "Unknown reference",
            AppError::NotFound(_) => "Not found",
            AppError::Conflict(_) => "Already exists",
            AppError::Database(_) => "Database error",
            AppError::Internal(_) => "Internal server error",
        }
    }

    fn log(&self) {
        match self {
            AppError::UnsupportedMediaType(msg)
            | AppError::InvalidDocument(msg)
            | AppError::UnknownReference(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => {
                warn!(status = %self.status_code(), message = %msg, "Request rejected");
            }
            AppError::Database(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::Internal(msg) => {
                error!(message = %msg, "Internal error");
            }
        }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(_) => {
                AppError::Conflict("A resource with the same key already exists".to_string())
            }
            DbError::ForeignKeyViolation(_) => {
                AppError::UnknownReference("A referenced resource does not exist".to_string())
            }
            DbError::CheckViolation(_) => {
                AppError::InvalidDocument("A value is outside its allowed range".to_string())
            }
            other => AppError::Database(other),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        DbError::from(err).into()
    }
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Invalid(msg) => AppError::InvalidDocument(msg),
            compile => AppError::Internal(compile.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal details
        self.log();

        // Storage failures never reach the client verbatim
        let public_message = match &self {
            AppError::UnsupportedMediaType(msg)
            | AppError::InvalidDocument(msg)
            | AppError::UnknownReference(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Internal(_) => "The server could not complete the request".to_string(),
        };

        create_error_response(status, self.title(), &public_message)
    }
}
