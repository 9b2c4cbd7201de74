//! Centralized error handling.
//!
//! A single `AppError` covers the whole service: repository failures,
//! business-rule violations and collaborator (hashing/encryption) errors.
//! Every failure carries enough context for the transport layer to render
//! a stable `(kind, message, entity, field, value)` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// A referenced id/name/key does not exist.
    #[error("{entity} with {field} '{value}' not found")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Unique-key collision on create/update.
    #[error("Another {entity} with {field} '{value}' exists")]
    Conflict {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Operation attempted on a deleted/inactive resource that requires liveness.
    #[error("{entity} with {field} '{value}' is not active")]
    NotActive {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Business-rule violation attributable to caller intent
    /// (self-verification, wrong old password, ...).
    #[error("{0}")]
    Client(String),

    /// Malformed payload.
    #[error("{0}")]
    Validation(String),

    /// A collaborator (hashing, field encryption) returned an unusable result.
    #[error("Processing error: {0}")]
    Processing(String),

    /// Persistence failure. No recovery path; the in-flight operation aborts.
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    /// Any other unrecoverable internal failure.
    #[error("Internal server error")]
    Internal(String),
}

/// Structured error body returned to the transport layer.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl AppError {
    /// Stable error code for clients
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::NotActive { .. } => "NOT_ACTIVE",
            AppError::Client(_) => "CLIENT_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Processing(_) => "PROCESSING_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotActive { .. } => StatusCode::PRECONDITION_FAILED,
            AppError::Client(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Processing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }

    fn subject(&self) -> (Option<&'static str>, Option<&'static str>, Option<String>) {
        match self {
            AppError::NotFound {
                entity,
                field,
                value,
            }
            | AppError::Conflict {
                entity,
                field,
                value,
            }
            | AppError::NotActive {
                entity,
                field,
                value,
            } => (Some(entity), Some(field), Some(value.clone())),
            _ => (None, None, None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (entity, field, value) = self.subject();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.user_message(),
                entity,
                field,
                value,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        AppError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn conflict(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        AppError::Conflict {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn not_active(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        AppError::NotActive {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn client(msg: impl Into<String>) -> Self {
        AppError::Client(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        AppError::Processing(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_subject() {
        let err = AppError::not_found("Branch", "SolId", "KLA01");
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "Branch with SolId 'KLA01' not found");
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = AppError::conflict("User", "Username", "jdoe");
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn not_active_maps_to_412() {
        let err = AppError::not_active("Branch", "BranchId", 7);
        assert_eq!(err.status(), StatusCode::PRECONDITION_FAILED);
    }
}
