use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::repository::RepoError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `FOREIGN_KEY_VIOLATION`, `CONFLICT`, `CASCADE_FAILED`,
    /// `STORE_UNAVAILABLE`, `INTERNAL_ERROR`.
    pub code: &'static str,
    /// Human-readable error description.
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    /// A referenced parent entity does not exist.
    ForeignKey(String),
    Conflict(String),
    /// A cascading delete stopped part way. The message lists what was removed.
    CascadeFailed(String),
    StoreUnavailable(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::ForeignKey(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "FOREIGN_KEY_VIOLATION",
                    message: msg,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                },
            ),
            AppError::CascadeFailed(msg) => {
                tracing::error!("Cascade failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "CASCADE_FAILED",
                        message: msg,
                    },
                )
            }
            AppError::StoreUnavailable(detail) => {
                tracing::warn!("Store unavailable: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody {
                        code: "STORE_UNAVAILABLE",
                        message: "The data store is unavailable".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::NotFound(entity) => AppError::NotFound(format!("{entity} not found")),
            RepoError::ForeignKey(entity) => {
                AppError::ForeignKey(format!("Referenced {entity} does not exist"))
            }
            RepoError::Conflict(what) => AppError::Conflict(format!("{what} already exists")),
            RepoError::Cascade(e) => AppError::CascadeFailed(e.to_string()),
            RepoError::StoreUnavailable(detail) => AppError::StoreUnavailable(detail),
            RepoError::Decode(e) => AppError::Internal(format!("Stored item is corrupt: {e}")),
            RepoError::Internal(detail) => AppError::Internal(detail),
        }
    }
}
