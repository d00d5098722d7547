use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Every failure is scoped to the single request; nothing here is fatal to
/// the process. Implements [`IntoResponse`] to produce the
/// `{"success": false, "message": ...}` envelope consistently.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No session / invalid token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the target row is not owned by the caller.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing/malformed field, invalid time range, unrecognized status.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Overlap detected, illegal transition, duplicate placement.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Target row does not exist (or is not visible to the caller).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Convenience type alias for handler and service return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Database(err) => classify_sqlx_error(err),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status and a user-facing message.
///
/// - `RowNotFound` maps to 404.
/// - Unique (23505) and exclusion (23P01) violations map to 409, so a losing
///   concurrent writer gets the same conflict the pre-check would report.
/// - Everything else maps to 500; driver detail goes to the log only.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23P01") => (
                StatusCode::CONFLICT,
                "The requested time range conflicts with an existing slot".to_string(),
            ),
            Some("23505") => (
                StatusCode::CONFLICT,
                "A conflicting record already exists".to_string(),
            ),
            _ => {
                tracing::error!(error = %db_err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
        },
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred".to_string(),
            )
        }
    }
}
