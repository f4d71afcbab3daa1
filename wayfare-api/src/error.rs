use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use wayfare_domain::DomainError;

/// HTTP-facing error. Business failures map onto the taxonomy below;
/// infrastructure failures render as an opaque 500.
#[derive(Debug)]
pub enum AppError {
    Unauthorized(String),
    Forbidden(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(_) | DomainError::NotificationNotFound => {
                AppError::NotFound(err.to_string())
            }
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::InsufficientCapacity { .. } => AppError::Validation(err.to_string()),
            // A double release means state is already suspect; treat it as
            // an internal fault, not a caller error.
            DomainError::CapacityOverflow { .. } => AppError::Internal(err.to_string()),
            DomainError::Storage(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
