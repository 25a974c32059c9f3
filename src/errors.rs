use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::FlowError;
use crate::services::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Provider call failed. Carries the user-facing message only; the cause
    /// is logged where it happens.
    #[error("{0}")]
    Upstream(&'static str),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Flow(#[from] FlowError),

    /// Request body that is not JSON or lacks required fields.
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Flow(_) => StatusCode::CONFLICT,
            AppError::InvalidBody(rejection) => rejection.status(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            AppError::Validation(e) => {
                serde_json::json!({ "error": self.to_string(), "field": e.field() })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}
