use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use intellipark_core::LifecycleError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    Gateway { details: String },
    Internal(String),
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Validation(msg) => AppError::BadRequest(msg),
            LifecycleError::Forbidden(msg) => AppError::Forbidden(msg),
            LifecycleError::NotFound(msg) => AppError::NotFound(msg),
            LifecycleError::Gateway { message } => AppError::Gateway { details: message },
            LifecycleError::Store(err) => AppError::Internal(err.to_string()),
            LifecycleError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Gateway { details } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Xendit API error", "details": details }),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}
