use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use learnhub_core::error::CoreError;
use learnhub_model::ModelError;

pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "message": self.message,
            "status": self.status.as_u16(),
        }));

        (self.status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } => Self::not_found(err.to_string()),
            CoreError::AlreadySaved => Self::bad_request(err.to_string()),
            CoreError::InvalidInput(msg) => Self::bad_request(msg),
            CoreError::Provider(provider) => {
                tracing::warn!(error = %provider, "catalog request failed");
                Self::bad_gateway("External catalog unavailable")
            }
            CoreError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                Self::internal()
            }
        }
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = ?err, "request failed");
        Self::internal()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = ?err, "database operation failed");
        Self::internal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn core_errors_map_to_statuses() {
        assert_eq!(
            AppError::from(CoreError::content_not_found()).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(CoreError::AlreadySaved).message,
            "Content already saved"
        );
        assert_eq!(
            AppError::from(CoreError::InvalidInput("bad".into())).status,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::from(CoreError::Internal(
            "relation \"content\" does not exist".into(),
        ));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, INTERNAL_MESSAGE);
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn body_carries_message_and_status() {
        let response = AppError::not_found("Content not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({ "message": "Content not found", "status": 404 })
        );
    }
}
