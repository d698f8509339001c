//! HTTP error mapping.

use crate::engine::EngineError;
use crate::handler::HandlerError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use qa_core::export::ExportError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Handler(#[from] HandlerError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("export task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("reading export artifact: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Handler(HandlerError::Answer(EngineError::NotConfigured(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Handler(HandlerError::Answer(_)) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(status = status.as_u16(), error = %self, "request failed");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
