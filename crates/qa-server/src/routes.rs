//! axum router: JSON API, exports and the browser UI.

use crate::error::ApiError;
use crate::handler::{AskRequest, AskResponse, RequestHandler};
use crate::ui;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use qa_core::export::{ExportEngine, ExportFormat};
use qa_core::LogRecord;
use serde_json::{json, Value};
use std::sync::Arc;

pub const READY_MESSAGE: &str = "Hospital AI Agent is ready. Use POST /ask with your question.";

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<RequestHandler>,
    pub exports: Arc<ExportEngine>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/ui", get(chat_ui))
        .route("/ask", post(ask))
        .route("/logs", get(logs))
        .route("/export/xlsx", get(export_xlsx))
        .route("/export/pdf", get(export_pdf))
        .with_state(state)
}

async fn home() -> Json<Value> {
    Json(json!({ "message": READY_MESSAGE }))
}

async fn chat_ui() -> Html<&'static str> {
    Html(ui::PAGE)
}

async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    tracing::info!(question = %req.question, "question received");
    Ok(Json(state.handler.ask(&req.question).await?))
}

async fn logs(State(state): State<AppState>) -> Result<Json<Vec<LogRecord>>, ApiError> {
    Ok(Json(state.handler.logs().await?))
}

async fn export_xlsx(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    download(&state, ExportFormat::Spreadsheet).await
}

async fn export_pdf(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    download(&state, ExportFormat::Document).await
}

async fn download(state: &AppState, format: ExportFormat) -> Result<impl IntoResponse, ApiError> {
    let exports = state.exports.clone();
    let path = tokio::task::spawn_blocking(move || exports.export(format)).await??;
    let bytes = tokio::fs::read(&path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("qa_logs.{}", format.extension()));

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}
