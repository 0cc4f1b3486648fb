//! HTTP handlers for the boundary operations.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::agent::{ConversationStatus, ExportedDocument, HistorySnapshot};
use crate::config::Secret;

use super::error::{status_for, ApiError};
use super::json::ApiJson;
use super::ServerState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClearResponse {
    pub ok: bool,
}

pub fn routes() -> Router<Arc<ServerState>> {
    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .route("/api/history", get(history))
        .route("/api/clear", post(clear))
        .route("/api/status", get(status))
        .route("/api/download", post(export))
        .route("/api/export", get(export))
}

async fn index(State(state): State<Arc<ServerState>>) -> Result<Html<String>, ApiError> {
    match tokio::fs::read_to_string(&state.index_path).await {
        Ok(page) => Ok(Html(page)),
        Err(_) => Err(ApiError::not_found(format!(
            "{} not found",
            state.index_path.display()
        ))),
    }
}

#[tracing::instrument(name = "POST /api/chat", skip_all)]
async fn chat(
    State(state): State<Arc<ServerState>>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Response, ApiError> {
    let ChatRequest { message, api_key } = request;
    let agent = state.agent.clone();
    let credential = api_key.and_then(Secret::new);

    // Run on its own task so a dropped connection does not cancel the model call.
    let result = tokio::spawn(async move { agent.generate(&message, credential).await })
        .await
        .map_err(|e| ApiError::internal(format!("generation task failed: {e}")))?;

    let status = result.error.as_ref().map(status_for).unwrap_or(StatusCode::OK);
    Ok((status, Json(result)).into_response())
}

async fn history(State(state): State<Arc<ServerState>>) -> Json<HistorySnapshot> {
    Json(state.agent.history())
}

async fn clear(
    State(state): State<Arc<ServerState>>,
    ApiJson(request): ApiJson<ClearRequest>,
) -> Result<Json<ClearResponse>, ApiError> {
    state.agent.clear(request.confirm)?;
    Ok(Json(ClearResponse { ok: true }))
}

async fn status(State(state): State<Arc<ServerState>>) -> Json<ConversationStatus> {
    Json(state.agent.status())
}

async fn export(State(state): State<Arc<ServerState>>) -> Result<Json<ExportedDocument>, ApiError> {
    Ok(Json(state.agent.export_document()?))
}
