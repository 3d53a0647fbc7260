use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use slidechat_core::models::chat_history::ChatSession;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export)]
pub struct CreateSessionRequest {
    #[serde(default)]
    #[ts(optional)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct SelectSessionRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct RenameSessionRequest {
    pub title: String,
}

pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<ChatSession>> {
    Json(state.sessions.list_sessions().await)
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Json<ChatSession> {
    let title = req.title.filter(|t| !t.trim().is_empty());
    Json(state.sessions.create_session(title).await)
}

/// Drop every session; returns the fresh collection.
pub async fn clear_sessions(State(state): State<AppState>) -> Json<Vec<ChatSession>> {
    state.sessions.clear_all().await;
    Json(state.sessions.list_sessions().await)
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatSession>, ApiError> {
    state
        .sessions
        .get_session(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {id}")))
}

pub async fn get_current_session(
    State(state): State<AppState>,
) -> Result<Json<ChatSession>, ApiError> {
    state
        .sessions
        .get_current_session()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no current session".to_string()))
}

pub async fn set_current_session(
    State(state): State<AppState>,
    Json(req): Json<SelectSessionRequest>,
) -> Result<Json<ChatSession>, ApiError> {
    state.sessions.set_current_session(req.id).await;
    get_current_session(State(state)).await
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<()> {
    state.sessions.delete_session(id).await;
    Json(())
}

pub async fn rename_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RenameSessionRequest>,
) -> Result<Json<ChatSession>, ApiError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }
    if !state.sessions.rename_session(id, title.to_string()).await {
        return Err(ApiError::NotFound(format!("session not found: {id}")));
    }
    get_session(State(state), Path(id)).await
}
