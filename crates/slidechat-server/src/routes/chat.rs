use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use ts_rs::TS;

use crate::chat::{self, TurnReply};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct PromptRequest {
    pub prompt: String,
}

pub async fn send_prompt(
    State(state): State<AppState>,
    Json(req): Json<PromptRequest>,
) -> Result<Json<TurnReply>, ApiError> {
    Ok(Json(chat::send_prompt(&state, &req.prompt).await?))
}
