use axum::Json;
use axum::extract::{Path, State};
use slidechat_core::models::slide::{Slide, SlideDocument};

use crate::chat;
use crate::error::ApiError;
use crate::state::AppState;

/// The current session's deck; empty if no turn has produced one.
pub async fn get_slides(State(state): State<AppState>) -> Json<SlideDocument> {
    Json(state.sessions.current_document().await.unwrap_or_default())
}

pub async fn edit_slide(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(slide): Json<Slide>,
) -> Result<Json<SlideDocument>, ApiError> {
    Ok(Json(chat::edit_slide(&state, index, slide).await?))
}
