use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use slidechat_export::format::{ExportFormat, ExportMode};
use slidechat_export::pipeline::ExportHandle;
use slidechat_export::progress::ExportProgress;
use ts_rs::TS;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct ExportRequest {
    pub mode: ExportMode,
    #[serde(default = "primary_format")]
    pub format: ExportFormat,
}

fn primary_format() -> ExportFormat {
    ExportFormat::PRIMARY
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ExportResponse {
    pub handle: ExportHandle,
    pub progress: Vec<ExportProgress>,
}

/// Export the current deck. Progress events are collected and returned
/// with the result.
pub async fn export_document(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Json<ExportResponse>, ApiError> {
    let document = state.sessions.current_document().await.unwrap_or_default();

    let mut progress = Vec::new();
    let result = state
        .export
        .export_document(&document, req.mode, req.format, |event| progress.push(event))
        .await;

    match result {
        Ok(handle) => Ok(Json(ExportResponse { handle, progress })),
        Err(e) => Err(ApiError::Export {
            message: e.to_string(),
            progress,
        }),
    }
}
