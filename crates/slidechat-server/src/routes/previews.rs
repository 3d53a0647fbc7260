use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Serve a preview blob with its format's content type.
pub async fn get_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let blob = state
        .export
        .previews()
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("preview not found: {id}")))?;

    let headers = [
        (header::CONTENT_TYPE, blob.format.mime_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"preview.{}\"", blob.format.extension()),
        ),
    ];
    Ok((headers, Body::from(blob.bytes.as_ref().clone())).into_response())
}

pub async fn release_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, ApiError> {
    if state.export.previews().release_id(id) {
        Ok(Json(()))
    } else {
        Err(ApiError::NotFound(format!("preview not found: {id}")))
    }
}
