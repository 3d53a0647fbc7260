use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use slidechat_export::progress::ExportProgress;
use thiserror::Error;

/// Failures of the chat and editing flow that the caller can fix.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("there are no slides to edit yet")]
    NoDocument,

    #[error("slide {index} does not exist (the presentation has {len} slides)")]
    SlideIndex { index: usize, len: usize },

    /// The session the turn belongs to was deleted while it ran.
    #[error("session {0} was deleted")]
    SessionDeleted(uuid::Uuid),
}

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// A failed export, with the progress events emitted before the failure.
    Export {
        message: String,
        progress: Vec<ExportProgress>,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress: Option<Vec<ExportProgress>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, progress) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Export { message, progress } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, Some(progress))
            }
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                progress,
            }),
        )
            .into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::EmptyPrompt => ApiError::BadRequest(e.to_string()),
            ChatError::NoDocument
            | ChatError::SlideIndex { .. }
            | ChatError::SessionDeleted(_) => ApiError::NotFound(e.to_string()),
        }
    }
}
