use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};

use crate::middleware;
use crate::state::AppState;

pub mod chat;
pub mod export;
pub mod health;
pub mod previews;
pub mod sessions;
pub mod slides;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/sessions",
            get(sessions::list_sessions)
                .post(sessions::create_session)
                .delete(sessions::clear_sessions),
        )
        .route(
            "/sessions/current",
            get(sessions::get_current_session).put(sessions::set_current_session),
        )
        .route(
            "/sessions/{id}",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/sessions/{id}/title", put(sessions::rename_session))
        .route("/chat", post(chat::send_prompt))
        .route("/slides", get(slides::get_slides))
        .route("/slides/{index}", put(slides::edit_slide))
        .route("/export", post(export::export_document))
        .route(
            "/previews/{id}",
            get(previews::get_preview).delete(previews::release_preview),
        )
        .layer(axum_mw::from_fn(middleware::request_log))
        .layer(cors)
        .with_state(state)
}
