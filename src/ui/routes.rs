use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize;

    Router::new()
        // Page
        .route("/", get(handlers::index))
        .route(
            "/concorsi",
            post(handlers::submit_form).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/selection/reset", post(handlers::reset_selection))
        // Row actions
        .route("/concorsi/:id/delete", post(handlers::delete_posting))
        .route("/concorsi/:id/open", post(handlers::open_attachments))
        // Managed copies
        .route("/attachments/:name", get(handlers::serve_attachment))
        // Internal
        .route("/_internal/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
