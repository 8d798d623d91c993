//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::data::get_data;
use crate::handlers::health::health;
use crate::handlers::upload::upload_video;
use crate::handlers::webcam::process_webcam_frame;
use crate::middleware::{cors_layer, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .route("/upload", post(upload_video))
        .route("/webcam", post(process_webcam_frame))
        .route("/data", get(get_data))
        .route("/health", get(health))
        // Body limit bounds video uploads; axum's built-in default is far
        // too small for them.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
