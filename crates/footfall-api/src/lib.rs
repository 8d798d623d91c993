//! Axum HTTP API for the footfall backend.
//!
//! This crate provides:
//! - Video upload ingestion (`POST /upload`)
//! - Webcam frame ingestion (`POST /webcam`)
//! - Timeline point queries (`GET /data`)

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
