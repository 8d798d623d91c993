//! Webcam frame ingestion handler.

use axum::extract::State;
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};

use footfall_models::{DemographicSummary, FrameRef};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Webcam request: one frame as a base64 data URL.
#[derive(Deserialize)]
pub struct WebcamRequest {
    pub image: Option<String>,
}

/// Webcam response.
#[derive(Serialize)]
pub struct WebcamResponse {
    pub success: bool,
    /// People in this frame
    pub count: u64,
    /// Running total for the live session
    pub total_count: u64,
    pub demographics: DemographicSummary,
    pub keypoints: Vec<(i64, i64)>,
}

/// `POST /webcam` — JSON body `{image: "data:image/...;base64,..."}`.
///
/// Analyzes one frame and appends it to the live session. There is no reset:
/// webcam frames accumulate until a video upload opens a fresh session.
pub async fn process_webcam_frame(
    State(state): State<AppState>,
    Json(req): Json<WebcamRequest>,
) -> ApiResult<Json<WebcamResponse>> {
    let data_url = req
        .image
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("No image data provided"))?;

    let frame = decode_data_url(&data_url)?;
    let analysis = state.analyzer.process_frame(&frame)?;
    let summary = analysis.into_summary(FrameRef::now());

    let count = summary.count;
    let demographics = summary.demographics.clone();
    let keypoints = summary.keypoints.clone();

    let session_id = state.store.live_session()?;
    state.store.append(&session_id, summary)?;

    let last = state.store.session_len(&session_id)? as i64 - 1;
    let total_count = state
        .store
        .with_timeline(&session_id, |t| t.running_total(last))?;

    Ok(Json(WebcamResponse {
        success: true,
        count,
        total_count,
        demographics,
        keypoints,
    }))
}

/// Decode a `data:image/...;base64,` URL (or bare base64) into an image.
fn decode_data_url(data_url: &str) -> ApiResult<image::DynamicImage> {
    let payload = match data_url.split_once(',') {
        Some((_, payload)) => payload,
        None => data_url,
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ApiError::bad_request(format!("invalid base64 image data: {}", e)))?;

    image::load_from_memory(&bytes)
        .map_err(|e| ApiError::bad_request(format!("undecodable image data: {}", e)))
}
