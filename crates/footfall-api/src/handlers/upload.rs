//! Video upload ingestion handler.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use footfall_models::SessionId;
use footfall_vision::ingest_video;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Upload response.
#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    /// Session the video was ingested into; pass as `session` to `/data`.
    pub session_id: SessionId,
    /// Raw frames in the source stream
    pub total_frames: u64,
    /// Frames sampled and analyzed
    pub processed_frames: u64,
    /// Sum of per-frame person counts
    pub total_people: u64,
}

/// `POST /upload` — multipart form with a `video` field.
///
/// Saves the file, opens a fresh ingestion session (the per-upload reset),
/// and synchronously ingests every sampled frame. The response arrives when
/// ingestion is done; a large video makes the caller wait.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut video: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {}", e)))?
    {
        if field.name() == Some("video") {
            let filename = field
                .file_name()
                .map(sanitize_filename)
                .unwrap_or_else(|| "upload.mp4".to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read video field: {}", e)))?;
            video = Some((filename, bytes));
            break;
        }
    }

    let (filename, bytes) = video.ok_or_else(|| ApiError::bad_request("No video file provided"))?;

    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(footfall_vision::VisionError::Io)?;
    let video_path = state.config.upload_dir.join(&filename);
    tokio::fs::write(&video_path, &bytes)
        .await
        .map_err(footfall_vision::VisionError::Io)?;
    info!(path = %video_path.display(), size = bytes.len(), "video saved");

    // Fresh session per upload: reset semantics without shared global state.
    let session_id = state.store.create_session()?;
    let (summaries, report) =
        ingest_video(&video_path, state.config.frame_stride, &state.analyzer).await?;
    state.store.append_all(&session_id, summaries)?;

    Ok(Json(UploadResponse {
        success: true,
        session_id,
        total_frames: report.total_frames,
        processed_frames: report.processed_frames,
        total_people: report.total_people,
    }))
}

/// Strip any path components from a client-supplied filename.
fn sanitize_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .map(|n| n.to_string())
        .unwrap_or_else(|| "upload.mp4".to_string())
}
