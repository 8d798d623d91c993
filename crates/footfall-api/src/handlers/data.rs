//! Timeline point-query handler.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use footfall_models::{DemographicSummary, SessionId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for `/data`.
#[derive(Deserialize)]
pub struct DataQuery {
    /// Processed-frame index into the timeline
    pub time_pos: Option<i64>,
    /// Session to query; defaults to the live session
    pub session: Option<String>,
}

/// Point-query response.
#[derive(Serialize)]
pub struct DataResponse {
    /// Source frame reference, truncated to an integer
    pub frame: i64,
    /// People in the queried frame
    pub current_count: u64,
    pub demographics: DemographicSummary,
    /// All per-frame counts in insertion order, for chart rendering
    pub timeline_data: Vec<u64>,
    /// Running total through the queried frame
    pub total_count: u64,
}

/// `GET /data?time_pos=<int>[&session=<id>]`.
///
/// Absent, negative, or past-the-end `time_pos` is a 400 with the fixed
/// `{"error": "Invalid time position"}` body.
pub async fn get_data(
    State(state): State<AppState>,
    Query(query): Query<DataQuery>,
) -> ApiResult<Json<DataResponse>> {
    let time_pos = query.time_pos.ok_or(ApiError::InvalidTimePosition)?;

    let session_id = match query.session {
        Some(id) => SessionId::from_string(id),
        None => state.store.live_session()?,
    };

    let response = state.store.with_timeline(&session_id, |timeline| {
        let entry = timeline.get(time_pos)?;
        Ok(DataResponse {
            frame: entry.frame.as_i64(),
            current_count: entry.count,
            demographics: entry.demographics.clone(),
            timeline_data: timeline.full_series(),
            total_count: timeline.running_total(time_pos)?,
        })
    })?;

    Ok(Json(response))
}
