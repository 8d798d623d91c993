//! Per-sampled-frame summaries.

use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::demographics::DemographicSummary;
use crate::person::PersonRecord;

/// Where a summary came from in its source stream.
///
/// Video ingestion records the raw decoder frame number; webcam ingestion
/// records a unix timestamp. Serializes as a bare JSON number either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FrameRef {
    /// Raw decoder frame number (video mode).
    Index(u64),
    /// Unix timestamp in seconds (webcam mode).
    Timestamp(f64),
}

impl FrameRef {
    /// Frame reference for a webcam frame captured now.
    pub fn now() -> Self {
        FrameRef::Timestamp(Utc::now().timestamp_millis() as f64 / 1000.0)
    }

    /// Truncated integer view, matching the wire format of point queries.
    pub fn as_i64(&self) -> i64 {
        match self {
            FrameRef::Index(n) => *n as i64,
            FrameRef::Timestamp(t) => *t as i64,
        }
    }
}

/// Everything recorded about one sampled frame.
///
/// Created exactly once per sampled frame and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameSummary {
    /// Source position of this frame.
    pub frame: FrameRef,
    /// Number of people detected.
    pub count: u64,
    /// One record per detection, in detector output order.
    pub people: Vec<PersonRecord>,
    /// Box centers, one per detection.
    pub keypoints: Vec<(i64, i64)>,
    /// Demographic rollup over `people`.
    pub demographics: DemographicSummary,
}

impl FrameSummary {
    /// Summary for a frame with no detections.
    pub fn empty(frame: FrameRef) -> Self {
        Self {
            frame,
            count: 0,
            people: Vec::new(),
            keypoints: Vec::new(),
            demographics: DemographicSummary::empty(),
        }
    }
}
