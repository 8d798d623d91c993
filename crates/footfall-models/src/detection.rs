//! Per-frame person detections.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single person detected in one frame.
///
/// Ephemeral: produced per detector call and folded into a
/// [`crate::FrameSummary`], never stored on its own. Coordinates are in
/// pixel space of the source frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Detection {
    /// Track identifier derived from the quantized box center.
    ///
    /// This is a positional hash, not temporal identity: two people
    /// occupying the same quantization cell on different frames share an id.
    pub id: String,
    /// Corner-format bounding box `[x1, y1, x2, y2]`.
    #[serde(rename = "box")]
    pub bbox: [i64; 4],
    /// Detection confidence in `[0, 1]`.
    pub confidence: f32,
    /// Box center `(x, y)`.
    pub position: (i64, i64),
}

impl Detection {
    /// Box center, also used as the keypoint for this detection.
    pub fn center(&self) -> (i64, i64) {
        self.position
    }

    /// Box width and height.
    pub fn size(&self) -> (i64, i64) {
        let [x1, y1, x2, y2] = self.bbox;
        (x2 - x1, y2 - y1)
    }
}
