//! Track-id assignment policies.

use std::collections::HashMap;

use rand::Rng;

/// Assigns a track id to a detection from its box center.
///
/// The id contract is positional, not temporal: callers may only assume
/// that the same id refers to the same screen region, never to the same
/// person across frames. A real multi-frame tracker can replace the default
/// policy behind this trait without touching the aggregation core.
pub trait TrackIdPolicy: Send {
    /// Assign an id for a detection centered at `(x, y)` pixels.
    fn assign(&mut self, center: (i64, i64)) -> String;
}

/// Quantization cell size in pixels.
const CELL_SIZE: i64 = 50;

/// Coarse spatial-hash "tracking": `id = "{x/50}_{y/50}"` on the box center.
///
/// Two people occupying the same 50x50 cell on different frames collide
/// under the same id. That is the documented behavior of this policy, not a
/// defect; replace the policy, don't patch the hash.
///
/// Lazily allocates a display color per distinct id, for annotation only.
#[derive(Debug, Default)]
pub struct SpatialHashTracker {
    colors: HashMap<String, [u8; 3]>,
}

impl SpatialHashTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display color for a track id, if one was ever assigned.
    pub fn color(&self, id: &str) -> Option<[u8; 3]> {
        self.colors.get(id).copied()
    }

    /// Number of distinct ids seen so far.
    pub fn distinct_tracks(&self) -> usize {
        self.colors.len()
    }
}

impl TrackIdPolicy for SpatialHashTracker {
    fn assign(&mut self, center: (i64, i64)) -> String {
        let id = format!("{}_{}", center.0 / CELL_SIZE, center.1 / CELL_SIZE);
        self.colors.entry(id.clone()).or_insert_with(|| {
            let mut rng = rand::rng();
            [rng.random(), rng.random(), rng.random()]
        });
        id
    }
}
