//! Per-frame aggregation: detector output to summary record.

use std::sync::{Arc, Mutex};

use image::DynamicImage;
use tracing::debug;

use footfall_models::{DemographicSummary, Detection, FrameRef, FrameSummary, PersonRecord};

use crate::detector::PersonDetector;
use crate::error::{VisionError, VisionResult};
use crate::estimator::DemographicEstimator;
use crate::tracker::TrackIdPolicy;

/// Result of analyzing one frame, before it is pinned to a source position.
///
/// The ingestion driver attaches the [`FrameRef`] via
/// [`FrameAnalysis::into_summary`].
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    /// Detections with assigned track ids, in detector output order.
    pub detections: Vec<Detection>,
    /// One record per detection, same order.
    pub people: Vec<PersonRecord>,
    /// Box centers, same order.
    pub keypoints: Vec<(i64, i64)>,
    /// Rollup over `people`.
    pub demographics: DemographicSummary,
}

impl FrameAnalysis {
    /// Number of people detected in the frame.
    pub fn count(&self) -> u64 {
        self.people.len() as u64
    }

    /// Pin the analysis to its source position.
    pub fn into_summary(self, frame: FrameRef) -> FrameSummary {
        FrameSummary {
            frame,
            count: self.people.len() as u64,
            people: self.people,
            keypoints: self.keypoints,
            demographics: self.demographics,
        }
    }
}

/// Turns one decoded frame into a [`FrameAnalysis`].
///
/// One detector call per frame; each detection gets a track id and
/// demographic labels in detector output order. Deterministic given a
/// deterministic detector and estimator — the default random estimator means
/// two identical frames need not agree on demographics, only on count and
/// positions.
pub struct FrameAnalyzer {
    detector: Arc<dyn PersonDetector>,
    estimator: Mutex<Box<dyn DemographicEstimator>>,
    tracker: Mutex<Box<dyn TrackIdPolicy>>,
    confidence_threshold: f32,
}

impl FrameAnalyzer {
    pub fn new(
        detector: Arc<dyn PersonDetector>,
        estimator: Box<dyn DemographicEstimator>,
        tracker: Box<dyn TrackIdPolicy>,
        confidence_threshold: f32,
    ) -> Self {
        Self {
            detector,
            estimator: Mutex::new(estimator),
            tracker: Mutex::new(tracker),
            confidence_threshold,
        }
    }

    /// Analyze one frame.
    ///
    /// Fails if the detector fails; no partial analysis is produced.
    pub fn process_frame(&self, frame: &DynamicImage) -> VisionResult<FrameAnalysis> {
        let raw = self.detector.detect(frame, self.confidence_threshold)?;

        let mut estimator = self
            .estimator
            .lock()
            .map_err(|_| VisionError::inference("estimator lock poisoned"))?;
        let mut tracker = self
            .tracker
            .lock()
            .map_err(|_| VisionError::inference("tracker lock poisoned"))?;

        let mut detections = Vec::with_capacity(raw.len());
        let mut people = Vec::with_capacity(raw.len());
        let mut keypoints = Vec::with_capacity(raw.len());

        for det in &raw {
            let center = det.center();
            let id = tracker.assign(center);
            let (age_group, gender) = estimator.estimate(det);

            detections.push(Detection {
                id: id.clone(),
                bbox: det.bbox(),
                confidence: det.confidence,
                position: center,
            });
            people.push(PersonRecord {
                id,
                age_group,
                gender,
                position: center,
            });
            keypoints.push(center);
        }

        let demographics = DemographicSummary::from_people(&people);
        debug!(
            detector = self.detector.name(),
            count = people.len(),
            "frame analyzed"
        );

        Ok(FrameAnalysis {
            detections,
            people,
            keypoints,
            demographics,
        })
    }

    /// The configured detection confidence threshold.
    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }
}
