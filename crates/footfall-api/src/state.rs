//! Application state.

use std::sync::Arc;

use tracing::{info, warn};

use footfall_timeline::TimelineStore;
use footfall_vision::{
    FrameAnalyzer, PersonDetector, RandomEstimator, SpatialHashTracker, StubDetector, YoloConfig,
    YoloPersonDetector,
};

use crate::config::ApiConfig;

/// Shared application state.
///
/// The timeline store is injected here rather than living in a global, so
/// every handler works against explicitly-owned sessions.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub analyzer: Arc<FrameAnalyzer>,
    pub store: Arc<TimelineStore>,
}

impl AppState {
    /// Create application state from config, loading the detector model.
    ///
    /// Falls back to the stub detector when no model path is configured or
    /// the model fails to load, so the service still serves its API.
    pub fn new(config: ApiConfig) -> Self {
        let detector: Arc<dyn PersonDetector> = match &config.model_path {
            Some(path) => {
                let yolo = YoloPersonDetector::new(YoloConfig {
                    model_path: path.clone(),
                    ..YoloConfig::default()
                });
                match yolo {
                    Ok(det) => Arc::new(det),
                    Err(e) => {
                        warn!(error = %e, "failed to load detector model, using stub");
                        Arc::new(StubDetector::empty())
                    }
                }
            }
            None => {
                info!("no model path configured, using stub detector");
                Arc::new(StubDetector::empty())
            }
        };

        Self::with_detector(config, detector)
    }

    /// Create state with an explicit detector (used by tests).
    pub fn with_detector(config: ApiConfig, detector: Arc<dyn PersonDetector>) -> Self {
        let analyzer = FrameAnalyzer::new(
            detector,
            Box::new(RandomEstimator::new()),
            Box::new(SpatialHashTracker::new()),
            config.confidence_threshold,
        );

        Self {
            config,
            analyzer: Arc::new(analyzer),
            store: Arc::new(TimelineStore::new()),
        }
    }
}
