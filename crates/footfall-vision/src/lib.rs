//! Person detection and frame aggregation.
//!
//! This crate provides:
//! - A pluggable [`PersonDetector`] trait with a YOLOv8 ONNX implementation
//!   and a stub for model-less environments
//! - The [`SpatialHashTracker`] track-id policy
//! - A pluggable [`DemographicEstimator`] (default: uniform random labels)
//! - The [`FrameAnalyzer`] that turns one frame into a summary record
//! - The video-file ingestion driver (FFmpeg frame sampling)

pub mod aggregator;
pub mod detector;
pub mod error;
pub mod estimator;
pub mod tracker;
pub mod video;

pub use aggregator::{FrameAnalysis, FrameAnalyzer};
pub use detector::{
    PersonDetector, RawDetection, StubDetector, YoloConfig, YoloPersonDetector,
    DEFAULT_CONFIDENCE_THRESHOLD,
};
pub use error::{VisionError, VisionResult};
pub use estimator::{DemographicEstimator, RandomEstimator};
pub use tracker::{SpatialHashTracker, TrackIdPolicy};
pub use video::{ingest_video, probe_video, IngestReport, VideoInfo};
