//! Shared data models for the footfall backend.
//!
//! This crate provides Serde-serializable types for:
//! - Person detections and per-person records
//! - Demographic bucket summaries
//! - Per-frame summaries and frame references
//! - Ingestion session identifiers

pub mod demographics;
pub mod detection;
pub mod frame;
pub mod person;
pub mod session;

// Re-export common types
pub use demographics::{AgeBucket, DemographicSummary, GenderBucket};
pub use detection::Detection;
pub use frame::{FrameRef, FrameSummary};
pub use person::{AgeGroup, Gender, PersonRecord};
pub use session::SessionId;
