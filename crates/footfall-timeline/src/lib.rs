//! Append-only session timelines of per-frame summaries.
//!
//! A [`Timeline`] is an ordered, randomly-seekable record of everything one
//! ingestion session observed, indexed by processed-frame position. The
//! [`TimelineStore`] keys timelines by session id so concurrent uploads
//! never share mutable state.

pub mod error;
pub mod store;
pub mod timeline;

pub use error::{TimelineError, TimelineResult};
pub use store::TimelineStore;
pub use timeline::Timeline;
