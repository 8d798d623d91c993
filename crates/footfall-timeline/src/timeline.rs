//! Single-session append-only timeline.

use footfall_models::FrameSummary;

use crate::error::{TimelineError, TimelineResult};

/// Ordered record of per-frame summaries for one ingestion session.
///
/// Indexed `0..len` by processed-frame position, not by raw decoder frame
/// number. Entries are immutable once appended; the only mutations are
/// [`Timeline::append`] and [`Timeline::reset`].
#[derive(Debug, Default)]
pub struct Timeline {
    entries: Vec<FrameSummary>,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one summary at the end. O(1) amortized; a summary is either
    /// fully appended or not at all.
    pub fn append(&mut self, summary: FrameSummary) {
        self.entries.push(summary);
    }

    /// Clear all entries, returning the timeline to its empty phase.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Number of processed frames recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Point query by processed-frame index.
    ///
    /// Negative indices are out of range; there is no Python-style indexing
    /// from the end.
    pub fn get(&self, index: i64) -> TimelineResult<&FrameSummary> {
        self.checked_index(index)
            .map(|i| &self.entries[i])
    }

    /// Sum of person counts over entries `[0, index]` inclusive.
    ///
    /// Recomputed by prefix summation per call. Timelines are bounded by the
    /// sampled frames of one video, so no running sum is cached.
    pub fn running_total(&self, index: i64) -> TimelineResult<u64> {
        let index = self.checked_index(index)?;
        Ok(self.entries[..=index].iter().map(|e| e.count).sum())
    }

    /// All person counts in insertion order, for chart rendering.
    pub fn full_series(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.count).collect()
    }

    fn checked_index(&self, index: i64) -> TimelineResult<usize> {
        if index < 0 || index as usize >= self.entries.len() {
            return Err(TimelineError::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footfall_models::{FrameRef, FrameSummary};

    fn summary(frame: u64, count: u64) -> FrameSummary {
        FrameSummary {
            count,
            ..FrameSummary::empty(FrameRef::Index(frame))
        }
    }

    #[test]
    fn test_len_tracks_appends() {
        let mut timeline = Timeline::new();
        assert!(timeline.is_empty());
        for i in 0..5 {
            timeline.append(summary(i * 15, i));
        }
        assert_eq!(timeline.len(), 5);
    }

    #[test]
    fn test_running_total_scenario() {
        let mut timeline = Timeline::new();
        timeline.append(summary(0, 2));
        timeline.append(summary(15, 0));
        timeline.append(summary(30, 3));

        assert_eq!(timeline.running_total(0).unwrap(), 2);
        assert_eq!(timeline.running_total(1).unwrap(), 2);
        assert_eq!(timeline.running_total(2).unwrap(), 5);
        assert_eq!(timeline.full_series(), vec![2, 0, 3]);
    }

    #[test]
    fn test_get_out_of_range() {
        let mut timeline = Timeline::new();
        timeline.append(summary(0, 1));
        timeline.append(summary(15, 1));
        timeline.append(summary(30, 1));

        assert!(timeline.get(2).is_ok());
        assert_eq!(
            timeline.get(3).unwrap_err(),
            TimelineError::OutOfRange { index: 3, len: 3 }
        );
        assert_eq!(
            timeline.get(-1).unwrap_err(),
            TimelineError::OutOfRange { index: -1, len: 3 }
        );
    }

    #[test]
    fn test_reset_returns_to_empty_phase() {
        let mut timeline = Timeline::new();
        timeline.append(summary(0, 4));
        timeline.reset();

        assert!(timeline.is_empty());
        assert!(matches!(
            timeline.get(0),
            Err(TimelineError::OutOfRange { .. })
        ));
        assert!(matches!(
            timeline.running_total(0),
            Err(TimelineError::OutOfRange { .. })
        ));
        assert!(timeline.full_series().is_empty());
    }

    #[test]
    fn test_get_returns_appended_entry() {
        let mut timeline = Timeline::new();
        timeline.append(summary(45, 7));
        let entry = timeline.get(0).unwrap();
        assert_eq!(entry.frame, FrameRef::Index(45));
        assert_eq!(entry.count, 7);
    }
}
