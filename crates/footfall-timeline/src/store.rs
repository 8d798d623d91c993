//! Session-keyed timeline store.

use std::collections::HashMap;
use std::sync::RwLock;

use footfall_models::{FrameSummary, SessionId};
use tracing::debug;

use crate::error::{TimelineError, TimelineResult};
use crate::timeline::Timeline;

/// Owns one [`Timeline`] per ingestion session.
///
/// Each video upload opens a fresh session, which replaces the previous one
/// as "live"; webcam frames accumulate into the live session across calls.
/// The store is injected through application state rather than living in a
/// global, so concurrent sessions never race on a shared timeline.
///
/// Lock discipline: critical sections only cover map access and the O(len)
/// read operations. Detection and decoding happen before any lock is taken.
#[derive(Debug, Default)]
pub struct TimelineStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    sessions: HashMap<SessionId, Timeline>,
    live: Option<SessionId>,
}

impl TimelineStore {
    /// Create an empty store with no sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh session and make it live.
    ///
    /// This carries the reference reset semantics: a new upload starts from
    /// an empty timeline and subsequent webcam frames and default queries
    /// land here.
    pub fn create_session(&self) -> TimelineResult<SessionId> {
        let id = SessionId::new();
        let mut inner = self.write()?;
        inner.sessions.insert(id.clone(), Timeline::new());
        inner.live = Some(id.clone());
        debug!(session = %id, "opened ingestion session");
        Ok(id)
    }

    /// Id of the live session, opening one if none exists yet.
    ///
    /// Webcam mode appends indefinitely to this session until a video upload
    /// replaces it.
    pub fn live_session(&self) -> TimelineResult<SessionId> {
        {
            let inner = self.read()?;
            if let Some(id) = &inner.live {
                return Ok(id.clone());
            }
        }
        self.create_session()
    }

    /// Append one summary to a session's timeline.
    pub fn append(&self, id: &SessionId, summary: FrameSummary) -> TimelineResult<()> {
        let mut inner = self.write()?;
        let timeline = inner
            .sessions
            .get_mut(id)
            .ok_or_else(|| TimelineError::SessionNotFound(id.clone()))?;
        timeline.append(summary);
        Ok(())
    }

    /// Append a whole batch in order, in one critical section.
    pub fn append_all(
        &self,
        id: &SessionId,
        summaries: impl IntoIterator<Item = FrameSummary>,
    ) -> TimelineResult<()> {
        let mut inner = self.write()?;
        let timeline = inner
            .sessions
            .get_mut(id)
            .ok_or_else(|| TimelineError::SessionNotFound(id.clone()))?;
        for summary in summaries {
            timeline.append(summary);
        }
        Ok(())
    }

    /// Run a read-only closure against a session's timeline.
    pub fn with_timeline<T>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&Timeline) -> TimelineResult<T>,
    ) -> TimelineResult<T> {
        let inner = self.read()?;
        let timeline = inner
            .sessions
            .get(id)
            .ok_or_else(|| TimelineError::SessionNotFound(id.clone()))?;
        f(timeline)
    }

    /// Number of entries in a session's timeline.
    pub fn session_len(&self, id: &SessionId) -> TimelineResult<usize> {
        self.with_timeline(id, |t| Ok(t.len()))
    }

    fn read(&self) -> TimelineResult<std::sync::RwLockReadGuard<'_, StoreInner>> {
        self.inner.read().map_err(|_| TimelineError::LockPoisoned)
    }

    fn write(&self) -> TimelineResult<std::sync::RwLockWriteGuard<'_, StoreInner>> {
        self.inner.write().map_err(|_| TimelineError::LockPoisoned)
    }
}
