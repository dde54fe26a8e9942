//! In-memory playback backend.
//!
//! This is the reference implementation of `PlaybackBackend`.
//! It records every submitted pattern and tracks handle state in a
//! HashMap protected by RwLock.
//!
//! ## Limitations
//!
//! - **No clock**: nothing advances on its own. A handle stays `Playing`
//!   until it is stopped, even after its pattern would have finished.
//! - **No actuators**: strengths and timings are stored, never rendered.
//!
//! Use this backend for:
//! - Testing traversal, compilation and the impulse builder end to end
//! - Embedding without a suit attached

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::model::HapticPattern;
use crate::{Error, Result};
use super::{HandleId, PlaybackBackend, PlaybackState};

/// What the backend knows about one handle.
#[derive(Debug, Clone)]
pub struct HandleRecord {
    pub pattern: HapticPattern,
    pub state: PlaybackState,
    pub submitted_at: DateTime<Utc>,
    /// Times the handle was rewound by `reset`.
    pub restarts: u32,
    /// Paused by `pause_all` rather than individually.
    frozen: bool,
}

/// In-memory playback subsystem.
#[derive(Clone, Default)]
pub struct MemoryPlayback {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    handles: RwLock<HashMap<HandleId, HandleRecord>>,
    next_id: AtomicU64,
    frozen: AtomicBool,
}

impl MemoryPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles ever issued.
    pub fn len(&self) -> usize {
        self.inner.handles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.handles.read().is_empty()
    }

    pub fn record(&self, id: HandleId) -> Option<HandleRecord> {
        self.inner.handles.read().get(&id).cloned()
    }

    pub fn pattern(&self, id: HandleId) -> Option<HapticPattern> {
        self.inner.handles.read().get(&id).map(|r| r.pattern.clone())
    }

    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.load(Ordering::Acquire)
    }

    /// Handles currently in `state`, sorted by id.
    pub fn handles_in(&self, state: PlaybackState) -> Vec<HandleId> {
        let mut ids: Vec<HandleId> = self
            .inner
            .handles
            .read()
            .iter()
            .filter(|(_, r)| r.state == state)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    fn with_record<T>(&self, id: HandleId, f: impl FnOnce(&mut HandleRecord) -> Result<T>) -> Result<T> {
        let mut handles = self.inner.handles.write();
        let record = handles.get_mut(&id).ok_or_else(|| Error::NotFound(format!("Handle {id}")))?;
        f(record)
    }
}

// ============================================================================
// PlaybackBackend impl
// ============================================================================

#[async_trait]
impl PlaybackBackend for MemoryPlayback {
    async fn submit(&self, pattern: HapticPattern) -> Result<HandleId> {
        let id = HandleId(self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        tracing::debug!(handle = %id, steps = pattern.len(), "pattern submitted");
        self.inner.handles.write().insert(
            id,
            HandleRecord {
                pattern,
                state: PlaybackState::Playing,
                submitted_at: Utc::now(),
                restarts: 0,
                frozen: false,
            },
        );
        Ok(id)
    }

    async fn stop(&self, id: HandleId) -> Result<()> {
        self.with_record(id, |r| {
            r.state = PlaybackState::Stopped;
            r.frozen = false;
            Ok(())
        })
    }

    async fn pause(&self, id: HandleId) -> Result<()> {
        self.with_record(id, |r| match r.state {
            PlaybackState::Stopped => Err(Error::InvalidState(format!("Handle {id} is stopped"))),
            _ => {
                r.state = PlaybackState::Paused;
                Ok(())
            }
        })
    }

    async fn resume(&self, id: HandleId) -> Result<()> {
        self.with_record(id, |r| match r.state {
            PlaybackState::Stopped => Err(Error::InvalidState(format!("Handle {id} is stopped"))),
            _ => {
                r.state = PlaybackState::Playing;
                r.frozen = false;
                Ok(())
            }
        })
    }

    async fn reset(&self, id: HandleId) -> Result<()> {
        self.with_record(id, |r| {
            r.state = PlaybackState::Playing;
            r.frozen = false;
            r.restarts += 1;
            Ok(())
        })
    }

    async fn state(&self, id: HandleId) -> Result<PlaybackState> {
        self.with_record(id, |r| Ok(r.state))
    }

    async fn pause_all(&self) -> Result<()> {
        if self.inner.frozen.swap(true, Ordering::AcqRel) {
            tracing::warn!("pause_all called while already paused; pause must be paired with resume_all");
            return Ok(());
        }
        for record in self.inner.handles.write().values_mut() {
            if record.state == PlaybackState::Playing {
                record.state = PlaybackState::Paused;
                record.frozen = true;
            }
        }
        Ok(())
    }

    async fn resume_all(&self) -> Result<()> {
        self.inner.frozen.store(false, Ordering::Release);
        for record in self.inner.handles.write().values_mut() {
            if record.frozen {
                record.state = PlaybackState::Playing;
                record.frozen = false;
            }
        }
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        for record in self.inner.handles.write().values_mut() {
            record.state = PlaybackState::Stopped;
            record.frozen = false;
        }
        Ok(())
    }
}
