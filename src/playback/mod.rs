//! # Playback Backend Trait
//!
//! The boundary to the playback subsystem: a compiled [`HapticPattern`] goes
//! in, a [`HandleId`] comes out, and everything after that (timing the
//! actuators, talking to the suit driver) belongs to the backend.
//!
//! ## Implementations
//!
//! | Backend | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryPlayback` | `memory` | Records patterns and handle states; for testing/embedding |

pub mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::HapticPattern;
use crate::Result;

pub use memory::MemoryPlayback;

/// Opaque identifier of one playing instance of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a handle is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
}

// ============================================================================
// PlaybackBackend Trait
// ============================================================================

/// The playback subsystem's contract.
///
/// Backends should return `Error::NotFound` for handles they never issued.
#[async_trait]
pub trait PlaybackBackend: Send + Sync + 'static {
    /// Schedule a pattern and start playing it.
    async fn submit(&self, pattern: HapticPattern) -> Result<HandleId>;

    async fn stop(&self, id: HandleId) -> Result<()>;

    async fn pause(&self, id: HandleId) -> Result<()>;

    async fn resume(&self, id: HandleId) -> Result<()>;

    /// Rewind to the start and play again.
    async fn reset(&self, id: HandleId) -> Result<()>;

    async fn state(&self, id: HandleId) -> Result<PlaybackState>;

    // ========================================================================
    // Global control
    // ========================================================================

    /// Freeze every playing handle. Must be paired with `resume_all`.
    async fn pause_all(&self) -> Result<()>;

    /// Resume everything frozen by `pause_all`.
    async fn resume_all(&self) -> Result<()>;

    /// Stop every handle.
    async fn clear_all(&self) -> Result<()>;
}

// ============================================================================
// PlaybackHandle
// ============================================================================

/// One instantiation of a compiled pattern. Control calls delegate to the
/// backend that issued it.
pub struct PlaybackHandle<P: PlaybackBackend> {
    id: HandleId,
    backend: Arc<P>,
}

impl<P: PlaybackBackend> PlaybackHandle<P> {
    pub(crate) fn new(id: HandleId, backend: Arc<P>) -> Self {
        Self { id, backend }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub async fn stop(&self) -> Result<()> {
        self.backend.stop(self.id).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.backend.pause(self.id).await
    }

    pub async fn resume(&self) -> Result<()> {
        self.backend.resume(self.id).await
    }

    pub async fn reset(&self) -> Result<()> {
        self.backend.reset(self.id).await
    }

    pub async fn state(&self) -> Result<PlaybackState> {
        self.backend.state(self.id).await
    }
}

impl<P: PlaybackBackend> Clone for PlaybackHandle<P> {
    fn clone(&self) -> Self {
        Self { id: self.id, backend: Arc::clone(&self.backend) }
    }
}

impl<P: PlaybackBackend> fmt::Debug for PlaybackHandle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackHandle").field("id", &self.id).finish()
    }
}
