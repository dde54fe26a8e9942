//! # impulse-rs — Spatial Haptic Impulses
//!
//! Computes activation patterns for multi-pad haptic wearables: a sensation
//! spreading outward from one pad (emanation) or travelling between two pads
//! (traversal).
//!
//! ## Design Principles
//!
//! 1. **Topology is immutable**: built once, shared read-only behind an `Arc`
//! 2. **Searches are pure**: BFS/Dijkstra and compilation never touch I/O
//! 3. **Playback is a trait**: `PlaybackBackend` is the contract with the suit driver
//! 4. **Dependencies are explicit**: topology and playback are passed in, never looked up
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use impulse_rs::{ImpulseGenerator, Region};
//!
//! # async fn example() -> impulse_rs::Result<()> {
//! let generator = ImpulseGenerator::open_memory();
//!
//! // Ripple out from the left chest pad, two hops deep, fading by half per ring.
//! let mut impulse = generator.begin_emanating(Region::ChestLeft.into(), 2)?;
//! let handle = impulse.with_duration(2.0)?.with_attenuation(0.5).play().await?;
//!
//! // Run from one forearm to the other.
//! let across = generator.begin_traversing(Region::ForearmLeft.into(), Region::ForearmRight.into())?;
//! across.play().await?;
//!
//! handle.stop().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `staging` (default) | Timed pad highlights and the interactive `ImpulseSession` |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod topology;
pub mod traversal;
pub mod compiler;
pub mod impulse;
pub mod playback;
pub mod config;
#[cfg(feature = "staging")]
pub mod staging;
#[cfg(feature = "staging")]
pub mod session;

use std::sync::Arc;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{
    Region, RegionSet, Effect, HapticEffect, HapticSequence,
    StageList, PathList, HapticPattern, PatternStep,
};
pub use topology::{PadTopology, TopologyDescription, TopologyNode};
pub use traversal::{TraversalEngine, RegionRole};
pub use impulse::{Impulse, ImpulseKind};
pub use playback::{
    PlaybackBackend, PlaybackHandle, PlaybackState, HandleId, MemoryPlayback,
};
pub use config::{SessionConfig, SessionMode, PlaybackConfig};

#[cfg(feature = "staging")]
pub use staging::{HighlightEvent, HighlightScope, HighlightSink};
#[cfg(feature = "staging")]
pub use session::{ImpulseSession, SelectionOutcome};

/// Emanation depth used by interactive callers that don't choose one.
pub const DEFAULT_DEPTH: i32 = 2;

// ============================================================================
// Top-level generator handle
// ============================================================================

/// The primary entry point. Pairs a pad topology with a playback backend and
/// hands out [`Impulse`] builders.
pub struct ImpulseGenerator<P: PlaybackBackend> {
    engine: TraversalEngine,
    playback: Arc<P>,
}

impl<P: PlaybackBackend> ImpulseGenerator<P> {
    pub fn new(topology: Arc<PadTopology>, playback: Arc<P>) -> Self {
        Self { engine: TraversalEngine::new(topology), playback }
    }

    /// Begin an impulse radiating from `origin`, `depth` hops deep.
    ///
    /// `origin` must name exactly one pad. Negative depth plays the origin only.
    pub fn begin_emanating(&self, origin: RegionSet, depth: i32) -> Result<Impulse<P>> {
        let stages = self.engine.emanate(origin, depth)?;
        Ok(Impulse::new(
            ImpulseKind::Emanating,
            stages.to_steps(),
            Arc::clone(&self.playback),
        ))
    }

    /// Begin an impulse running from `origin` to `destination` along the
    /// cheapest path. Disconnected pads give an empty impulse.
    pub fn begin_traversing(&self, origin: RegionSet, destination: RegionSet) -> Result<Impulse<P>> {
        let path = self.engine.shortest_path(origin, destination)?;
        Ok(Impulse::new(
            ImpulseKind::Traversing,
            path.to_steps(),
            Arc::clone(&self.playback),
        ))
    }

    pub fn engine(&self) -> &TraversalEngine {
        &self.engine
    }

    pub fn topology(&self) -> &Arc<PadTopology> {
        self.engine.topology()
    }

    /// Access the playback backend (for global pause/resume/clear).
    pub fn playback(&self) -> &Arc<P> {
        &self.playback
    }
}

impl<P: PlaybackBackend> Clone for ImpulseGenerator<P> {
    fn clone(&self) -> Self {
        Self { engine: self.engine.clone(), playback: Arc::clone(&self.playback) }
    }
}

/// In-memory playback over the built-in suit, for testing and embedding.
impl ImpulseGenerator<MemoryPlayback> {
    pub fn open_memory() -> Self {
        Self::new(Arc::new(PadTopology::suit()), Arc::new(MemoryPlayback::new()))
    }

    pub fn from_config(config: &PlaybackConfig, topology: Arc<PadTopology>) -> Self {
        match config {
            PlaybackConfig::Memory => Self::new(topology, Arc::new(MemoryPlayback::new())),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid region set: {role} spans {count} area(s); only single-pad sets are supported")]
    InvalidRegionSet { role: RegionRole, count: u32 },

    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: &'static str, message: String },

    #[error("Unknown region: {0}")]
    UnknownRegion(Region),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Playback error: {0}")]
    PlaybackError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
