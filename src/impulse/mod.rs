//! Impulse builder.
//!
//! An [`Impulse`] is created by [`ImpulseGenerator`](crate::ImpulseGenerator)
//! with its traversal already computed and a default hum effect, so it can be
//! played immediately. Setters take `&mut self` and return `Result<&mut Self>`
//! when they can fail; a rejected call leaves the builder unchanged.
//!
//! ```rust,no_run
//! use impulse_rs::{ImpulseGenerator, Effect, Region};
//!
//! # async fn example() -> impulse_rs::Result<()> {
//! let generator = ImpulseGenerator::open_memory();
//! let mut impulse = generator.begin_emanating(Region::ChestLeft.into(), 2)?;
//! let handle = impulse
//!     .with_duration(0.75)?
//!     .with_attenuation(0.8)
//!     .with_effect(Effect::Pulse, 0.15, 1.0)?
//!     .play()
//!     .await?;
//! handle.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::compiler;
use crate::model::{Effect, HapticPattern, HapticSequence, RegionSet};
use crate::playback::{PlaybackBackend, PlaybackHandle};
use crate::{Error, Result};

/// Total impulse length before `with_duration`.
pub const DEFAULT_DURATION: f64 = 2.0;
/// Per-step strength factor before `with_attenuation`.
pub const DEFAULT_ATTENUATION: f64 = 1.0;
/// Effect every impulse starts with.
pub const DEFAULT_EFFECT: Effect = Effect::Hum;

/// How the impulse's steps were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpulseKind {
    Emanating,
    Traversing,
}

/// Timing, attenuation and effect for one traversal, ready to play.
///
/// Each `play()` submits a fresh pattern and returns an independent handle.
pub struct Impulse<P: PlaybackBackend> {
    kind: ImpulseKind,
    steps: Vec<RegionSet>,
    total_duration: f64,
    attenuation: f64,
    sequence: Option<Arc<HapticSequence>>,
    playback: Arc<P>,
}

impl<P: PlaybackBackend> Impulse<P> {
    pub(crate) fn new(kind: ImpulseKind, steps: Vec<RegionSet>, playback: Arc<P>) -> Self {
        Self {
            kind,
            steps,
            total_duration: DEFAULT_DURATION,
            attenuation: DEFAULT_ATTENUATION,
            sequence: Some(Arc::new(HapticSequence::single(DEFAULT_EFFECT, 0.0, 1.0))),
            playback,
        }
    }

    /// Replace the held sequence with a single `effect`.
    ///
    /// Negative or non-finite `duration` is rejected. Negative or NaN
    /// `strength` is clamped to 0.
    pub fn with_effect(&mut self, effect: Effect, duration: f64, strength: f64) -> Result<&mut Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(Error::InvalidArgument {
                name: "duration",
                message: format!("effect duration must be finite and >= 0, got {duration}"),
            });
        }
        let strength = if strength.is_nan() || strength < 0.0 {
            tracing::warn!(strength, "negative or NaN effect strength clamped to 0");
            0.0
        } else {
            strength
        };
        self.sequence = Some(Arc::new(HapticSequence::single(effect, duration, strength)));
        Ok(self)
    }

    /// Replace the held sequence wholesale. Empty sequences are rejected.
    pub fn with_sequence(&mut self, sequence: impl Into<Arc<HapticSequence>>) -> Result<&mut Self> {
        let sequence = sequence.into();
        if sequence.is_empty() {
            return Err(Error::InvalidArgument {
                name: "sequence",
                message: "cannot assign an empty sequence; keeping the previous one".into(),
            });
        }
        self.sequence = Some(sequence);
        Ok(self)
    }

    /// Total length of the whole impulse, in seconds.
    pub fn with_duration(&mut self, seconds: f64) -> Result<&mut Self> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(Error::InvalidArgument {
                name: "duration",
                message: format!("impulse duration must be finite and >= 0, got {seconds}"),
            });
        }
        self.total_duration = seconds;
        Ok(self)
    }

    /// Strength multiplier applied per step. Below 1 fades, above 1 is capped
    /// at full strength, negative values give oscillating/degenerate output.
    pub fn with_attenuation(&mut self, factor: f64) -> &mut Self {
        self.attenuation = factor;
        self
    }

    /// Compile without playing.
    pub fn pattern(&self) -> Result<HapticPattern> {
        let sequence = self.sequence.as_ref().ok_or_else(|| {
            Error::InvalidState("impulse has no effect sequence assigned".into())
        })?;
        Ok(compiler::compile(
            &self.steps,
            self.total_duration,
            self.attenuation,
            Arc::clone(sequence),
        ))
    }

    /// Compile and hand the pattern to the playback backend.
    pub async fn play(&self) -> Result<PlaybackHandle<P>> {
        let pattern = self.pattern()?;
        if pattern.is_empty() {
            tracing::debug!(kind = ?self.kind, "playing an empty impulse");
        }
        let id = self.playback.submit(pattern).await?;
        Ok(PlaybackHandle::new(id, Arc::clone(&self.playback)))
    }

    /// `with_sequence(sequence)` followed by `play()`.
    pub async fn play_with(&mut self, sequence: impl Into<Arc<HapticSequence>>) -> Result<PlaybackHandle<P>> {
        self.with_sequence(sequence)?;
        self.play().await
    }

    pub fn kind(&self) -> ImpulseKind {
        self.kind
    }

    /// Region set per step, in play order.
    pub fn steps(&self) -> &[RegionSet] {
        &self.steps
    }

    /// True when the traversal found nothing to play.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn attenuation(&self) -> f64 {
        self.attenuation
    }

    pub fn sequence(&self) -> Option<&HapticSequence> {
        self.sequence.as_deref()
    }
}

impl<P: PlaybackBackend> std::fmt::Debug for Impulse<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Impulse")
            .field("kind", &self.kind)
            .field("steps", &self.steps)
            .field("total_duration", &self.total_duration)
            .field("attenuation", &self.attenuation)
            .field("sequence", &self.sequence)
            .finish()
    }
}
