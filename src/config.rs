//! Configuration for playback backends and interactive sessions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{Effect, HapticSequence};
use crate::{Error, Result, DEFAULT_DEPTH};

/// Which playback subsystem to drive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum PlaybackConfig {
    /// In-memory recorder (no hardware)
    #[default]
    Memory,
}

/// Interaction mode of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    #[default]
    Emanating,
    Traversing,
}

impl SessionMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Emanating => Self::Traversing,
            Self::Traversing => Self::Emanating,
        }
    }
}

/// Parameters an interactive session applies to every impulse it plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub initial_mode: SessionMode,
    /// Emanation depth in hops.
    pub depth: i32,
    /// Total impulse length, seconds.
    pub impulse_duration: f64,
    /// Length of each step's effect, seconds. Also drives highlight length.
    pub effect_duration: f64,
    pub attenuation: f64,
    pub effect_strength: f64,
    pub effect: Effect,
    /// Play `effect` when true, otherwise `sequence`.
    pub use_effect_selector: bool,
    pub sequence: Option<HapticSequence>,
    pub playback: PlaybackConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_mode: SessionMode::Emanating,
            depth: DEFAULT_DEPTH,
            impulse_duration: 0.75,
            effect_duration: 0.15,
            attenuation: 1.0,
            effect_strength: 1.0,
            effect: Effect::Pulse,
            use_effect_selector: true,
            sequence: None,
            playback: PlaybackConfig::Memory,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("impulse_duration", self.impulse_duration),
            ("effect_duration", self.effect_duration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!("{name} must be finite and >= 0, got {value}")));
            }
        }
        if !self.use_effect_selector && self.sequence.as_ref().is_none_or(HapticSequence::is_empty) {
            return Err(Error::Config(
                "use_effect_selector is off but no non-empty sequence is configured".into(),
            ));
        }
        Ok(())
    }
}
