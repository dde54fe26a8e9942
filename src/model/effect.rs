//! Haptic effects and sequences of them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Effect families the actuators know how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Bump,
    Buzz,
    Click,
    DoubleClick,
    Fuzz,
    Hum,
    LongDoubleSharpTick,
    Pulse,
    PulseSharp,
    SharpClick,
    SharpTick,
    ShortDoubleClick,
    ShortDoubleSharpTick,
    TransitionClick,
    TransitionHum,
    TripleClick,
}

impl Effect {
    /// The short list offered by interactive selectors, in slider order.
    pub const SELECTOR: [Effect; 8] = [
        Effect::Bump,
        Effect::Buzz,
        Effect::Click,
        Effect::DoubleClick,
        Effect::TripleClick,
        Effect::Hum,
        Effect::Pulse,
        Effect::Fuzz,
    ];

    /// Selector entry at `index`, clamped into range.
    pub fn from_selector(index: i64) -> Effect {
        let last = Self::SELECTOR.len() as i64 - 1;
        Self::SELECTOR[index.clamp(0, last) as usize]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bump => "bump",
            Self::Buzz => "buzz",
            Self::Click => "click",
            Self::DoubleClick => "double_click",
            Self::Fuzz => "fuzz",
            Self::Hum => "hum",
            Self::LongDoubleSharpTick => "long_double_sharp_tick",
            Self::Pulse => "pulse",
            Self::PulseSharp => "pulse_sharp",
            Self::SharpClick => "sharp_click",
            Self::SharpTick => "sharp_tick",
            Self::ShortDoubleClick => "short_double_click",
            Self::ShortDoubleSharpTick => "short_double_sharp_tick",
            Self::TransitionClick => "transition_click",
            Self::TransitionHum => "transition_hum",
            Self::TripleClick => "triple_click",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One effect played for `duration` seconds. A zero duration means the
/// family's natural length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HapticEffect {
    pub effect: Effect,
    pub duration: f64,
}

impl HapticEffect {
    pub fn new(effect: Effect, duration: f64) -> Self {
        Self { effect, duration }
    }
}

/// An effect placed inside a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequenceEntry {
    /// Seconds from the start of the sequence.
    pub offset: f64,
    pub strength: f64,
    pub effect: HapticEffect,
}

/// An ordered, location-free list of effects.
///
/// A pattern replays the same sequence on every step, scaled by the step's
/// strength and shifted by the step's start time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HapticSequence {
    entries: Vec<SequenceEntry>,
}

impl HapticSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sequence holding a single effect at offset zero.
    pub fn single(effect: Effect, duration: f64, strength: f64) -> Self {
        let mut seq = Self::new();
        seq.add_effect(0.0, strength, HapticEffect::new(effect, duration));
        seq
    }

    pub fn add_effect(&mut self, offset: f64, strength: f64, effect: HapticEffect) -> &mut Self {
        self.entries.push(SequenceEntry { offset, strength, effect });
        self
    }

    pub fn entries(&self) -> &[SequenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Time until the last entry finishes.
    pub fn duration(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.offset + e.effect.duration)
            .fold(0.0, f64::max)
    }
}
