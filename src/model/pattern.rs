//! Compiled haptic patterns.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{HapticSequence, RegionSet};

/// One scheduled activation: play `sequence` on `area` at `start`, scaled by `strength`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternStep {
    /// Seconds from the start of the pattern.
    pub start: f64,
    pub area: RegionSet,
    /// Already clamped to `[0, 1]`.
    pub strength: f64,
    pub sequence: Arc<HapticSequence>,
}

/// A time-ordered activation schedule, ready for the playback subsystem.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HapticPattern {
    pub steps: Vec<PatternStep>,
    /// Total scheduled length in seconds.
    pub total_duration: f64,
}

impl HapticPattern {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every pad touched by any step.
    pub fn area(&self) -> RegionSet {
        self.steps.iter().fold(RegionSet::NONE, |acc, s| acc | s.area)
    }

    /// Spacing between consecutive step starts.
    pub fn time_step(&self) -> f64 {
        if self.steps.is_empty() {
            0.0
        } else {
            self.total_duration / self.steps.len() as f64
        }
    }

    pub fn starts(&self) -> impl Iterator<Item = f64> + '_ {
        self.steps.iter().map(|s| s.start)
    }

    pub fn strengths(&self) -> impl Iterator<Item = f64> + '_ {
        self.steps.iter().map(|s| s.strength)
    }
}
