//! # Haptic Model
//!
//! Plain data that crosses every boundary: topology ↔ traversal ↔ compiler ↔ playback.
//!
//! Design rule: this module is pure data — no I/O, no state, no async.

pub mod region;
pub mod effect;
pub mod path;
pub mod pattern;

pub use region::{Region, RegionSet};
pub use effect::{Effect, HapticEffect, HapticSequence, SequenceEntry};
pub use path::{PathList, StageList};
pub use pattern::{HapticPattern, PatternStep};
