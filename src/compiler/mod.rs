//! Pattern compiler: turns traversal steps into a timed, attenuated schedule.
//!
//! For `n` steps over `total_duration` seconds:
//!
//! ```text
//! start(i)    = i * total_duration / n
//! strength(0) = 1.0
//! strength(i) = strength(i-1) * attenuation        (stored clamped to [0, 1])
//! ```
//!
//! The recurrence runs on the unclamped value; only the stored strength is
//! clamped. Every step replays the same sequence.

use std::sync::Arc;

use crate::model::{HapticPattern, HapticSequence, PatternStep, RegionSet};

/// Compile `steps` into a pattern.
///
/// Zero steps compile to an empty pattern (nothing to play).
pub fn compile(
    steps: &[RegionSet],
    total_duration: f64,
    attenuation: f64,
    sequence: Arc<HapticSequence>,
) -> HapticPattern {
    if steps.is_empty() {
        return HapticPattern { steps: Vec::new(), total_duration };
    }

    let time_step = total_duration / steps.len() as f64;
    let mut strength = 1.0_f64;
    let mut compiled = Vec::with_capacity(steps.len());

    for (i, &area) in steps.iter().enumerate() {
        if i > 0 {
            strength *= attenuation;
        }
        compiled.push(PatternStep {
            start: i as f64 * time_step,
            area,
            strength: clamp_unit(strength),
            sequence: Arc::clone(&sequence),
        });
    }

    tracing::debug!(
        steps = compiled.len(),
        total_duration,
        attenuation,
        "pattern compiled"
    );

    HapticPattern { steps: compiled, total_duration }
}

fn clamp_unit(value: f64) -> f64 {
    // NaN (e.g. inf * 0) plays as silence.
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Effect, Region};
    use pretty_assertions::assert_eq;

    fn hum() -> Arc<HapticSequence> {
        Arc::new(HapticSequence::single(Effect::Hum, 0.0, 1.0))
    }

    fn four_steps() -> Vec<RegionSet> {
        vec![
            Region::ChestLeft.into(),
            Region::ShoulderLeft | Region::UpperAbLeft | Region::ChestRight,
            Region::BackLeft | Region::UpperArmLeft,
            Region::ForearmLeft.into(),
        ]
    }

    #[test]
    fn test_halving_over_two_seconds() {
        let pattern = compile(&four_steps(), 2.0, 0.5, hum());
        assert_eq!(pattern.starts().collect::<Vec<_>>(), vec![0.0, 0.5, 1.0, 1.5]);
        assert_eq!(pattern.strengths().collect::<Vec<_>>(), vec![1.0, 0.5, 0.25, 0.125]);
        assert_eq!(pattern.time_step(), 0.5);
    }

    #[test]
    fn test_amplifying_attenuation_clamps_at_one() {
        let pattern = compile(&four_steps(), 1.0, 3.0, hum());
        assert!(pattern.strengths().all(|s| s == 1.0));
    }

    #[test]
    fn test_non_positive_attenuation_collapses_to_zero() {
        let pattern = compile(&four_steps(), 1.0, 0.0, hum());
        assert_eq!(pattern.strengths().collect::<Vec<_>>(), vec![1.0, 0.0, 0.0, 0.0]);

        // Negative factors oscillate; odd steps clamp to 0, even steps stay positive.
        let pattern = compile(&four_steps(), 1.0, -0.5, hum());
        assert_eq!(pattern.strengths().collect::<Vec<_>>(), vec![1.0, 0.0, 0.25, 0.0]);
    }

    #[test]
    fn test_steps_share_one_sequence() {
        let seq = hum();
        let pattern = compile(&four_steps(), 1.0, 1.0, Arc::clone(&seq));
        assert!(pattern.steps.iter().all(|s| Arc::ptr_eq(&s.sequence, &seq)));
        assert_eq!(pattern.area(), four_steps().into_iter().fold(RegionSet::NONE, |a, b| a | b));
    }

    #[test]
    fn test_empty_steps() {
        let pattern = compile(&[], 2.0, 0.5, hum());
        assert!(pattern.is_empty());
        assert_eq!(pattern.time_step(), 0.0);
    }
}
