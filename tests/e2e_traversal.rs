//! End-to-end tests for traversing impulses.
//!
//! Covers shortest paths on the built-in suit, weighted body maps loaded from
//! JSON, disconnected pads, and the compiled single-pad steps.

use std::sync::Arc;

use impulse_rs::{
    Error, ImpulseGenerator, ImpulseKind, MemoryPlayback, PadTopology, Region, RegionRole,
    RegionSet,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Helper: a generator over a body map given as JSON.
// ============================================================================

fn generator_from_json(json: &str) -> ImpulseGenerator<MemoryPlayback> {
    let topology = PadTopology::from_json(json).unwrap();
    ImpulseGenerator::new(Arc::new(topology), Arc::new(MemoryPlayback::new()))
}

// ============================================================================
// 1. Forearm to forearm crosses the back (first-discovered tie wins)
// ============================================================================

#[tokio::test]
async fn test_forearm_to_forearm() {
    let generator = ImpulseGenerator::open_memory();
    let impulse = generator
        .begin_traversing(Region::ForearmLeft.into(), Region::ForearmRight.into())
        .unwrap();
    assert_eq!(impulse.kind(), ImpulseKind::Traversing);
    assert_eq!(impulse.steps().len(), 8);
    assert!(impulse.steps().iter().all(|s| s.is_single()));
    assert_eq!(impulse.steps()[3], Region::BackLeft.as_set());
    assert_eq!(impulse.steps()[4], Region::BackRight.as_set());
}

// ============================================================================
// 2. Timing and attenuation along a path
// ============================================================================

#[tokio::test]
async fn test_path_pattern_timing() {
    let generator = ImpulseGenerator::open_memory();
    let mut impulse = generator
        .begin_traversing(Region::UpperAbLeft.into(), Region::LowerAbRight.into())
        .unwrap();
    // upper_ab_left -> mid_ab_left -> lower_ab_left -> lower_ab_right
    assert_eq!(impulse.steps().len(), 4);

    let handle = impulse
        .with_duration(1.0)
        .unwrap()
        .with_attenuation(0.8)
        .play()
        .await
        .unwrap();
    let pattern = generator.playback().pattern(handle.id()).unwrap();

    assert_eq!(pattern.starts().collect::<Vec<_>>(), vec![0.0, 0.25, 0.5, 0.75]);
    let expected = [1.0, 0.8, 0.8 * 0.8, 0.8 * 0.8 * 0.8];
    for (got, want) in pattern.strengths().zip(expected) {
        assert!((got - want).abs() < 1e-12, "{got} != {want}");
    }
    assert_eq!(pattern.steps[0].area, Region::UpperAbLeft.as_set());
    assert_eq!(pattern.steps[3].area, Region::LowerAbRight.as_set());
}

// ============================================================================
// 3. Weighted body maps
// ============================================================================

#[tokio::test]
async fn test_weighted_map_detours() {
    let generator = generator_from_json(
        r#"{
            "edges": [
                { "a": "back_left", "b": "back_right", "weight": 5.0 },
                { "a": "back_left", "b": "shoulder_left", "weight": 1.0 },
                { "a": "shoulder_left", "b": "shoulder_right", "weight": 1.0 },
                { "a": "shoulder_right", "b": "back_right", "weight": 1.0 }
            ]
        }"#,
    );
    let impulse = generator
        .begin_traversing(Region::BackLeft.into(), Region::BackRight.into())
        .unwrap();
    assert_eq!(
        impulse.steps(),
        &[
            Region::BackLeft.as_set(),
            Region::ShoulderLeft.as_set(),
            Region::ShoulderRight.as_set(),
            Region::BackRight.as_set(),
        ]
    );
}

// ============================================================================
// 4. Disconnected and unknown pads play nothing
// ============================================================================

#[tokio::test]
async fn test_disconnected_is_empty_not_error() {
    let generator = generator_from_json(
        r#"{
            "regions": ["forearm_right"],
            "edges": [{ "a": "forearm_left", "b": "upper_arm_left" }]
        }"#,
    );
    let impulse = generator
        .begin_traversing(Region::ForearmLeft.into(), Region::ForearmRight.into())
        .unwrap();
    assert!(impulse.is_empty());
    assert!(impulse.pattern().unwrap().is_empty());

    let unknown = generator
        .begin_traversing(Region::ForearmLeft.into(), Region::ChestLeft.into())
        .unwrap();
    assert!(unknown.is_empty());
}

// ============================================================================
// 5. Both endpoints must be single pads
// ============================================================================

#[tokio::test]
async fn test_endpoint_validation() {
    let generator = ImpulseGenerator::open_memory();

    let err = generator
        .begin_traversing(RegionSet::CHEST_BOTH, Region::BackLeft.into())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRegionSet { role: RegionRole::Origin, .. }));

    let err = generator
        .begin_traversing(Region::BackLeft.into(), RegionSet::ABS_ALL)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRegionSet { role: RegionRole::Destination, count: 6 }));
    assert!(err.to_string().contains("destination"));
}

// ============================================================================
// 6. Handles delegate control to the backend
// ============================================================================

#[tokio::test]
async fn test_handle_controls() {
    let generator = ImpulseGenerator::open_memory();
    let impulse = generator
        .begin_traversing(Region::ChestLeft.into(), Region::ChestRight.into())
        .unwrap();
    let handle = impulse.play().await.unwrap();

    handle.pause().await.unwrap();
    assert_eq!(handle.state().await.unwrap(), impulse_rs::PlaybackState::Paused);
    handle.resume().await.unwrap();
    handle.reset().await.unwrap();
    assert_eq!(generator.playback().record(handle.id()).unwrap().restarts, 1);
    handle.stop().await.unwrap();
    assert!(matches!(handle.pause().await, Err(Error::InvalidState(_))));
}
