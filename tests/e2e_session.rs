//! End-to-end tests for the interactive session: selection handling, mode
//! toggling, and highlight staging against a paused clock.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use impulse_rs::staging::RecordingSink;
use impulse_rs::{
    Effect, Error, HandleId, HapticEffect, HapticPattern, HapticSequence, HighlightEvent,
    ImpulseGenerator, ImpulseSession, MemoryPlayback, PadTopology, PlaybackBackend, PlaybackState,
    Region, SelectionOutcome, SessionConfig, SessionMode,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Helper: session over the built-in suit with a recording sink.
// ============================================================================

fn session_with(config: SessionConfig) -> (ImpulseSession<MemoryPlayback>, Arc<RecordingSink>, Arc<MemoryPlayback>) {
    let playback = Arc::new(MemoryPlayback::new());
    let generator = ImpulseGenerator::new(Arc::new(PadTopology::suit()), Arc::clone(&playback));
    let sink = Arc::new(RecordingSink::new());
    let session = ImpulseSession::new(generator, sink.clone(), config).unwrap();
    (session, sink, playback)
}

/// A device that refuses every pattern.
struct OfflineBackend;

#[async_trait]
impl PlaybackBackend for OfflineBackend {
    async fn submit(&self, _pattern: HapticPattern) -> impulse_rs::Result<HandleId> {
        Err(Error::PlaybackError("device offline".into()))
    }
    async fn stop(&self, id: HandleId) -> impulse_rs::Result<()> {
        Err(Error::NotFound(format!("Handle {id}")))
    }
    async fn pause(&self, id: HandleId) -> impulse_rs::Result<()> {
        Err(Error::NotFound(format!("Handle {id}")))
    }
    async fn resume(&self, id: HandleId) -> impulse_rs::Result<()> {
        Err(Error::NotFound(format!("Handle {id}")))
    }
    async fn reset(&self, id: HandleId) -> impulse_rs::Result<()> {
        Err(Error::NotFound(format!("Handle {id}")))
    }
    async fn state(&self, id: HandleId) -> impulse_rs::Result<PlaybackState> {
        Err(Error::NotFound(format!("Handle {id}")))
    }
    async fn pause_all(&self) -> impulse_rs::Result<()> {
        Ok(())
    }
    async fn resume_all(&self) -> impulse_rs::Result<()> {
        Ok(())
    }
    async fn clear_all(&self) -> impulse_rs::Result<()> {
        Ok(())
    }
}

fn traversing() -> SessionConfig {
    SessionConfig { initial_mode: SessionMode::Traversing, ..SessionConfig::default() }
}

// ============================================================================
// 1. Emanating mode plays on every selection
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_emanating_selection_plays() {
    let (mut session, sink, playback) = session_with(SessionConfig::default());

    let outcome = session.on_region_selected(Region::ChestLeft).await.unwrap();
    let SelectionOutcome::Played(handle) = outcome else {
        panic!("expected a played impulse, got {outcome:?}");
    };
    assert_eq!(session.origin(), Some(Region::ChestLeft));

    let pattern = playback.pattern(handle.id()).unwrap();
    // Default depth 2 from chest_left reaches three rings.
    assert_eq!(pattern.len(), 3);
    assert_eq!(pattern.total_duration, 0.75);
    let entry = pattern.steps[0].sequence.entries()[0];
    assert_eq!(entry.effect, HapticEffect::new(Effect::Pulse, 0.15));

    // Let every highlight run its course.
    tokio::time::sleep(Duration::from_secs(2)).await;
    let events = sink.events();
    assert_eq!(events.iter().filter(|e| matches!(e, HighlightEvent::Lit { .. })).count(), 3);
    assert!(sink.lit().is_empty());
    assert_eq!(session.active_highlights(), 0);
}

// ============================================================================
// 2. Traversing mode: origin, destination, replace destination
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_traversal_selection_flow() {
    let (mut session, _sink, playback) = session_with(traversing());

    let outcome = session.on_region_selected(Region::ForearmLeft).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::OriginSelected(Region::ForearmLeft)));
    assert!(playback.is_empty());

    let outcome = session.on_region_selected(Region::ChestLeft).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::Played(_)));
    assert_eq!(session.destination(), Some(Region::ChestLeft));

    let outcome = session.on_region_selected(Region::ChestRight).await.unwrap();
    let SelectionOutcome::Played(handle) = outcome else {
        panic!("expected a played impulse, got {outcome:?}");
    };
    assert_eq!(session.origin(), Some(Region::ForearmLeft));
    assert_eq!(session.destination(), Some(Region::ChestRight));

    let pattern = playback.pattern(handle.id()).unwrap();
    assert_eq!(pattern.steps.first().map(|s| s.area), Some(Region::ForearmLeft.as_set()));
    assert_eq!(pattern.steps.last().map(|s| s.area), Some(Region::ChestRight.as_set()));
}

// ============================================================================
// 3. Selecting the origin again clears selection and pending highlights
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_reselecting_origin_clears_everything() {
    let config = SessionConfig { effect_duration: 1.0, ..traversing() };
    let (mut session, sink, _playback) = session_with(config);

    session.on_region_selected(Region::ForearmLeft).await.unwrap();
    session.on_region_selected(Region::ForearmRight).await.unwrap();

    // Mid-way through the eight-step traversal.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!sink.lit().is_empty());
    assert_eq!(session.active_highlights(), 1);

    let outcome = session.on_region_selected(Region::ForearmLeft).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::SelectionCleared));
    assert_eq!(session.origin(), None);
    assert_eq!(session.destination(), None);
    assert!(sink.lit().is_empty());
    assert_eq!(session.active_highlights(), 0);

    // No residual steps fire afterwards.
    let before = sink.events().len();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(sink.events().len(), before);
}

// ============================================================================
// 4. Mode toggling keeps the selection
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_toggle_mode() {
    let (mut session, _sink, _playback) = session_with(SessionConfig::default());
    assert_eq!(session.mode(), SessionMode::Emanating);

    session.on_region_selected(Region::BackLeft).await.unwrap();
    assert_eq!(session.toggle_mode(), SessionMode::Traversing);
    assert_eq!(session.origin(), Some(Region::BackLeft));

    // The emanation origin doubles as the traversal origin.
    let outcome = session.on_region_selected(Region::BackRight).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::Played(_)));
    assert_eq!(session.toggle_mode(), SessionMode::Emanating);
}

// ============================================================================
// 5. Custom sequences and highlight visibility floor
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_custom_sequence_and_visual_floor() {
    let mut seq = HapticSequence::new();
    seq.add_effect(0.0, 0.5, HapticEffect::new(Effect::TripleClick, 0.0));
    let config = SessionConfig {
        use_effect_selector: false,
        sequence: Some(seq.clone()),
        effect_duration: 0.01,
        depth: 0,
        ..SessionConfig::default()
    };
    let (mut session, sink, playback) = session_with(config);

    let SelectionOutcome::Played(handle) = session.on_region_selected(Region::MidAbLeft).await.unwrap() else {
        panic!("expected a played impulse");
    };
    assert_eq!(*playback.pattern(handle.id()).unwrap().steps[0].sequence, seq);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let lit = sink.events().into_iter().find(|e| matches!(e, HighlightEvent::Lit { .. }));
    assert_eq!(
        lit,
        Some(HighlightEvent::Lit {
            step: 0,
            area: Region::MidAbLeft.as_set(),
            duration: Duration::from_millis(100),
        })
    );
}

// ============================================================================
// 6. Config validation on replacement
// ============================================================================

#[tokio::test]
async fn test_set_config_validates() {
    let (mut session, _sink, _playback) = session_with(SessionConfig::default());
    let bad = SessionConfig { impulse_duration: -2.0, ..SessionConfig::default() };
    assert!(session.set_config(bad).is_err());
    assert_eq!(session.config().impulse_duration, 0.75);
}

// ============================================================================
// 7. Construction validates the config
// ============================================================================

#[tokio::test]
async fn test_new_rejects_invalid_config() {
    let config = SessionConfig { use_effect_selector: false, sequence: None, ..SessionConfig::default() };
    let generator = ImpulseGenerator::open_memory();
    let result = ImpulseSession::new(generator, Arc::new(RecordingSink::new()), config.clone());
    assert!(matches!(result, Err(Error::Config(_))));

    let result = ImpulseSession::from_config(
        Arc::new(PadTopology::suit()),
        Arc::new(RecordingSink::new()),
        config,
    );
    assert!(matches!(result, Err(Error::Config(_))));
}

// ============================================================================
// 8. Selection state only changes when something plays
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_failed_play_leaves_selection_untouched() {
    let generator = ImpulseGenerator::new(Arc::new(PadTopology::suit()), Arc::new(OfflineBackend));
    let sink = Arc::new(RecordingSink::new());
    let mut session = ImpulseSession::new(generator, sink.clone(), SessionConfig::default()).unwrap();

    let err = session.on_region_selected(Region::ChestLeft).await.unwrap_err();
    assert!(matches!(err, Error::PlaybackError(_)));
    assert_eq!(session.origin(), None);
    assert_eq!(session.active_highlights(), 0);

    session.toggle_mode();
    session.on_region_selected(Region::ChestLeft).await.unwrap();
    assert!(session.on_region_selected(Region::ChestRight).await.is_err());
    assert_eq!(session.origin(), Some(Region::ChestLeft));
    assert_eq!(session.destination(), None);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(sink.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_nothing_to_play_keeps_previous_destination() {
    let topology = PadTopology::from_json(
        r#"{
            "regions": ["back_right"],
            "edges": [{ "a": "forearm_left", "b": "upper_arm_left" }]
        }"#,
    )
    .unwrap();
    let sink = Arc::new(RecordingSink::new());
    let mut session = ImpulseSession::from_config(Arc::new(topology), sink, traversing()).unwrap();

    session.on_region_selected(Region::ForearmLeft).await.unwrap();
    let outcome = session.on_region_selected(Region::UpperArmLeft).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::Played(_)));

    let outcome = session.on_region_selected(Region::BackRight).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::NothingToPlay));
    assert_eq!(session.origin(), Some(Region::ForearmLeft));
    assert_eq!(session.destination(), Some(Region::UpperArmLeft));
}

#[tokio::test(start_paused = true)]
async fn test_empty_emanation_selects_nothing() {
    let topology = PadTopology::from_json(r#"{ "edges": [{ "a": "chest_left", "b": "chest_right" }] }"#).unwrap();
    let sink = Arc::new(RecordingSink::new());
    let mut session =
        ImpulseSession::from_config(Arc::new(topology), sink, SessionConfig::default()).unwrap();

    let outcome = session.on_region_selected(Region::BackLeft).await.unwrap();
    assert!(matches!(outcome, SelectionOutcome::NothingToPlay));
    assert_eq!(session.origin(), None);
}
