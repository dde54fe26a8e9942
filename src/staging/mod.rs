//! # Highlight Staging
//!
//! Presentation-side companion to playback: lights each step's pads in time
//! with the compiled pattern so a UI can show where the impulse is.
//!
//! ```text
//! step 0  ██████░░░░░░░░░░
//! step 1      ██████░░░░░░      one task per step:
//! step 2          ██████░░      sleep(start) → Lit → sleep(visual) → Cleared
//!         0   ts  2ts 3ts
//! ```
//!
//! A step's highlight may outlast the gap to the next step, so several steps
//! can be lit at once. All step tasks live in one [`HighlightScope`];
//! cancelling it aborts every pending step and clears whatever is still lit.
//!
//! Highlights are feedback only. They carry no haptic strength and do not
//! observe the playback backend.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinSet;

use crate::model::{HapticPattern, RegionSet};

/// Shortest highlight, so very short effects stay visible.
pub const MIN_VISUAL_DURATION: Duration = Duration::from_millis(100);
/// Longest highlight.
pub const MAX_VISUAL_DURATION: Duration = Duration::from_secs(100);

/// One presentation event per step transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightEvent {
    /// Step `step` started; `area` stays lit for `duration`.
    Lit { step: usize, area: RegionSet, duration: Duration },
    /// Step `step`'s pads went dark (expired or cancelled).
    Cleared { step: usize, area: RegionSet },
}

impl HighlightEvent {
    pub fn step(&self) -> usize {
        match self {
            Self::Lit { step, .. } | Self::Cleared { step, .. } => *step,
        }
    }

    pub fn area(&self) -> RegionSet {
        match self {
            Self::Lit { area, .. } | Self::Cleared { area, .. } => *area,
        }
    }
}

/// Receives highlight events. Called from runtime worker threads.
pub trait HighlightSink: Send + Sync + 'static {
    fn highlight(&self, event: HighlightEvent);
}

impl<F> HighlightSink for F
where
    F: Fn(HighlightEvent) + Send + Sync + 'static,
{
    fn highlight(&self, event: HighlightEvent) {
        self(event)
    }
}

/// Sink that keeps every event, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<HighlightEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HighlightEvent> {
        self.events.lock().clone()
    }

    pub fn take(&self) -> Vec<HighlightEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Pads lit and not yet cleared.
    pub fn lit(&self) -> RegionSet {
        let mut lit = BTreeMap::new();
        for event in self.events.lock().iter() {
            match *event {
                HighlightEvent::Lit { step, area, .. } => {
                    lit.insert(step, area);
                }
                HighlightEvent::Cleared { step, .. } => {
                    lit.remove(&step);
                }
            }
        }
        lit.values().fold(RegionSet::NONE, |acc, a| acc | *a)
    }
}

impl HighlightSink for RecordingSink {
    fn highlight(&self, event: HighlightEvent) {
        self.events.lock().push(event);
    }
}

/// Highlight length for an effect of `effect_duration` seconds.
pub fn visual_duration(effect_duration: f64) -> Duration {
    seconds(effect_duration).clamp(MIN_VISUAL_DURATION, MAX_VISUAL_DURATION)
}

fn seconds(value: f64) -> Duration {
    if value.is_nan() || value <= 0.0 {
        Duration::ZERO
    } else {
        Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
    }
}

// ============================================================================
// HighlightScope
// ============================================================================

/// Owns the step tasks of one staged pattern.
///
/// Dropping the scope aborts pending steps without emitting `Cleared`;
/// call [`cancel`](Self::cancel) to also clear lit pads.
pub struct HighlightScope {
    tasks: JoinSet<()>,
    lit: Arc<Mutex<BTreeMap<usize, RegionSet>>>,
    sink: Arc<dyn HighlightSink>,
}

/// Spawn one timed task per pattern step.
///
/// Must be called from inside a tokio runtime.
pub fn stage_highlights(
    pattern: &HapticPattern,
    visual: Duration,
    sink: Arc<dyn HighlightSink>,
) -> HighlightScope {
    let lit = Arc::new(Mutex::new(BTreeMap::new()));
    let mut tasks = JoinSet::new();

    for (step, entry) in pattern.steps.iter().enumerate() {
        let start = seconds(entry.start);
        let area = entry.area;
        let lit = Arc::clone(&lit);
        let sink = Arc::clone(&sink);

        tasks.spawn(async move {
            tokio::time::sleep(start).await;
            {
                let mut lit = lit.lock();
                lit.insert(step, area);
                tracing::trace!(step, %area, "highlight lit");
                sink.highlight(HighlightEvent::Lit { step, area, duration: visual });
            }
            tokio::time::sleep(visual).await;
            let mut lit = lit.lock();
            if lit.remove(&step).is_some() {
                sink.highlight(HighlightEvent::Cleared { step, area });
            }
        });
    }

    HighlightScope { tasks, lit, sink }
}

impl HighlightScope {
    /// Steps still scheduled or lit.
    pub fn pending(&mut self) -> usize {
        while let Some(res) = self.tasks.try_join_next() {
            log_step_failure(res);
        }
        self.tasks.len()
    }

    pub fn is_finished(&mut self) -> bool {
        self.pending() == 0
    }

    /// Pads currently lit by this scope.
    pub fn lit(&self) -> RegionSet {
        self.lit.lock().values().fold(RegionSet::NONE, |acc, a| acc | *a)
    }

    /// Wait until every step has lit and cleared.
    pub async fn join(&mut self) {
        while let Some(res) = self.tasks.join_next().await {
            log_step_failure(res);
        }
    }

    /// Abort every pending step, then clear anything left lit.
    ///
    /// When this returns, the sink will receive no further events from this scope.
    pub async fn cancel(&mut self) {
        self.tasks.abort_all();
        self.join().await;
        let remaining = std::mem::take(&mut *self.lit.lock());
        for (step, area) in remaining {
            self.sink.highlight(HighlightEvent::Cleared { step, area });
        }
    }
}

fn log_step_failure(res: Result<(), tokio::task::JoinError>) {
    if let Err(err) = res {
        if err.is_panic() {
            tracing::warn!(%err, "highlight step panicked");
        }
    }
}

impl std::fmt::Debug for HighlightScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightScope")
            .field("pending", &self.tasks.len())
            .field("lit", &self.lit())
            .finish()
    }
}
