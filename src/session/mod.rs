//! Interactive impulse session.
//!
//! Turns pad selection events from a UI into impulses: in emanating mode
//! every selection plays a ring from that pad; in traversing mode the first
//! selection picks an origin and each later one plays a path to it.
//! Selecting the origin again clears the selection and cancels its
//! highlights.

use std::sync::Arc;

use crate::config::{SessionConfig, SessionMode};
use crate::impulse::Impulse;
use crate::model::Region;
use crate::playback::{MemoryPlayback, PlaybackBackend, PlaybackHandle};
use crate::staging::{self, HighlightScope, HighlightSink};
use crate::topology::PadTopology;
use crate::{Error, ImpulseGenerator, Result};

/// What a selection did.
pub enum SelectionOutcome<P: PlaybackBackend> {
    /// Traversal origin chosen; waiting for a destination.
    OriginSelected(Region),
    /// Origin selected twice; selection and highlights cleared.
    SelectionCleared,
    Played(PlaybackHandle<P>),
    /// The traversal reached no pads (e.g. disconnected destination).
    NothingToPlay,
}

impl<P: PlaybackBackend> std::fmt::Debug for SelectionOutcome<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OriginSelected(region) => f.debug_tuple("OriginSelected").field(region).finish(),
            Self::SelectionCleared => f.write_str("SelectionCleared"),
            Self::Played(handle) => f.debug_tuple("Played").field(handle).finish(),
            Self::NothingToPlay => f.write_str("NothingToPlay"),
        }
    }
}

pub struct ImpulseSession<P: PlaybackBackend> {
    generator: ImpulseGenerator<P>,
    sink: Arc<dyn HighlightSink>,
    config: SessionConfig,
    mode: SessionMode,
    origin: Option<Region>,
    destination: Option<Region>,
    scopes: Vec<HighlightScope>,
}

impl<P: PlaybackBackend> ImpulseSession<P> {
    /// Fails with [`Error::Config`] if `config` does not validate.
    pub fn new(generator: ImpulseGenerator<P>, sink: Arc<dyn HighlightSink>, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mode: config.initial_mode,
            generator,
            sink,
            config,
            origin: None,
            destination: None,
            scopes: Vec::new(),
        })
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) -> SessionMode {
        self.mode = self.mode.toggled();
        tracing::debug!(mode = ?self.mode, "session mode toggled");
        self.mode
    }

    pub fn origin(&self) -> Option<Region> {
        self.origin
    }

    pub fn destination(&self) -> Option<Region> {
        self.destination
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replace the session parameters; the mode is kept.
    pub fn set_config(&mut self, config: SessionConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn generator(&self) -> &ImpulseGenerator<P> {
        &self.generator
    }

    /// Highlight scopes with steps still pending or lit.
    pub fn active_highlights(&mut self) -> usize {
        self.scopes.retain_mut(|s| !s.is_finished());
        self.scopes.len()
    }

    /// Handle a pad selection.
    pub async fn on_region_selected(&mut self, region: Region) -> Result<SelectionOutcome<P>> {
        match self.mode {
            SessionMode::Emanating => self.emanate_from(region).await,
            SessionMode::Traversing => self.select_for_traversal(region).await,
        }
    }

    async fn emanate_from(&mut self, region: Region) -> Result<SelectionOutcome<P>> {
        let impulse = self.generator.begin_emanating(region.into(), self.config.depth)?;
        let outcome = self.configure_and_play(impulse).await?;
        if matches!(outcome, SelectionOutcome::Played(_)) {
            self.origin = Some(region);
        }
        Ok(outcome)
    }

    async fn select_for_traversal(&mut self, region: Region) -> Result<SelectionOutcome<P>> {
        let Some(origin) = self.origin else {
            self.origin = Some(region);
            return Ok(SelectionOutcome::OriginSelected(region));
        };

        if origin == region {
            self.clear_selection().await;
            return Ok(SelectionOutcome::SelectionCleared);
        }

        let impulse = self.generator.begin_traversing(origin.into(), region.into())?;
        let outcome = self.configure_and_play(impulse).await?;
        if matches!(outcome, SelectionOutcome::Played(_)) {
            self.destination = Some(region);
        }
        Ok(outcome)
    }

    /// Drop origin and destination and cancel every in-flight highlight.
    pub async fn clear_selection(&mut self) {
        self.origin = None;
        self.destination = None;
        self.cancel_highlights().await;
    }

    pub async fn cancel_highlights(&mut self) {
        for mut scope in self.scopes.drain(..) {
            scope.cancel().await;
        }
    }

    async fn configure_and_play(&mut self, mut impulse: Impulse<P>) -> Result<SelectionOutcome<P>> {
        if impulse.is_empty() {
            return Ok(SelectionOutcome::NothingToPlay);
        }

        impulse
            .with_duration(self.config.impulse_duration)?
            .with_attenuation(self.config.attenuation);

        if self.config.use_effect_selector {
            impulse.with_effect(self.config.effect, self.config.effect_duration, self.config.effect_strength)?;
        } else {
            let sequence = self.config.sequence.clone().ok_or_else(|| {
                Error::InvalidState("no custom sequence configured".into())
            })?;
            impulse.with_sequence(sequence)?;
        }

        let pattern = impulse.pattern()?;
        let handle = impulse.play().await?;

        self.scopes.retain_mut(|s| !s.is_finished());
        self.scopes.push(staging::stage_highlights(
            &pattern,
            staging::visual_duration(self.config.effect_duration),
            Arc::clone(&self.sink),
        ));
        Ok(SelectionOutcome::Played(handle))
    }
}

impl ImpulseSession<MemoryPlayback> {
    /// Session whose backend is chosen by `config.playback`.
    pub fn from_config(topology: Arc<PadTopology>, sink: Arc<dyn HighlightSink>, config: SessionConfig) -> Result<Self> {
        let generator = ImpulseGenerator::from_config(&config.playback, topology);
        Self::new(generator, sink, config)
    }
}
