use crate::config::InstrumentConfig;
use crate::duration::NoteDuration;
use crate::error::Result;
use crate::feedback::PressFeedbackTracker;
use crate::input::{InputEvent, InputRouter};
use crate::keymap::KeyMap;
use crate::note::NoteId;
use crate::registry::NoteRegistry;
use crate::voice::{SamplePlayer, TriggerOutcome, VoiceEngine};
use instant::Instant;
use smallvec::SmallVec;
use std::time::Duration;

/// Result of one resolved press: the sound attempt and the highlight mark.
#[derive(Clone, Debug, PartialEq)]
pub struct Press {
    pub note: NoteId,
    pub sound: TriggerOutcome,
    /// Generation of the feedback mark; hand it back to
    /// [`PressFeedbackTracker::expire`] when the highlight timer fires.
    pub generation: u64,
    pub visible_for: Duration,
}

/// The mounted instrument: voice engine, press feedback and input routing.
///
/// Created on mount, dropped on unmount; dropping disposes the engine.
pub struct Instrument<P: SamplePlayer> {
    pub engine: VoiceEngine<P>,
    pub feedback: PressFeedbackTracker,
    router: InputRouter,
    config: InstrumentConfig,
}

impl<P: SamplePlayer> Instrument<P> {
    pub fn new(config: InstrumentConfig) -> Result<Self> {
        config.validate()?;
        let keys = KeyMap::standard();
        let registry = NoteRegistry::chromatic(config.low, config.high, &keys)?;
        let mut engine = VoiceEngine::new(registry, config.transpose);
        engine.configure_envelope(config.envelope)?;
        engine.set_tempo(config.tempo_bpm)?;
        engine.set_default_duration(config.duration_token.parse::<NoteDuration>()?);
        Ok(Self {
            engine,
            feedback: PressFeedbackTracker::new(),
            router: InputRouter::new(keys),
            config,
        })
    }

    pub fn config(&self) -> &InstrumentConfig {
        &self.config
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn handle_input(&mut self, event: InputEvent<'_>) -> Option<Press> {
        self.handle_input_at(event, Instant::now())
    }

    /// Route `event`; if it resolves to a key on this keyboard, sound it and
    /// mark it. Notes outside the registry are ignored.
    pub fn handle_input_at(&mut self, event: InputEvent<'_>, now: Instant) -> Option<Press> {
        let note = self.router.route(event)?;
        if !self.engine.registry().contains(&note) {
            log::warn!("[keys] {note} is not on this keyboard");
            return None;
        }
        Some(self.press_at(note, now))
    }

    /// Trigger the voice and mark the key. Both always happen: a failed or
    /// dropped trigger still highlights the key. Callers check that `note`
    /// is on the keyboard.
    pub fn press_at(&mut self, note: NoteId, now: Instant) -> Press {
        let sound = self.engine.trigger(note, &self.config.duration_token);
        let visible_for = self.config.press_visible;
        let generation = self.feedback.mark_at(note, visible_for, now);
        log::debug!("[keys] {note} -> {sound:?}");
        Press {
            note,
            sound,
            generation,
            visible_for,
        }
    }

    pub fn release_highlight(&mut self, note: NoteId, generation: u64) -> SmallVec<[NoteId; 8]> {
        self.release_highlight_at(note, generation, Instant::now())
    }

    /// Highlight timer for `note` fired. Drops its mark if `generation` is
    /// still the latest, plus any other mark whose window has already elapsed
    /// (a timer that never fired). Returns every note to un-highlight.
    pub fn release_highlight_at(
        &mut self,
        note: NoteId,
        generation: u64,
        now: Instant,
    ) -> SmallVec<[NoteId; 8]> {
        let mut released = self.feedback.sweep(now);
        if self.feedback.expire(&note, generation) {
            released.push(note);
        }
        released
    }
}
