use crate::constants::*;
use crate::duration::NoteDuration;
use crate::error::{InstrumentError, Result};
use crate::note::{NoteId, TranspositionPolicy};
use crate::registry::NoteRegistry;

/// State of the audio output device.
///
/// Browsers start an output `Suspended` until a user gesture unlocks it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputState {
    Running,
    Suspended,
    Closed,
}

/// Global amplitude shape applied to every new voice.
///
/// - `attack`: seconds from silence to `gain`
/// - `release`: seconds from `gain` back to silence, starting at the nominal
///   end of the note
/// - `gain`: linear peak level of each voice
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub attack: f64,
    pub release: f64,
    pub gain: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: DEFAULT_ATTACK_SEC,
            release: DEFAULT_RELEASE_SEC,
            gain: DEFAULT_VOICE_GAIN,
        }
    }
}

impl Envelope {
    pub fn validate(&self) -> Result<()> {
        if !self.attack.is_finite() || self.attack < 0.0 {
            return Err(InstrumentError::InvalidEnvelope("attack must be >= 0"));
        }
        if !self.release.is_finite() || self.release < 0.0 {
            return Err(InstrumentError::InvalidEnvelope("release must be >= 0"));
        }
        if !self.gain.is_finite() || !(0.0..=MAX_VOICE_GAIN).contains(&self.gain) {
            return Err(InstrumentError::InvalidEnvelope("gain out of range"));
        }
        Ok(())
    }
}

/// Everything a player needs to start one independent voice.
///
/// The envelope is a snapshot taken at trigger time, so later
/// `configure_envelope` calls never reach voices already sounding.
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceRequest<'a> {
    pub note: NoteId,
    pub sample_ref: &'a str,
    pub hold_sec: f64,
    pub envelope: Envelope,
}

impl VoiceRequest<'_> {
    /// Seconds from start until the release phase begins.
    #[inline]
    pub fn release_at(&self) -> f64 {
        self.hold_sec.max(self.envelope.attack)
    }

    /// Seconds from start until the voice is silent.
    #[inline]
    pub fn end_at(&self) -> f64 {
        self.release_at() + self.envelope.release
    }
}

pub type VoiceId = u64;

/// The polyphonic sample player underneath the engine.
///
/// Implementations own the audio output graph; nothing else touches it.
pub trait SamplePlayer {
    fn output_state(&self) -> OutputState;

    /// Ask a suspended output to start. May complete asynchronously; while a
    /// request is in flight, further calls return `Ok` without issuing another.
    fn unlock(&mut self) -> Result<()>;

    /// Start a new voice. Must not affect voices already sounding. Called
    /// right after a successful [`unlock`](Self::unlock) even if the output is
    /// still suspended; the voice then waits for the pending unlock.
    fn start_voice(&mut self, request: &VoiceRequest<'_>) -> Result<VoiceId>;

    fn set_master_gain(&mut self, gain: f32);

    /// Release all audio resources. Called at most once.
    fn dispose(&mut self);
}

/// What happened to one trigger request.
#[derive(Clone, Debug, PartialEq)]
pub enum TriggerOutcome {
    Started { voice: VoiceId, sounding: NoteId },
    /// Samples still loading; the press is dropped.
    NotReady,
    Disposed,
    /// The sounding note has no registry entry.
    MissingSample(NoteId),
    /// The output could not be unlocked; the next trigger tries again.
    UnlockFailed,
    PlaybackFailed,
}

impl TriggerOutcome {
    #[inline]
    pub fn is_started(&self) -> bool {
        matches!(self, TriggerOutcome::Started { .. })
    }
}

/// Owns the sample player and turns note triggers into scheduled voices.
///
/// The engine is inert until [`VoiceEngine::install`] hands it a loaded
/// player. It is disposed explicitly or when dropped, whichever comes first.
pub struct VoiceEngine<P: SamplePlayer> {
    registry: NoteRegistry,
    policy: TranspositionPolicy,
    envelope: Envelope,
    tempo_bpm: f64,
    default_duration: NoteDuration,
    master_volume: f32,
    player: Option<P>,
    disposed: bool,
}

impl<P: SamplePlayer> VoiceEngine<P> {
    pub fn new(registry: NoteRegistry, policy: TranspositionPolicy) -> Self {
        Self {
            registry,
            policy,
            envelope: Envelope::default(),
            tempo_bpm: DEFAULT_TEMPO_BPM,
            default_duration: NoteDuration::EIGHTH,
            master_volume: DEFAULT_MASTER_VOLUME,
            player: None,
            disposed: false,
        }
    }

    /// Hand over a player whose samples have all finished loading.
    ///
    /// Installing into a disposed engine disposes the player right away; this
    /// happens when the instrument unmounts while samples are still loading.
    pub fn install(&mut self, mut player: P) {
        if self.disposed {
            log::info!("[audio] engine disposed during load; releasing player");
            player.dispose();
            return;
        }
        player.set_master_gain(self.master_volume);
        if let Some(mut old) = self.player.replace(player) {
            old.dispose();
        }
        log::info!("[audio] ready ({} notes)", self.registry.len());
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        !self.disposed && self.player.is_some()
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn registry(&self) -> &NoteRegistry {
        &self.registry
    }

    pub fn policy(&self) -> TranspositionPolicy {
        self.policy
    }

    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Set attack/release/gain for subsequent triggers.
    pub fn configure_envelope(&mut self, envelope: Envelope) -> Result<()> {
        envelope.validate()?;
        self.envelope = envelope;
        Ok(())
    }

    pub fn set_tempo(&mut self, bpm: f64) -> Result<()> {
        if !(MIN_TEMPO_BPM..=MAX_TEMPO_BPM).contains(&bpm) {
            return Err(InstrumentError::InvalidConfig {
                key: "tempo".into(),
                value: bpm.to_string(),
            });
        }
        self.tempo_bpm = bpm;
        Ok(())
    }

    pub fn set_default_duration(&mut self, duration: NoteDuration) {
        self.default_duration = duration;
    }

    /// Step the master volume by `delta`, clamped to 0..=1.
    pub fn nudge_master_volume(&mut self, delta: f32) -> f32 {
        self.master_volume = (self.master_volume + delta).clamp(0.0, 1.0);
        if let Some(player) = self.player.as_mut() {
            player.set_master_gain(self.master_volume);
        }
        self.master_volume
    }

    /// Seconds a duration token lasts at the current tempo. Unparseable
    /// tokens fall back to the default duration.
    pub fn hold_seconds(&self, duration_token: &str) -> f64 {
        let duration = duration_token.parse::<NoteDuration>().unwrap_or_else(|e| {
            log::warn!("[audio] {e}; using {}", self.default_duration);
            self.default_duration
        });
        duration.to_seconds(self.tempo_bpm)
    }

    /// Start one voice for `pressed`, unlocking the output first if needed.
    ///
    /// Never blocks and never panics; every failure is reported as an outcome.
    pub fn trigger(&mut self, pressed: NoteId, duration_token: &str) -> TriggerOutcome {
        if self.disposed {
            return TriggerOutcome::Disposed;
        }
        let hold_sec = self.hold_seconds(duration_token);
        let Some(player) = self.player.as_mut() else {
            log::debug!("[audio] {pressed} dropped: samples still loading");
            return TriggerOutcome::NotReady;
        };
        let Some(sounding) = self.policy.apply(pressed) else {
            log::warn!("[audio] {pressed} cannot be transposed by {:?}", self.policy);
            return TriggerOutcome::MissingSample(pressed);
        };
        let Some(entry) = self.registry.resolve(&sounding) else {
            log::warn!("[audio] no sample registered for {sounding}");
            return TriggerOutcome::MissingSample(sounding);
        };

        match player.output_state() {
            OutputState::Running => {}
            OutputState::Suspended => {
                if let Err(e) = player.unlock() {
                    log::warn!("[audio] {e}");
                    return TriggerOutcome::UnlockFailed;
                }
                log::info!("[audio] output unlocked");
            }
            OutputState::Closed => {
                log::warn!("[audio] output closed; {pressed} dropped");
                return TriggerOutcome::PlaybackFailed;
            }
        }

        let request = VoiceRequest {
            note: sounding,
            sample_ref: &entry.sample_ref,
            hold_sec,
            envelope: self.envelope,
        };
        match player.start_voice(&request) {
            Ok(voice) => TriggerOutcome::Started { voice, sounding },
            Err(e) => {
                log::warn!("[audio] {sounding}: {e}");
                TriggerOutcome::PlaybackFailed
            }
        }
    }

    /// Release the player and its audio resources. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(mut player) = self.player.take() {
            player.dispose();
            log::info!("[audio] disposed");
        }
    }
}

impl<P: SamplePlayer> Drop for VoiceEngine<P> {
    fn drop(&mut self) {
        self.dispose();
    }
}
