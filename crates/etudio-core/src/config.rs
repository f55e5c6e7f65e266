use crate::constants::*;
use crate::duration::NoteDuration;
use crate::error::{InstrumentError, Result};
use crate::note::{NoteId, TranspositionPolicy};
use crate::voice::Envelope;
use std::str::FromStr;
use std::time::Duration;

/// Instrument tunables.
///
/// Defaults come from `constants.rs`; the web front-end overrides them from
/// `data-*` attributes on the instrument container.
#[derive(Clone, Debug, PartialEq)]
pub struct InstrumentConfig {
    pub low: NoteId,
    pub high: NoteId,
    pub transpose: TranspositionPolicy,
    pub press_visible: Duration,
    pub duration_token: String,
    pub tempo_bpm: f64,
    pub envelope: Envelope,
    pub particle_count: usize,
    pub sample_base_url: String,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_NOTE,
            high: DEFAULT_HIGH_NOTE,
            transpose: TranspositionPolicy::None,
            press_visible: Duration::from_millis(DEFAULT_PRESS_VISIBLE_MS),
            duration_token: DEFAULT_DURATION_TOKEN.to_string(),
            tempo_bpm: DEFAULT_TEMPO_BPM,
            envelope: Envelope::default(),
            particle_count: DEFAULT_PARTICLE_COUNT,
            sample_base_url: DEFAULT_SAMPLE_BASE_URL.to_string(),
        }
    }
}

/// Attribute names understood by [`InstrumentConfig::from_attributes`].
pub const CONFIG_KEYS: [&str; 11] = [
    "low",
    "high",
    "transpose",
    "press-ms",
    "duration",
    "tempo",
    "attack",
    "release",
    "gain",
    "particles",
    "sample-base",
];

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| InstrumentError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl InstrumentConfig {
    /// Defaults overridden by whatever `lookup` returns for each key in
    /// [`CONFIG_KEYS`]. Any malformed value fails the whole config.
    pub fn from_attributes<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for key in CONFIG_KEYS {
            let Some(value) = lookup(key) else {
                continue;
            };
            match key {
                "low" => config.low = value.trim().parse()?,
                "high" => config.high = value.trim().parse()?,
                "transpose" => config.transpose = value.parse()?,
                "press-ms" => {
                    config.press_visible = Duration::from_millis(parse::<u64>(key, &value)?)
                }
                "duration" => {
                    value.parse::<NoteDuration>()?;
                    config.duration_token = value.trim().to_string();
                }
                "tempo" => config.tempo_bpm = parse(key, &value)?,
                "attack" => config.envelope.attack = parse(key, &value)?,
                "release" => config.envelope.release = parse(key, &value)?,
                "gain" => config.envelope.gain = parse(key, &value)?,
                "particles" => config.particle_count = parse(key, &value)?,
                "sample-base" => config.sample_base_url = value.trim().to_string(),
                _ => {}
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.low > self.high {
            return Err(InstrumentError::EmptyRange {
                low: self.low.to_string(),
                high: self.high.to_string(),
            });
        }
        if !(MIN_TEMPO_BPM..=MAX_TEMPO_BPM).contains(&self.tempo_bpm) {
            return Err(InstrumentError::InvalidConfig {
                key: "tempo".into(),
                value: self.tempo_bpm.to_string(),
            });
        }
        if self.particle_count > MAX_PARTICLE_COUNT {
            return Err(InstrumentError::InvalidConfig {
                key: "particles".into(),
                value: self.particle_count.to_string(),
            });
        }
        self.duration_token.parse::<NoteDuration>()?;
        self.envelope.validate()
    }
}
