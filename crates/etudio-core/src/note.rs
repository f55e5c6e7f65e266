use crate::error::{InstrumentError, Result};
use std::fmt;
use std::str::FromStr;

/// Chromatic pitch class, sharp spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Semitones above C (0..12).
    #[inline]
    pub fn semitone(self) -> i32 {
        self as i32
    }

    #[inline]
    pub fn from_semitone(semitone: i32) -> PitchClass {
        Self::ALL[semitone.rem_euclid(12) as usize]
    }

    /// Black key on a piano keyboard.
    #[inline]
    pub fn is_sharp(self) -> bool {
        matches!(
            self,
            PitchClass::CSharp
                | PitchClass::DSharp
                | PitchClass::FSharp
                | PitchClass::GSharp
                | PitchClass::ASharp
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }

    /// Spelling used by sample file names, where `#` is written `s`.
    pub fn file_token(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "Cs",
            PitchClass::D => "D",
            PitchClass::DSharp => "Ds",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "Fs",
            PitchClass::G => "G",
            PitchClass::GSharp => "Gs",
            PitchClass::A => "A",
            PitchClass::ASharp => "As",
            PitchClass::B => "B",
        }
    }

    fn natural(letter: char) -> Option<PitchClass> {
        match letter {
            'C' => Some(PitchClass::C),
            'D' => Some(PitchClass::D),
            'E' => Some(PitchClass::E),
            'F' => Some(PitchClass::F),
            'G' => Some(PitchClass::G),
            'A' => Some(PitchClass::A),
            'B' => Some(PitchClass::B),
            _ => None,
        }
    }
}

pub const MIN_OCTAVE: i8 = -1;
pub const MAX_OCTAVE: i8 = 9;

/// A pitch plus octave, e.g. `C#4`. Ordered by pitch height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteId {
    octave: i8,
    pitch: PitchClass,
}

impl NoteId {
    pub const fn new(pitch: PitchClass, octave: i8) -> Self {
        Self { octave, pitch }
    }

    #[inline]
    pub fn pitch(&self) -> PitchClass {
        self.pitch
    }

    #[inline]
    pub fn octave(&self) -> i8 {
        self.octave
    }

    /// MIDI note number (C4 = 60).
    #[inline]
    pub fn midi(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.pitch.semitone()
    }

    pub fn from_midi(midi: i32) -> Option<NoteId> {
        let octave = midi.div_euclid(12) - 1;
        if !(MIN_OCTAVE as i32..=MAX_OCTAVE as i32).contains(&octave) {
            return None;
        }
        Some(NoteId::new(PitchClass::from_semitone(midi), octave as i8))
    }

    /// Shift by `semitones`; `None` when the result leaves the octave range.
    pub fn transpose(&self, semitones: i32) -> Option<NoteId> {
        NoteId::from_midi(self.midi() + semitones)
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.pitch.is_sharp()
    }

    /// Sample file stem, e.g. `Fs4` for `F#4`.
    pub fn file_stem(&self) -> String {
        format!("{}{}", self.pitch.file_token(), self.octave)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch.name(), self.octave)
    }
}

impl FromStr for NoteId {
    type Err = InstrumentError;

    /// Accepts `C4`, `C#4`, `Db4` and negative octaves (`C-1`). Flats are
    /// normalised to the sharp spelling.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || InstrumentError::InvalidNote(s.to_string());
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let natural = PitchClass::natural(letter).ok_or_else(invalid)?;
        let rest = chars.as_str();
        let (accidental, octave_str) = match rest.chars().next() {
            Some('#') => (1, &rest[1..]),
            Some('b') => (-1, &rest[1..]),
            _ => (0, rest),
        };
        if octave_str.is_empty() || octave_str.starts_with('+') {
            return Err(invalid());
        }
        let octave: i32 = octave_str.parse().map_err(|_| invalid())?;
        if !(MIN_OCTAVE as i32..=MAX_OCTAVE as i32).contains(&octave) {
            return Err(invalid());
        }
        let midi = (octave + 1) * 12 + natural.semitone() + accidental;
        NoteId::from_midi(midi).ok_or_else(invalid)
    }
}

/// Maps the pressed note to the note whose sample actually sounds.
///
/// `OctaveUp` plays each key one octave above its label, which lets a sample
/// set that starts higher cover the lower keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TranspositionPolicy {
    #[default]
    None,
    OctaveUp,
}

impl TranspositionPolicy {
    #[inline]
    pub fn semitones(self) -> i32 {
        match self {
            TranspositionPolicy::None => 0,
            TranspositionPolicy::OctaveUp => 12,
        }
    }

    /// Pressed note → sounding note.
    pub fn apply(self, pressed: NoteId) -> Option<NoteId> {
        pressed.transpose(self.semitones())
    }

    /// Sounding note → pressed note.
    pub fn invert(self, sounding: NoteId) -> Option<NoteId> {
        sounding.transpose(-self.semitones())
    }
}

impl FromStr for TranspositionPolicy {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "0" => Ok(TranspositionPolicy::None),
            "octave-up" | "octave_up" | "+12" | "12" => Ok(TranspositionPolicy::OctaveUp),
            _ => Err(InstrumentError::InvalidConfig {
                key: "transpose".into(),
                value: s.to_string(),
            }),
        }
    }
}
