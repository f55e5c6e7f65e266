use crate::error::{InstrumentError, Result};
use std::fmt;
use std::str::FromStr;

/// Rhythmic modifier of a note-value token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feel {
    Straight,
    Dotted,
    Triplet,
}

/// Nominal duration of a trigger, in musical or absolute terms.
///
/// Token grammar:
/// - `"<n>n"`, `"<n>n."`, `"<n>t"`: note values (`n` a power of two, 1..=64),
///   straight, dotted or triplet; `"8n"` is an eighth note
/// - `"<n>m"`: whole measures of 4/4
/// - a plain number: seconds (`"0.5"`)
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoteDuration {
    Value { division: u32, feel: Feel },
    Measures(u32),
    Seconds(f64),
}

impl NoteDuration {
    pub const EIGHTH: NoteDuration = NoteDuration::Value {
        division: 8,
        feel: Feel::Straight,
    };

    /// Length in seconds at `bpm` quarter notes per minute.
    pub fn to_seconds(&self, bpm: f64) -> f64 {
        let whole = 4.0 * 60.0 / bpm;
        match *self {
            NoteDuration::Value { division, feel } => {
                let base = whole / division as f64;
                match feel {
                    Feel::Straight => base,
                    Feel::Dotted => base * 1.5,
                    Feel::Triplet => base * 2.0 / 3.0,
                }
            }
            NoteDuration::Measures(n) => whole * n as f64,
            NoteDuration::Seconds(s) => s,
        }
    }
}

impl FromStr for NoteDuration {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        let invalid = || InstrumentError::InvalidDuration(s.to_string());

        let division = |digits: &str| -> Result<u32> {
            let n: u32 = digits.parse().map_err(|_| invalid())?;
            if n == 0 || n > 64 || !n.is_power_of_two() {
                return Err(invalid());
            }
            Ok(n)
        };

        if let Some(digits) = token.strip_suffix("n.") {
            return Ok(NoteDuration::Value {
                division: division(digits)?,
                feel: Feel::Dotted,
            });
        }
        if let Some(digits) = token.strip_suffix('n') {
            return Ok(NoteDuration::Value {
                division: division(digits)?,
                feel: Feel::Straight,
            });
        }
        if let Some(digits) = token.strip_suffix('t') {
            return Ok(NoteDuration::Value {
                division: division(digits)?,
                feel: Feel::Triplet,
            });
        }
        if let Some(digits) = token.strip_suffix('m') {
            let n: u32 = digits.parse().map_err(|_| invalid())?;
            if n == 0 {
                return Err(invalid());
            }
            return Ok(NoteDuration::Measures(n));
        }
        let seconds: f64 = token.parse().map_err(|_| invalid())?;
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(invalid());
        }
        Ok(NoteDuration::Seconds(seconds))
    }
}

impl fmt::Display for NoteDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            NoteDuration::Value { division, feel } => match feel {
                Feel::Straight => write!(f, "{division}n"),
                Feel::Dotted => write!(f, "{division}n."),
                Feel::Triplet => write!(f, "{division}t"),
            },
            NoteDuration::Measures(n) => write!(f, "{n}m"),
            NoteDuration::Seconds(s) => write!(f, "{s}"),
        }
    }
}
