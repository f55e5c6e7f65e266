use thiserror::Error;

/// Errors surfaced by the instrument core.
///
/// Most runtime paths (unready engine, unknown note) are deliberately not
/// errors; they report an outcome and do nothing. These variants cover
/// configuration mistakes and platform failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstrumentError {
    #[error("invalid note identifier `{0}`")]
    InvalidNote(String),

    #[error("invalid duration token `{0}`")]
    InvalidDuration(String),

    #[error("invalid envelope: {0}")]
    InvalidEnvelope(&'static str),

    #[error("invalid value `{value}` for `{key}`")]
    InvalidConfig { key: String, value: String },

    #[error("empty note range {low}..={high}")]
    EmptyRange { low: String, high: String },

    #[error("audio output unlock failed: {0}")]
    Unlock(String),

    #[error("playback failed: {0}")]
    Playback(String),

    #[error("drawing surface unavailable: {0}")]
    Surface(String),
}

pub type Result<T> = std::result::Result<T, InstrumentError>;
