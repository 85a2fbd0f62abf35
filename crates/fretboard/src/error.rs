use thiserror::Error;

/// Errors raised when caller input or dictionary data cannot be interpreted.
///
/// Ordinary gestures never produce these: lookup misses are reported through
/// `ChordData::empty` and stale indices heal to "nothing selected".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FretboardError {
    #[error("invalid note name `{0}`")]
    InvalidNote(String),

    #[error("invalid interval `{0}`")]
    InvalidInterval(String),

    #[error("unknown tuning `{0}`")]
    UnknownTuning(String),

    #[error("unknown string `{0}`")]
    UnknownString(String),

    #[error("octave {0} is out of range")]
    InvalidOctave(i8),
}

pub type Result<T> = std::result::Result<T, FretboardError>;
