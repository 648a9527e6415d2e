use thiserror::Error;

/// Failures that keep the sequencer from leaving (or re-entering) its current phase.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SequencerError {
    #[error("invalid tempo {0} bpm (must be finite and > 0)")]
    InvalidTempo(f32),
    #[error("invalid speed factor {0} (must be finite and > 0)")]
    InvalidSpeed(f32),
    #[error("tempo estimation failed: {0}")]
    TempoEstimation(String),
    #[error("sequencer already started")]
    AlreadyStarted,
    #[error("sequencer has no tempo yet")]
    NotStarted,
    #[error("beat timer error: {0}")]
    Timer(String),
}
