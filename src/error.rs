//! Engine error taxonomy
//!
//! None of these reach the player: the transport logs them and degrades to
//! silence.

use thiserror::Error;

use crate::audio::backend::BackendError;

/// Why a single voice could not be scheduled
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoiceError {
    #[error("invalid {what}: {value}")]
    InvalidParameter { what: &'static str, value: f64 },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioError {
    /// No audio context; the engine runs disabled
    #[error("audio backend unavailable: {0}")]
    BackendUnavailable(#[source] BackendError),
    /// The context refused to resume; retried on the next gesture
    #[error("could not resume audio context: {0}")]
    ResumeFailed(#[source] BackendError),
    /// One voice was dropped
    #[error("voice synthesis failed: {0}")]
    VoiceSynthesisFailed(#[from] VoiceError),
}
