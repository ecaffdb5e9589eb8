//! A note the sequencer has decided to play.
//!
//! Built when a beat fires, handed to the voice synthesizer, then dropped.

use crate::types::audio_config::Instrument;

/// One tonal voice at an absolute audio-clock time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledNote {
    /// Audio-clock time the note starts (seconds)
    pub start_time: f64,
    /// Seconds until the envelope reaches its floor
    pub duration: f64,
    pub frequency: f32,
    pub gain: f32,
    pub instrument: Instrument,
}

impl ScheduledNote {
    /// Note using the instrument's own peak gain
    pub fn new(instrument: Instrument, frequency: f32, start_time: f64, duration: f64) -> Self {
        Self {
            start_time,
            duration,
            frequency,
            gain: instrument.peak_gain,
            instrument,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}
