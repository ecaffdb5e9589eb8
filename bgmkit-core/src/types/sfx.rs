//! One-shot sound effects
//!
//! A sound effect is a single glide: one oscillator whose frequency and
//! gain both fall exponentially over a few tens of milliseconds.

use crate::types::audio_config::Waveform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single oscillator with exponential frequency and gain ramps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlideShape {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub peak_gain: f32,
    pub floor_gain: f32,
    /// Length in seconds
    pub length: f64,
}

impl GlideShape {
    /// Same shape with the peak gain scaled (e.g. by the SFX volume)
    pub fn scaled(mut self, volume: f32) -> Self {
        self.peak_gain *= volume.clamp(0.0, 1.0);
        self
    }
}

/// Short non-looping cue triggered by a game event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SfxKind {
    /// Ball hitting a wall
    Bounce,
    /// UI button press
    Click,
}

impl SfxKind {
    pub fn name(&self) -> &'static str {
        match self {
            SfxKind::Bounce => "bounce",
            SfxKind::Click => "click",
        }
    }

    /// The unscaled shape of this cue
    pub fn default_glide(&self) -> GlideShape {
        match self {
            SfxKind::Bounce => GlideShape {
                waveform: Waveform::Sine,
                start_hz: 150.0,
                end_hz: 75.0,
                peak_gain: 0.2,
                floor_gain: 0.01,
                length: 0.08,
            },
            // Crisp high click
            SfxKind::Click => GlideShape {
                waveform: Waveform::Sine,
                start_hz: 800.0,
                end_hz: 400.0,
                peak_gain: 0.15,
                floor_gain: 0.01,
                length: 0.05,
            },
        }
    }
}

impl fmt::Display for SfxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
