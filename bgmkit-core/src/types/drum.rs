//! Drum sound types
//!
//! Provides `DrumSound` for the two synthesized percussion voices of the
//! arrangement, and the fixed shapes the percussion synthesizer renders
//! them with.

use crate::types::audio_config::Waveform;
use crate::types::sfx::GlideShape;
use std::fmt;

/// Percussion sound type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrumSound {
    /// Bass drum / Kick
    Kick,
    /// Closed hi-hat
    HiHat,
}

/// Filtered white-noise burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseBurstShape {
    /// High-pass cutoff (Hz)
    pub highpass_hz: f32,
    pub peak_gain: f32,
    pub floor_gain: f32,
    /// Burst length in seconds
    pub length: f64,
}

/// How a drum sound is synthesized
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrumVoice {
    /// Pitch-swept tone
    Glide(GlideShape),
    /// Noise burst
    Noise(NoiseBurstShape),
}

impl DrumSound {
    /// Get short display name for the drum
    pub fn short_name(&self) -> &'static str {
        match self {
            DrumSound::Kick => "kick",
            DrumSound::HiHat => "hh",
        }
    }

    /// The fixed synthesis shape of this drum
    pub fn voice(&self) -> DrumVoice {
        match self {
            // Sine at 120 Hz dropping to near-silence in 200 ms
            DrumSound::Kick => DrumVoice::Glide(GlideShape {
                waveform: Waveform::Sine,
                start_hz: 120.0,
                end_hz: 0.01,
                peak_gain: 0.4,
                floor_gain: 0.01,
                length: 0.2,
            }),
            // 50 ms of noise above 8 kHz
            DrumSound::HiHat => DrumVoice::Noise(NoiseBurstShape {
                highpass_hz: 8000.0,
                peak_gain: 0.05,
                floor_gain: 0.01,
                length: 0.05,
            }),
        }
    }
}

impl fmt::Display for DrumSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
