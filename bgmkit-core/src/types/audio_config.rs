//! Instrument descriptors
//!
//! These pure data types carry no synthesis logic. They describe the
//! waveform, envelope, filter sweep and vibrato of every tonal voice the
//! sequencer plays, and are shared by value between the arrangement and the
//! voice synthesizer.

use serde::{Deserialize, Serialize};

/// Lowest level an exponential ramp is allowed to target.
///
/// Exponential ramps can never reach zero, so envelopes and sweeps decay
/// toward this floor instead.
pub const GAIN_FLOOR: f32 = 1e-4;

/// Available waveform types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

/// ADSR envelope parameters (pure data, no sample generation)
///
/// - `attack`: Time in seconds to rise from 0 to the peak gain
/// - `decay`: Time in seconds to fall from peak to sustain level
/// - `sustain`: Level to hold, relative to the peak (0.0-1.0, NOT time!)
/// - `release`: Time in seconds of the final decay toward silence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl AdsrParams {
    /// Create custom ADSR parameters
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack: attack.max(0.001), // Minimum 1ms to avoid clicks
            decay: decay.max(0.0),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(0.001), // Minimum 1ms to avoid clicks
        }
    }
}

/// Low-pass cutoff sweep applied over the whole note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSweep {
    /// Cutoff at note start (Hz)
    pub cutoff_hz: f32,
    /// Cutoff reached at note end (Hz); `None` holds the cutoff
    pub target_hz: Option<f32>,
}

impl FilterSweep {
    /// Sweep down to half the starting cutoff, the darkening used by every
    /// tonal part of the reference arrangement
    pub fn halving(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            target_hz: Some(cutoff_hz * 0.5),
        }
    }
}

/// Pitch vibrato from a sine LFO
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vibrato {
    pub rate_hz: f32,
    /// Peak deviation as a fraction of the note frequency
    pub depth_ratio: f32,
}

impl Default for Vibrato {
    fn default() -> Self {
        Self {
            rate_hz: 5.0,
            depth_ratio: 0.01,
        }
    }
}

/// Immutable description of a tonal voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instrument {
    pub waveform: Waveform,
    pub peak_gain: f32,
    pub envelope: AdsrParams,
    pub filter: Option<FilterSweep>,
    pub vibrato: Option<Vibrato>,
}

impl Instrument {
    pub fn new(waveform: Waveform, peak_gain: f32, envelope: AdsrParams) -> Self {
        Self {
            waveform,
            peak_gain: peak_gain.max(0.0),
            envelope,
            filter: None,
            vibrato: None,
        }
    }

    pub fn with_filter(mut self, filter: FilterSweep) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_vibrato(mut self, vibrato: Vibrato) -> Self {
        self.vibrato = Some(vibrato);
        self
    }

    /// Round triangle bass, one per even beat
    pub fn bass() -> Self {
        Self::new(Waveform::Triangle, 0.12, AdsrParams::new(0.05, 0.1, 0.5, 0.2))
            .with_filter(FilterSweep::halving(250.0))
    }

    /// Slow sawtooth cello pad with vibrato
    pub fn cello() -> Self {
        Self::new(Waveform::Sawtooth, 0.1, AdsrParams::new(1.5, 0.5, 0.8, 2.0))
            .with_filter(FilterSweep::halving(400.0))
            .with_vibrato(Vibrato::default())
    }

    /// Quiet square "electric guitar" arpeggio
    pub fn guitar() -> Self {
        Self::new(Waveform::Square, 0.04, AdsrParams::new(0.1, 0.5, 0.4, 1.0))
            .with_filter(FilterSweep::halving(800.0))
    }

    /// Triangle piano carrying the melody
    pub fn piano() -> Self {
        Self::new(Waveform::Triangle, 0.12, AdsrParams::new(0.01, 0.3, 0.4, 0.8))
            .with_filter(FilterSweep::halving(2500.0))
    }

    /// Bright triangle lead an octave above the chord
    pub fn crystal() -> Self {
        Self::new(Waveform::Triangle, 0.08, AdsrParams::new(0.2, 0.3, 0.7, 2.0))
            .with_filter(FilterSweep::halving(3000.0))
    }

    /// Rounded square counter-line
    pub fn soft_square() -> Self {
        Self::new(Waveform::Square, 0.05, AdsrParams::new(0.3, 0.4, 0.6, 2.5))
            .with_filter(FilterSweep::halving(1500.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_waveform_is_sine() {
        assert_eq!(Waveform::default(), Waveform::Sine);
    }

    #[test]
    fn test_adsr_params_clamping() {
        let params = AdsrParams::new(0.0, -1.0, 1.5, -1.0);
        assert!(params.attack >= 0.001);
        assert!(params.release >= 0.001);
        assert_eq!(params.decay, 0.0);
        assert!(params.sustain <= 1.0);
    }

    #[test]
    fn test_halving_sweep() {
        let sweep = FilterSweep::halving(800.0);
        assert_eq!(sweep.target_hz, Some(400.0));
    }

    #[test]
    fn test_only_cello_has_vibrato() {
        assert!(Instrument::cello().vibrato.is_some());
        for instrument in [
            Instrument::bass(),
            Instrument::guitar(),
            Instrument::piano(),
            Instrument::crystal(),
            Instrument::soft_square(),
        ] {
            assert!(instrument.vibrato.is_none());
            assert!(instrument.filter.is_some());
        }
    }

    #[test]
    fn test_negative_peak_gain_is_clamped() {
        let instrument = Instrument::new(Waveform::Sine, -0.5, AdsrParams::new(0.01, 0.1, 0.7, 0.2));
        assert_eq!(instrument.peak_gain, 0.0);
    }
}
