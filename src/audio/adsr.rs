//! ADSR (Attack, Decay, Sustain, Release) envelope planning
//!
//! Turns an envelope shape and a note's time window into absolute-time gain
//! automation. The backend interpolates the ramps; nothing here runs per
//! sample.
//!
//! # Example
//! ```
//! use bgmkit::audio::adsr::EnvelopePlan;
//! use bgmkit_core::types::AdsrParams;
//!
//! let plan = EnvelopePlan::new(&AdsrParams::new(0.1, 0.2, 0.5, 0.3), 0.8, 1.0, 2.0);
//! assert_eq!(plan.end(), 3.0);
//! assert_eq!(plan.ramps().len(), 5);
//! ```

use bgmkit_core::types::{AdsrParams, GAIN_FLOOR};

use crate::audio::backend::Automation;

/// Gain automation for one note
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopePlan {
    ramps: Vec<Automation>,
    end: f64,
}

impl EnvelopePlan {
    /// Plan the envelope of a note peaking at `peak` from `start` for `duration` seconds.
    ///
    /// Attack and decay are shrunk proportionally when they do not fit in
    /// the note; the sustain hold only appears when the release leaves room
    /// for it.
    pub fn new(params: &AdsrParams, peak: f32, start: f64, duration: f64) -> Self {
        let duration = duration.max(0.0);
        let end = start + duration;
        let sustain_level = peak * params.sustain;

        let mut attack = params.attack.max(0.0) as f64;
        let mut decay = params.decay.max(0.0) as f64;
        if attack + decay > duration && attack + decay > 0.0 {
            let scale = duration / (attack + decay);
            attack *= scale;
            decay *= scale;
        }
        let peak_at = start + attack;
        let decayed_at = peak_at + decay;
        let release_from = end - params.release.max(0.0) as f64;

        // Onset, attack, decay
        let mut ramps = vec![
            Automation::SetValue {
                value: 0.0,
                at: start,
            },
            Automation::LinearRamp {
                value: peak,
                end: peak_at,
            },
            Automation::LinearRamp {
                value: sustain_level,
                end: decayed_at,
            },
        ];
        if release_from > decayed_at {
            // Sustain hold
            ramps.push(Automation::LinearRamp {
                value: sustain_level,
                end: release_from,
            });
        }
        ramps.push(Automation::ExponentialRamp {
            value: GAIN_FLOOR,
            end,
        });

        Self { ramps, end }
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// The automation events in submission order
    pub fn ramps(&self) -> &[Automation] {
        &self.ramps
    }
}
