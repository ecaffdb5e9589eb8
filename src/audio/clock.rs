//! Anchored beat clock
//!
//! Beat times are always recomputed from a fixed origin on the audio clock
//! (`origin + n * beat_duration`) instead of being accumulated, so late
//! wake-ups never push later beats out of tempo.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatClock {
    origin: f64,
    beat_duration: f64,
}

impl BeatClock {
    pub fn new(beat_duration: f64) -> Self {
        Self {
            origin: 0.0,
            beat_duration,
        }
    }

    /// Re-anchor beat 0 at `origin`
    pub fn anchor(&mut self, origin: f64) {
        self.origin = origin;
    }

    pub fn origin(&self) -> f64 {
        self.origin
    }

    pub fn beat_duration(&self) -> f64 {
        self.beat_duration
    }

    /// Audio-clock time of beat `n`
    pub fn fire_time(&self, beat: u64) -> f64 {
        self.origin + beat as f64 * self.beat_duration
    }
}
