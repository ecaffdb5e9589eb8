//! Look-ahead sequencer
//!
//! Each wake fires one beat: every part of the arrangement whose gate is
//! open is submitted to the backend at the current clock time, then the
//! next wake is computed from the anchored origin.

use bgmkit_core::types::{Arrangement, Song};

use crate::audio::backend::{AudioBackend, NodeId, Target};
use crate::audio::clock::BeatClock;
use crate::audio::drum_synth::play_drum;
use crate::audio::voice::play_voice;
use crate::error::AudioError;

/// What one fired beat did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatReport {
    pub beat: u64,
    pub fired_at: f64,
    /// Voices submitted successfully
    pub voices: usize,
    /// Voices the backend refused
    pub dropped: usize,
    /// Audio-clock time of the next beat
    pub next_fire: f64,
}

/// Walks the arrangement one beat per wake
pub struct Sequencer {
    song: Song,
    arrangement: Arrangement,
    clock: BeatClock,
    beat: u64,
}

impl Sequencer {
    pub fn new(song: Song, arrangement: Arrangement, beat_duration: f64) -> Self {
        Self {
            song,
            arrangement,
            clock: BeatClock::new(beat_duration),
            beat: 0,
        }
    }

    /// Rewind to beat 0 anchored at `now`
    pub fn reset(&mut self, now: f64) {
        self.beat = 0;
        self.clock.anchor(now);
    }

    /// Next beat to fire
    pub fn beat(&self) -> u64 {
        self.beat
    }

    pub fn origin(&self) -> f64 {
        self.clock.origin()
    }

    pub fn beat_duration(&self) -> f64 {
        self.clock.beat_duration()
    }

    pub fn fire_time(&self, beat: u64) -> f64 {
        self.clock.fire_time(beat)
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    /// Submit the current beat's voices into `bus` and advance.
    ///
    /// The whole beat goes to the backend as one batch with one start time:
    /// `now`, or the backend clock if that has already moved past it. A voice
    /// the backend refuses is dropped and logged; the beat goes on.
    pub fn fire<B: AudioBackend>(&mut self, backend: &mut B, bus: NodeId, now: f64) -> BeatReport {
        let beat = self.beat;
        let destination = Target::Node(bus);
        let beat_duration = self.clock.beat_duration();
        let (song, arrangement) = (&self.song, &self.arrangement);
        let mut fired_at = now;
        let mut voices = 0;
        let mut dropped = 0;

        backend.submit(&mut |backend: &mut dyn AudioBackend| {
            fired_at = now.max(backend.current_time());

            for sound in arrangement.drums_on(beat) {
                match play_drum(&mut *backend, destination, sound, fired_at) {
                    Ok(_) => voices += 1,
                    Err(e) => {
                        dropped += 1;
                        log::warn!(target: "bgmkit::sequencer", "beat {}: {} dropped: {}", beat, sound, AudioError::from(e));
                    }
                }
            }

            for note in &arrangement.notes_on(song, beat, fired_at, beat_duration) {
                match play_voice(&mut *backend, destination, note) {
                    Ok(_) => voices += 1,
                    Err(e) => {
                        dropped += 1;
                        log::warn!(target: "bgmkit::sequencer", "beat {}: {:.2} Hz dropped: {}", beat, note.frequency, AudioError::from(e));
                    }
                }
            }
        });

        self.beat += 1;
        let next_fire = self.clock.fire_time(self.beat);
        log::trace!(
            target: "bgmkit::sequencer",
            "beat {} at {:.3}s: {} voices, chord {}, next at {:.3}s",
            beat,
            fired_at,
            voices,
            self.song.chord_index(beat),
            next_fire
        );

        BeatReport {
            beat,
            fired_at,
            voices,
            dropped,
            next_fire,
        }
    }
}
