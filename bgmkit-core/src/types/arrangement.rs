//! The arrangement: which parts sound on which beat.
//!
//! Every part is gated by a modulo rule on the beat counter and pulls its
//! pitch from the song (a chord tone, an arpeggio over the chord, or the
//! melody). The sequencer walks this table once per beat.

use crate::types::audio_config::Instrument;
use crate::types::drum::DrumSound;
use crate::types::scheduled_note::ScheduledNote;
use crate::types::song::Song;

/// Fires on beat `n` iff `(n + offset) % every == 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatGate {
    pub every: u64,
    pub offset: u64,
}

impl BeatGate {
    /// Open on every beat
    pub const ALWAYS: BeatGate = BeatGate {
        every: 1,
        offset: 0,
    };

    pub fn every(every: u64) -> Self {
        Self {
            every: every.max(1),
            offset: 0,
        }
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn is_open(&self, beat: u64) -> bool {
        (beat + self.offset) % self.every.max(1) == 0
    }
}

/// Where a part takes its frequency from on a given beat
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchSource {
    /// Tone `index` of the current chord, multiplied by `ratio`
    ChordTone { index: usize, ratio: f32 },
    /// Tone `beat % cycle` of the current chord
    Arpeggio { cycle: u64 },
    /// Current melody step; rests produce no note
    Melody,
}

impl PitchSource {
    pub fn frequency(&self, song: &Song, beat: u64) -> Option<f32> {
        match *self {
            PitchSource::ChordTone { index, ratio } => Some(song.chord_at(beat).tone(index) * ratio),
            PitchSource::Arpeggio { cycle } => {
                let step = (beat % cycle.max(1)) as usize;
                Some(song.chord_at(beat).tone(step))
            }
            PitchSource::Melody => song.melody_at(beat),
        }
    }
}

/// One tonal line of the arrangement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Part {
    pub name: &'static str,
    pub instrument: Instrument,
    pub gate: BeatGate,
    pub pitch: PitchSource,
    /// Note length in beats
    pub length_beats: f64,
}

/// One percussion line of the arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrumPart {
    pub sound: DrumSound,
    pub gate: BeatGate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub drums: Vec<DrumPart>,
    pub parts: Vec<Part>,
}

impl Arrangement {
    /// The game's fixed eight-part arrangement
    pub fn reference() -> Self {
        let drums = vec![
            DrumPart {
                sound: DrumSound::Kick,
                gate: BeatGate::every(2),
            },
            DrumPart {
                sound: DrumSound::HiHat,
                gate: BeatGate::ALWAYS,
            },
        ];

        let parts = vec![
            Part {
                name: "bass",
                instrument: Instrument::bass(),
                gate: BeatGate::every(2),
                pitch: PitchSource::ChordTone {
                    index: 0,
                    ratio: 0.5,
                },
                length_beats: 1.0,
            },
            Part {
                name: "cello",
                instrument: Instrument::cello(),
                gate: BeatGate::every(8),
                pitch: PitchSource::ChordTone {
                    index: 0,
                    ratio: 0.5,
                },
                length_beats: 8.5,
            },
            Part {
                name: "guitar",
                instrument: Instrument::guitar(),
                gate: BeatGate::ALWAYS,
                pitch: PitchSource::Arpeggio { cycle: 4 },
                length_beats: 2.0,
            },
            Part {
                name: "piano",
                instrument: Instrument::piano(),
                gate: BeatGate::ALWAYS,
                pitch: PitchSource::Melody,
                length_beats: 1.5,
            },
            Part {
                name: "crystal",
                instrument: Instrument::crystal(),
                gate: BeatGate::every(4),
                pitch: PitchSource::ChordTone {
                    index: 2,
                    ratio: 2.0,
                },
                length_beats: 6.0,
            },
            Part {
                name: "soft square",
                instrument: Instrument::soft_square(),
                gate: BeatGate::every(8).with_offset(2),
                pitch: PitchSource::ChordTone {
                    index: 1,
                    ratio: 2.0,
                },
                length_beats: 7.0,
            },
        ];

        Self { drums, parts }
    }

    /// Drums sounding on `beat`
    pub fn drums_on(&self, beat: u64) -> Vec<DrumSound> {
        self.drums
            .iter()
            .filter(|d| d.gate.is_open(beat))
            .map(|d| d.sound)
            .collect()
    }

    /// Tonal notes sounding on `beat`, all starting at `start_time`
    pub fn notes_on(
        &self,
        song: &Song,
        beat: u64,
        start_time: f64,
        beat_duration: f64,
    ) -> Vec<ScheduledNote> {
        self.parts
            .iter()
            .filter(|part| part.gate.is_open(beat))
            .filter_map(|part| {
                let frequency = part.pitch.frequency(song, beat)?;
                Some(ScheduledNote::new(
                    part.instrument,
                    frequency,
                    start_time,
                    part.length_beats * beat_duration,
                ))
            })
            .collect()
    }
}

impl Default for Arrangement {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_offset() {
        let gate = BeatGate::every(8).with_offset(2);
        assert!(gate.is_open(6));
        assert!(gate.is_open(14));
        assert!(!gate.is_open(0));
        assert!(!gate.is_open(2));
    }

    #[test]
    fn test_zero_every_is_treated_as_one() {
        assert!(BeatGate::every(0).is_open(7));
    }

    #[test]
    fn test_beat_zero_plays_downbeat_parts() {
        let arrangement = Arrangement::reference();
        let song = Song::reference();
        let names: Vec<_> = arrangement
            .parts
            .iter()
            .filter(|p| p.gate.is_open(0))
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["bass", "cello", "guitar", "piano", "crystal"]);
        // Melody step 0 is sounding, so all five produce a note
        assert_eq!(arrangement.notes_on(&song, 0, 0.0, 0.45).len(), 5);
        assert_eq!(
            arrangement.drums_on(0),
            vec![DrumSound::Kick, DrumSound::HiHat]
        );
    }

    #[test]
    fn test_rest_skips_piano() {
        let arrangement = Arrangement::reference();
        let song = Song::reference();
        // Beat 1: guitar only (melody rests)
        let notes = arrangement.notes_on(&song, 1, 2.0, 0.45);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].instrument, Instrument::guitar());
        assert_eq!(arrangement.drums_on(1), vec![DrumSound::HiHat]);
    }

    #[test]
    fn test_pitch_sources() {
        let song = Song::reference();
        let root = song.chord_at(0).root();
        assert_eq!(
            PitchSource::ChordTone {
                index: 0,
                ratio: 0.5
            }
            .frequency(&song, 0),
            Some(root * 0.5)
        );
        assert_eq!(
            PitchSource::Arpeggio { cycle: 4 }.frequency(&song, 3),
            Some(song.chord_at(3).tone(3))
        );
        assert_eq!(PitchSource::Melody.frequency(&song, 1), None);
    }

    #[test]
    fn test_note_lengths_scale_with_beat() {
        let arrangement = Arrangement::reference();
        let song = Song::reference();
        let notes = arrangement.notes_on(&song, 0, 1.0, 0.5);
        let cello = notes
            .iter()
            .find(|n| n.instrument == Instrument::cello())
            .unwrap();
        assert!((cello.duration - 4.25).abs() < 1e-9);
        assert!(notes.iter().all(|n| n.start_time == 1.0));
    }
}
