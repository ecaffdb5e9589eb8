//! Song model: a cycling chord progression and a cycling melody.
//!
//! Both tables are indexed by the sequencer's beat counter. The progression
//! advances one chord every [`CHORD_REPEAT_BEATS`] beats, the melody one step
//! per beat; neither length has to match the other.

use thiserror::Error;

/// Beats each chord of the progression is held for
pub const CHORD_REPEAT_BEATS: u64 = 8;

/// Largest voicing a chord may carry
pub const MAX_CHORD_TONES: usize = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SongError {
    #[error("chord progression is empty")]
    EmptyProgression,
    #[error("melody is empty")]
    EmptyMelody,
    #[error("chord {index} has {len} tones, expected 1 to 5")]
    ChordSize { index: usize, len: usize },
    #[error("chord {index} has {found} tones but the progression uses {expected}")]
    MismatchedChord {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid frequency {0} Hz")]
    InvalidFrequency(f32),
    #[error("chord repeat must be at least one beat")]
    ZeroChordRepeat,
}

fn check_frequency(hz: f32) -> Result<f32, SongError> {
    if hz.is_finite() && hz > 0.0 {
        Ok(hz)
    } else {
        Err(SongError::InvalidFrequency(hz))
    }
}

/// Fundamental frequencies of one chord voicing (Hz)
#[derive(Debug, Clone, PartialEq)]
pub struct Chord {
    tones: Vec<f32>,
}

impl Chord {
    pub fn new(tones: Vec<f32>) -> Result<Self, SongError> {
        if tones.is_empty() || tones.len() > MAX_CHORD_TONES {
            return Err(SongError::ChordSize {
                index: 0,
                len: tones.len(),
            });
        }
        for &hz in &tones {
            check_frequency(hz)?;
        }
        Ok(Self { tones })
    }

    pub fn tones(&self) -> &[f32] {
        &self.tones
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    /// Lowest listed tone
    pub fn root(&self) -> f32 {
        self.tones[0]
    }

    /// Tone `index`, wrapping around the voicing
    pub fn tone(&self, index: usize) -> f32 {
        self.tones[index % self.tones.len()]
    }
}

/// Validated progression + melody pair
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    progression: Vec<Chord>,
    /// `None` is a rest
    melody: Vec<Option<f32>>,
    chord_repeat_beats: u64,
}

impl Song {
    pub fn new(progression: Vec<Chord>, melody: Vec<Option<f32>>) -> Result<Self, SongError> {
        let first = progression.first().ok_or(SongError::EmptyProgression)?;
        let expected = first.len();
        for (index, chord) in progression.iter().enumerate() {
            if chord.len() != expected {
                return Err(SongError::MismatchedChord {
                    index,
                    expected,
                    found: chord.len(),
                });
            }
        }
        if melody.is_empty() {
            return Err(SongError::EmptyMelody);
        }
        for hz in melody.iter().flatten() {
            check_frequency(*hz)?;
        }
        Ok(Self {
            progression,
            melody,
            chord_repeat_beats: CHORD_REPEAT_BEATS,
        })
    }

    /// Build from raw frequency tables where a melody value of `0` is a rest
    pub fn from_tables(chords: &[Vec<f32>], melody: &[f32]) -> Result<Self, SongError> {
        let progression = chords
            .iter()
            .enumerate()
            .map(|(index, tones)| {
                Chord::new(tones.clone()).map_err(|e| match e {
                    SongError::ChordSize { len, .. } => SongError::ChordSize { index, len },
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let melody = melody
            .iter()
            .map(|&hz| if hz == 0.0 { None } else { Some(hz) })
            .collect();
        Self::new(progression, melody)
    }

    pub fn with_chord_repeat_beats(mut self, beats: u64) -> Result<Self, SongError> {
        if beats == 0 {
            return Err(SongError::ZeroChordRepeat);
        }
        self.chord_repeat_beats = beats;
        Ok(self)
    }

    pub fn progression(&self) -> &[Chord] {
        &self.progression
    }

    pub fn melody(&self) -> &[Option<f32>] {
        &self.melody
    }

    pub fn chord_repeat_beats(&self) -> u64 {
        self.chord_repeat_beats
    }

    /// `floor(beat / chord_repeat_beats) mod chord_count`
    pub fn chord_index(&self, beat: u64) -> usize {
        ((beat / self.chord_repeat_beats) % self.progression.len() as u64) as usize
    }

    /// `beat mod melody_length`
    pub fn melody_index(&self, beat: u64) -> usize {
        (beat % self.melody.len() as u64) as usize
    }

    pub fn chord_at(&self, beat: u64) -> &Chord {
        &self.progression[self.chord_index(beat)]
    }

    pub fn melody_at(&self, beat: u64) -> Option<f32> {
        self.melody[self.melody_index(beat)]
    }

    /// Raw tables in the form [`Song::from_tables`] accepts
    pub fn to_tables(&self) -> (Vec<Vec<f32>>, Vec<f32>) {
        let chords = self.progression.iter().map(|c| c.tones.clone()).collect();
        let melody = self.melody.iter().map(|step| step.unwrap_or(0.0)).collect();
        (chords, melody)
    }

    /// The progression and melody of the game's theme
    pub fn reference() -> Self {
        Self {
            progression: reference_chords()
                .into_iter()
                .map(|tones| Chord { tones })
                .collect(),
            melody: reference_melody()
                .into_iter()
                .map(|hz| if hz == 0.0 { None } else { Some(hz) })
                .collect(),
            chord_repeat_beats: CHORD_REPEAT_BEATS,
        }
    }
}

impl Default for Song {
    fn default() -> Self {
        Self::reference()
    }
}

pub(crate) fn reference_chords() -> Vec<Vec<f32>> {
    vec![
        vec![130.81, 261.63, 329.63, 392.00], // Cmaj7
        vec![146.83, 293.66, 349.23, 440.00], // Dm7
        vec![164.81, 329.63, 392.00, 493.88], // Em7
        vec![174.61, 349.23, 440.00, 523.25], // Fmaj7
        vec![196.00, 392.00, 493.88, 587.33], // G7
        vec![220.00, 440.00, 523.25, 659.25], // Am7
        vec![174.61, 349.23, 440.00, 523.25], // Fmaj7
        vec![196.00, 392.00, 493.88, 587.33], // G7
    ]
}

pub(crate) fn reference_melody() -> Vec<f32> {
    vec![
        // bar 1
        523.25, 0.0, 523.25, 587.33, 659.25, 0.0, 659.25, 587.33,
        // bar 2
        523.25, 0.0, 493.88, 0.0, 440.00, 0.0, 392.00, 0.0,
        // bar 3
        392.00, 0.0, 523.25, 0.0, 659.25, 0.0, 783.99, 0.0,
        // bar 4
        880.00, 783.99, 659.25, 523.25, 587.33, 0.0, 0.0, 0.0,
    ]
}
