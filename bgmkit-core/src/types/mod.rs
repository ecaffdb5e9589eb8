// bgmkit-core/src/types/mod.rs

pub mod arrangement;
pub mod audio_config;
pub mod drum;
pub mod event;
pub mod scheduled_note;
pub mod sfx;
pub mod song;

pub use arrangement::{Arrangement, BeatGate, DrumPart, Part, PitchSource};
pub use audio_config::{
    AdsrParams, FilterSweep, Instrument, Vibrato, Waveform, GAIN_FLOOR,
};
pub use drum::{DrumSound, DrumVoice, NoiseBurstShape};
pub use event::GameEvent;
pub use scheduled_note::ScheduledNote;
pub use sfx::{GlideShape, SfxKind};
pub use song::{Chord, Song, SongError, CHORD_REPEAT_BEATS, MAX_CHORD_TONES};
