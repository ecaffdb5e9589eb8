//! # bgmkit Core
//!
//! Pure data model for the bgmkit procedural music engine. Nothing in this
//! crate touches an audio device: it describes *what* to play (instruments,
//! the song, the per-part arrangement, drum and sound-effect shapes) and the
//! persisted audio settings, while the `bgmkit` crate decides *how* to render it.
//!
//! ## Example
//!
//! ```
//! use bgmkit_core::types::{Arrangement, Song};
//!
//! let song = Song::reference();
//! let arrangement = Arrangement::reference();
//!
//! // Beat 0 opens every part gated on multiples of 2, 4 and 8.
//! let notes = arrangement.notes_on(&song, 0, 0.0, 0.45);
//! assert!(!notes.is_empty());
//! assert_eq!(song.chord_index(10), 1);
//! ```

pub mod config;
pub mod types;

pub use config::{AudioParams, BgmParams, ConfigError, SfxParams};
pub use types::{
    AdsrParams, Arrangement, Chord, DrumSound, GameEvent, Instrument, ScheduledNote, SfxKind, Song,
    SongError, Waveform,
};
