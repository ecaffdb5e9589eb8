//! # bgmkit
//!
//! A procedural background-music sequencer and sound-effect synthesizer for
//! games. A fixed eight-part arrangement is rendered beat by beat from a chord
//! progression and a melody; every beat is scheduled against the audio clock
//! so the music never drifts, and short one-shot cues play on top of it.
//!
//! ## Modules
//!
//! - `audio`: the backend abstraction and its software, device and recording
//!   implementations, the voice and drum synthesizers, the sequencer, the
//!   transport and the engine control thread.
//! - `commands`: the REPL command registry.
//! - `error`: the engine error taxonomy.
//! - `repl`: the interactive console used by the `bgmkit` binary.
//!
//! The data model (instruments, song, arrangement, settings) lives in
//! `bgmkit-core` and is re-exported here.

pub mod audio;
pub mod commands;
pub mod error;
pub mod repl;

// Re-export commonly used types for convenience
pub use crate::audio::{EngineHandle, PlaybackState, Transport, TransportStatus};
pub use crate::error::{AudioError, VoiceError};
pub use bgmkit_core::{AudioParams, GameEvent, SfxKind};
