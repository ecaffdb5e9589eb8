pub mod adsr;
pub mod backend;
pub mod clock;
pub mod device;
pub mod drum_synth;
pub mod graph;
pub mod param;
pub mod playback_engine;
pub mod recording;
pub mod scheduler;
pub mod sfx;
pub mod transport;
pub mod voice;

pub use backend::{AudioBackend, Automation, BackendError, ContextState, FilterKind, NodeId, Param, Target};
pub use playback_engine::{EngineCommand, EngineHandle};
pub use transport::{PlaybackState, Transport, TransportStatus};
