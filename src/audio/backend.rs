//! Audio backend trait: the audio-graph operations the synthesizers emit.
//!
//! `AudioBackend` captures what the engine *means* to do (create an
//! oscillator, ramp a gain, route a node) independently of how the graph is
//! rendered. Every timed operation takes an absolute time on the backend's
//! own audio clock, so callers submit future events and never block.
//!
//! Three implementations ship: [`AudioGraph`](crate::audio::graph::AudioGraph)
//! renders offline, [`CpalBackend`](crate::audio::device::CpalBackend) drives
//! that graph from the default output device, and
//! [`RecordingBackend`](crate::audio::recording::RecordingBackend) records
//! operations for tests.

use bgmkit_core::types::Waveform;
use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T = ()> = Result<T, BackendError>;

/// Handle to a node owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Error from a backend operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("audio backend unavailable: {0}")]
    Unavailable(String),
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("node {node:?} has no {param:?} parameter")]
    UnknownParam { node: NodeId, param: Param },
    #[error("node {0:?} is not a source")]
    NotASource(NodeId),
    #[error("cannot connect {from:?} to {to:?}")]
    InvalidConnection { from: NodeId, to: Target },
    #[error("audio device error: {0}")]
    Device(String),
    #[error("audio graph lock poisoned")]
    Poisoned,
}

/// Automatable node parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Oscillator frequency (Hz)
    Frequency,
    /// Gain stage multiplier
    Gain,
    /// Filter cutoff (Hz)
    Cutoff,
}

/// One absolute-time event on a parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Automation {
    /// Jump to `value` at `at`
    SetValue { value: f32, at: f64 },
    /// Linear ramp from the previous event, reaching `value` at `end`
    LinearRamp { value: f32, end: f64 },
    /// Exponential ramp from the previous event, reaching `value` at `end`
    ExponentialRamp { value: f32, end: f64 },
}

impl Automation {
    /// Time the event takes effect (a ramp's end)
    pub fn time(&self) -> f64 {
        match *self {
            Automation::SetValue { at, .. } => at,
            Automation::LinearRamp { end, .. } | Automation::ExponentialRamp { end, .. } => end,
        }
    }

    pub fn value(&self) -> f32 {
        match *self {
            Automation::SetValue { value, .. }
            | Automation::LinearRamp { value, .. }
            | Automation::ExponentialRamp { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    LowPass,
    HighPass,
}

/// Where a node's output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Audio input of another node
    Node(NodeId),
    /// Added to a parameter of another node (modulation)
    Param(NodeId, Param),
    /// Main output
    Output,
}

/// Whether the backend clock is advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextState {
    Running,
    #[default]
    Suspended,
}

/// Semantic-level audio backend trait.
///
/// Nodes created here belong to the backend: sources are reclaimed after
/// their stop time and processing nodes once nothing feeds them, except
/// nodes made by [`AudioBackend::create_bus`], which live as long as the
/// backend.
pub trait AudioBackend {
    /// Current audio clock time in seconds
    fn current_time(&self) -> f64;

    fn state(&self) -> ContextState;

    /// Start (or restart) the audio clock
    fn resume(&mut self) -> BackendResult;

    fn create_oscillator(&mut self, waveform: Waveform) -> BackendResult<NodeId>;

    fn create_gain(&mut self) -> BackendResult<NodeId>;

    /// A gain stage that is never reclaimed
    fn create_bus(&mut self) -> BackendResult<NodeId>;

    fn create_filter(&mut self, kind: FilterKind) -> BackendResult<NodeId>;

    /// White noise of `duration` seconds, played once from its start time
    fn create_noise_burst(&mut self, duration: f64) -> BackendResult<NodeId>;

    /// Set a parameter now, dropping anything scheduled on it
    fn set_param(&mut self, node: NodeId, param: Param, value: f32) -> BackendResult;

    fn automate(&mut self, node: NodeId, param: Param, automation: Automation) -> BackendResult;

    /// Drop events at or after `from`, holding the value reached at `from`
    fn cancel_scheduled(&mut self, node: NodeId, param: Param, from: f64) -> BackendResult;

    fn connect(&mut self, from: NodeId, to: Target) -> BackendResult;

    /// Start a source at an absolute time
    fn start(&mut self, node: NodeId, at: f64) -> BackendResult;

    /// Stop a source at an absolute time
    fn stop(&mut self, node: NodeId, at: f64) -> BackendResult;

    /// Drop a node now, together with every connection to or from it
    fn release(&mut self, node: NodeId) -> BackendResult;

    /// Run `batch` as one submission.
    ///
    /// A backend rendered on another thread must not render between the
    /// operations of one batch, so that every operation sees the same clock.
    fn submit(&mut self, batch: &mut dyn FnMut(&mut dyn AudioBackend))
    where
        Self: Sized,
    {
        batch(self)
    }
}
