//! Recording backend for tests
//!
//! Records every operation instead of rendering it. The clock only moves
//! when the test moves it, and failures can be injected per operation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bgmkit_core::types::Waveform;

use crate::audio::backend::{
    AudioBackend, Automation, BackendError, BackendResult, ContextState, FilterKind, NodeId, Param,
    Target,
};

/// An operation recorded by `RecordingBackend` for assertion in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOp {
    Resume,
    CreateOscillator { node: NodeId, waveform: Waveform },
    CreateGain { node: NodeId },
    CreateBus { node: NodeId },
    CreateFilter { node: NodeId, kind: FilterKind },
    CreateNoiseBurst { node: NodeId, duration: f64 },
    SetParam { node: NodeId, param: Param, value: f32 },
    Automate { node: NodeId, param: Param, automation: Automation },
    CancelScheduled { node: NodeId, param: Param, from: f64 },
    Connect { from: NodeId, to: Target },
    Start { node: NodeId, at: f64 },
    Stop { node: NodeId, at: f64 },
    Release { node: NodeId },
}

#[derive(Debug, Default)]
struct Recording {
    time: f64,
    state: ContextState,
    ops: Vec<BackendOp>,
    next_id: u64,
    /// Oscillator creations left to fail
    failing_oscillators: usize,
    fail_resume: bool,
}

/// Backend that records operations; clones share one recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingBackend {
    /// A running backend at time zero
    pub fn new() -> Self {
        let backend = Self::default();
        backend.lock().state = ContextState::Running;
        backend
    }

    /// A backend that starts suspended, like a context awaiting a gesture
    pub fn suspended() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_time(&self, time: f64) {
        self.lock().time = time;
    }

    pub fn advance(&self, seconds: f64) {
        self.lock().time += seconds;
    }

    /// Make the next `count` oscillator creations fail
    pub fn fail_oscillators(&self, count: usize) {
        self.lock().failing_oscillators = count;
    }

    pub fn fail_resume(&self, fail: bool) {
        self.lock().fail_resume = fail;
    }

    /// Snapshot of all recorded operations
    pub fn operations(&self) -> Vec<BackendOp> {
        self.lock().ops.clone()
    }

    pub fn clear(&self) {
        self.lock().ops.clear();
    }

    pub fn count<F: Fn(&BackendOp) -> bool>(&self, f: F) -> usize {
        self.lock().ops.iter().filter(|op| f(op)).count()
    }

    pub fn find<F: Fn(&BackendOp) -> bool>(&self, f: F) -> Option<BackendOp> {
        self.lock().ops.iter().find(|op| f(op)).cloned()
    }

    /// Position of the first operation matching `f`
    pub fn position<F: Fn(&BackendOp) -> bool>(&self, f: F) -> Option<usize> {
        self.lock().ops.iter().position(|op| f(op))
    }

    /// Operations that touched `param` on `node`, in order
    pub fn param_ops(&self, node: NodeId, param: Param) -> Vec<BackendOp> {
        self.lock()
            .ops
            .iter()
            .filter(|op| match op {
                BackendOp::SetParam { node: n, param: p, .. }
                | BackendOp::Automate { node: n, param: p, .. }
                | BackendOp::CancelScheduled { node: n, param: p, .. } => *n == node && *p == param,
                _ => false,
            })
            .cloned()
            .collect()
    }

    pub fn oscillators_created(&self) -> usize {
        self.count(|op| matches!(op, BackendOp::CreateOscillator { .. }))
    }

    fn record(&self, op: BackendOp) {
        self.lock().ops.push(op);
    }

    fn create(&self, make: impl FnOnce(NodeId) -> BackendOp) -> NodeId {
        let mut recording = self.lock();
        recording.next_id += 1;
        let node = NodeId(recording.next_id);
        recording.ops.push(make(node));
        node
    }
}

impl AudioBackend for RecordingBackend {
    fn current_time(&self) -> f64 {
        self.lock().time
    }

    fn state(&self) -> ContextState {
        self.lock().state
    }

    fn resume(&mut self) -> BackendResult {
        let mut recording = self.lock();
        recording.ops.push(BackendOp::Resume);
        if recording.fail_resume {
            return Err(BackendError::Device("resume refused".to_string()));
        }
        recording.state = ContextState::Running;
        Ok(())
    }

    fn create_oscillator(&mut self, waveform: Waveform) -> BackendResult<NodeId> {
        {
            let mut recording = self.lock();
            if recording.failing_oscillators > 0 {
                recording.failing_oscillators -= 1;
                return Err(BackendError::Device("oscillator refused".to_string()));
            }
        }
        Ok(self.create(|node| BackendOp::CreateOscillator { node, waveform }))
    }

    fn create_gain(&mut self) -> BackendResult<NodeId> {
        Ok(self.create(|node| BackendOp::CreateGain { node }))
    }

    fn create_bus(&mut self) -> BackendResult<NodeId> {
        Ok(self.create(|node| BackendOp::CreateBus { node }))
    }

    fn create_filter(&mut self, kind: FilterKind) -> BackendResult<NodeId> {
        Ok(self.create(|node| BackendOp::CreateFilter { node, kind }))
    }

    fn create_noise_burst(&mut self, duration: f64) -> BackendResult<NodeId> {
        Ok(self.create(|node| BackendOp::CreateNoiseBurst { node, duration }))
    }

    fn set_param(&mut self, node: NodeId, param: Param, value: f32) -> BackendResult {
        self.record(BackendOp::SetParam { node, param, value });
        Ok(())
    }

    fn automate(&mut self, node: NodeId, param: Param, automation: Automation) -> BackendResult {
        self.record(BackendOp::Automate {
            node,
            param,
            automation,
        });
        Ok(())
    }

    fn cancel_scheduled(&mut self, node: NodeId, param: Param, from: f64) -> BackendResult {
        self.record(BackendOp::CancelScheduled { node, param, from });
        Ok(())
    }

    fn connect(&mut self, from: NodeId, to: Target) -> BackendResult {
        self.record(BackendOp::Connect { from, to });
        Ok(())
    }

    fn start(&mut self, node: NodeId, at: f64) -> BackendResult {
        self.record(BackendOp::Start { node, at });
        Ok(())
    }

    fn stop(&mut self, node: NodeId, at: f64) -> BackendResult {
        self.record(BackendOp::Stop { node, at });
        Ok(())
    }

    fn release(&mut self, node: NodeId) -> BackendResult {
        self.record(BackendOp::Release { node });
        Ok(())
    }
}
