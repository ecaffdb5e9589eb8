//! Software audio graph
//!
//! A small Web-Audio-like renderer: oscillators, gain stages, biquad filters
//! and one-shot noise bursts wired into a DAG and evaluated one sample at a
//! time in topological order. Parameters follow [`ParamTimeline`] automation
//! and may additionally be driven by other nodes (vibrato).
//!
//! The clock is the number of rendered frames divided by the sample rate, so
//! it only moves while [`AudioGraph::render`] is called on a running graph.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::f32::consts::PI;

use bgmkit_core::types::Waveform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::backend::{
    AudioBackend, Automation, BackendError, BackendResult, ContextState, FilterKind, NodeId, Param,
    Target,
};
use crate::audio::param::ParamTimeline;

pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

/// Butterworth Q, the resonance every filter uses
const FILTER_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

const DEFAULT_FREQUENCY: f32 = 440.0;
const DEFAULT_CUTOFF: f32 = 350.0;

/// Phase-accumulator waveform value for a phase in `[0, 1)`
fn waveform_value(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (2.0 * PI * phase).sin(),
        // Ramps from -1 to 1, then resets
        Waveform::Sawtooth => 2.0 * phase - 1.0,
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => {
            if phase < 0.5 {
                4.0 * phase - 1.0
            } else {
                3.0 - 4.0 * phase
            }
        }
    }
}

/// Second-order IIR filter, RBJ cookbook coefficients, transposed direct form II
#[derive(Debug, Clone)]
struct Biquad {
    kind: FilterKind,
    sample_rate: f64,
    cutoff: f32,
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl Biquad {
    fn new(kind: FilterKind, sample_rate: f32) -> Self {
        let mut filter = Self {
            kind,
            sample_rate: sample_rate as f64,
            cutoff: f32::NAN,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
        };
        filter.set_cutoff(DEFAULT_CUTOFF);
        filter
    }

    fn set_cutoff(&mut self, hz: f32) {
        let nyquist = (self.sample_rate * 0.5) as f32;
        let hz = hz.clamp(10.0, nyquist * 0.99);
        if (hz - self.cutoff).abs() < 0.01 {
            return;
        }
        self.cutoff = hz;

        let w0 = 2.0 * std::f64::consts::PI * hz as f64 / self.sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * FILTER_Q);
        let a0 = 1.0 + alpha;

        let (b0, b1, b2) = match self.kind {
            FilterKind::LowPass => {
                let b1 = 1.0 - cos_w0;
                (b1 / 2.0, b1, b1 / 2.0)
            }
            FilterKind::HighPass => {
                let b0 = (1.0 + cos_w0) / 2.0;
                (b0, -(1.0 + cos_w0), b0)
            }
        };
        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = -2.0 * cos_w0 / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Oscillator {
        waveform: Waveform,
        phase: f32,
        frequency: ParamTimeline,
    },
    Gain {
        gain: ParamTimeline,
    },
    Filter {
        biquad: Biquad,
        cutoff: ParamTimeline,
    },
    Noise {
        buffer: Vec<f32>,
        length: f64,
    },
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    inputs: Vec<NodeId>,
    modulators: Vec<(Param, NodeId)>,
    to_output: bool,
    /// Never reclaimed
    held: bool,
    /// Has been connected to at least once
    fed: bool,
    start: Option<f64>,
    stop: Option<f64>,
    output: f32,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            inputs: Vec::new(),
            modulators: Vec::new(),
            to_output: false,
            held: false,
            fed: false,
            start: None,
            stop: None,
            output: 0.0,
        }
    }

    fn is_source(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Oscillator { .. } | NodeKind::Noise { .. }
        )
    }

    fn param_mut(&mut self, param: Param) -> Option<&mut ParamTimeline> {
        match (&mut self.kind, param) {
            (NodeKind::Oscillator { frequency, .. }, Param::Frequency) => Some(frequency),
            (NodeKind::Gain { gain }, Param::Gain) => Some(gain),
            (NodeKind::Filter { cutoff, .. }, Param::Cutoff) => Some(cutoff),
            _ => None,
        }
    }

    fn param(&self, param: Param) -> Option<&ParamTimeline> {
        match (&self.kind, param) {
            (NodeKind::Oscillator { frequency, .. }, Param::Frequency) => Some(frequency),
            (NodeKind::Gain { gain }, Param::Gain) => Some(gain),
            (NodeKind::Filter { cutoff, .. }, Param::Cutoff) => Some(cutoff),
            _ => None,
        }
    }

    fn is_sounding(&self, t: f64) -> bool {
        self.start.is_some_and(|s| t >= s) && self.stop.map_or(true, |e| t < e)
    }

    fn is_finished(&self, t: f64) -> bool {
        if self.held {
            return false;
        }
        if self.is_source() {
            self.stop.is_some_and(|e| t >= e)
        } else {
            self.fed && self.inputs.is_empty() && self.modulators.is_empty()
        }
    }

    fn sources(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inputs
            .iter()
            .copied()
            .chain(self.modulators.iter().map(|(_, id)| *id))
    }
}

fn param_slot(param: Param) -> usize {
    match param {
        Param::Frequency => 0,
        Param::Gain => 1,
        Param::Cutoff => 2,
    }
}

/// Offline renderer implementing [`AudioBackend`]
pub struct AudioGraph {
    sample_rate: f32,
    frames: u64,
    state: ContextState,
    next_id: u64,
    nodes: BTreeMap<NodeId, Node>,
    /// Evaluation order, rebuilt when `dirty`
    plan: Vec<NodeId>,
    dirty: bool,
    rng: StdRng,
}

impl AudioGraph {
    /// A suspended graph at `sample_rate`
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frames: 0,
            state: ContextState::Suspended,
            next_id: 1,
            nodes: BTreeMap::new(),
            plan: Vec::new(),
            dirty: false,
            rng: StdRng::seed_from_u64(0x6b17),
        }
    }

    /// A graph whose clock is already running
    pub fn running(sample_rate: f32) -> Self {
        let mut graph = Self::new(sample_rate);
        graph.state = ContextState::Running;
        graph
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn suspend(&mut self) {
        self.state = ContextState::Suspended;
    }

    /// Number of live nodes (bus included)
    pub fn active_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Automated value of `param` at the current clock time
    pub fn param_value(&self, node: NodeId, param: Param) -> Option<f32> {
        let t = self.current_time();
        self.nodes.get(&node)?.param(param).map(|p| p.value_at(t))
    }

    /// Render a mono block, then reclaim finished nodes.
    ///
    /// A suspended graph outputs silence and its clock stays put.
    pub fn render(&mut self, out: &mut [f32]) {
        if self.state == ContextState::Suspended {
            out.fill(0.0);
            return;
        }
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
        self.collect();
    }

    /// Render `seconds` of audio and return the peak absolute level
    pub fn render_for(&mut self, seconds: f64) -> f32 {
        let mut remaining = (seconds * self.sample_rate as f64).round() as usize;
        let mut block = [0.0f32; 256];
        let mut peak = 0.0f32;
        while remaining > 0 {
            let n = remaining.min(block.len());
            self.render(&mut block[..n]);
            peak = block[..n].iter().fold(peak, |p, s| p.max(s.abs()));
            remaining -= n;
            if self.state == ContextState::Suspended {
                break;
            }
        }
        peak
    }

    /// Evaluate one frame and advance the clock
    pub fn next_sample(&mut self) -> f32 {
        if self.state == ContextState::Suspended {
            return 0.0;
        }
        if self.dirty {
            self.rebuild_plan();
        }
        let t = self.current_time();
        let sample_rate = self.sample_rate;
        let mut mix = 0.0f32;

        for index in 0..self.plan.len() {
            let id = self.plan[index];
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let input: f32 = node
                .inputs
                .iter()
                .filter_map(|i| self.nodes.get(i))
                .map(|n| n.output)
                .sum();
            let mut modulation = [0.0f32; 3];
            for (param, source) in &node.modulators {
                if let Some(n) = self.nodes.get(source) {
                    modulation[param_slot(*param)] += n.output;
                }
            }

            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            let sounding = node.is_sounding(t);
            let start = node.start.unwrap_or(0.0);
            node.output = match &mut node.kind {
                NodeKind::Oscillator {
                    waveform,
                    phase,
                    frequency,
                } => {
                    if sounding {
                        let hz = frequency.value_at(t) + modulation[0];
                        let value = waveform_value(*waveform, *phase);
                        *phase = (*phase + hz / sample_rate).rem_euclid(1.0);
                        value
                    } else {
                        0.0
                    }
                }
                NodeKind::Noise { buffer, .. } => {
                    if sounding {
                        let index = ((t - start) * sample_rate as f64) as usize;
                        buffer.get(index).copied().unwrap_or(0.0)
                    } else {
                        0.0
                    }
                }
                NodeKind::Gain { gain } => input * (gain.value_at(t) + modulation[1]),
                NodeKind::Filter { biquad, cutoff } => {
                    biquad.set_cutoff(cutoff.value_at(t) + modulation[2]);
                    biquad.process(input as f64) as f32
                }
            };
            if node.to_output {
                mix += node.output;
            }
        }

        self.frames += 1;
        mix.clamp(-1.0, 1.0)
    }

    /// Drop finished nodes and settled automation
    fn collect(&mut self) {
        let t = self.current_time();
        loop {
            let finished: HashSet<NodeId> = self
                .nodes
                .iter()
                .filter(|(_, node)| node.is_finished(t))
                .map(|(id, _)| *id)
                .collect();
            if finished.is_empty() {
                break;
            }
            log::trace!(target: "bgmkit::graph", "reclaiming {} nodes at {:.3}s", finished.len(), t);
            self.nodes.retain(|id, _| !finished.contains(id));
            for node in self.nodes.values_mut() {
                node.inputs.retain(|i| !finished.contains(i));
                node.modulators.retain(|(_, i)| !finished.contains(i));
            }
            self.dirty = true;
        }

        for node in self.nodes.values_mut() {
            for param in [Param::Frequency, Param::Gain, Param::Cutoff] {
                if let Some(timeline) = node.param_mut(param) {
                    timeline.prune_before(t);
                }
            }
        }
    }

    fn rebuild_plan(&mut self) {
        let mut indegree: HashMap<NodeId, usize> = self.nodes.keys().map(|id| (*id, 0)).collect();
        let mut dependents: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for (id, node) in &self.nodes {
            for source in node.sources() {
                if self.nodes.contains_key(&source) {
                    *indegree.entry(*id).or_default() += 1;
                    dependents.entry(source).or_default().push(*id);
                }
            }
        }

        let mut ready: VecDeque<NodeId> = self
            .nodes
            .keys()
            .filter(|id| indegree.get(id) == Some(&0))
            .copied()
            .collect();
        let mut plan = Vec::with_capacity(self.nodes.len());
        while let Some(id) = ready.pop_front() {
            plan.push(id);
            for dependent in dependents.get(&id).into_iter().flatten() {
                if let Some(count) = indegree.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(*dependent);
                    }
                }
            }
        }
        self.plan = plan;
        self.dirty = false;
    }

    /// True when `ancestor` feeds `node`, directly or not
    fn feeds(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut stack = vec![node];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == ancestor {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(n) = self.nodes.get(&current) {
                stack.extend(n.sources());
            }
        }
        false
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        self.dirty = true;
        id
    }

    fn node_mut(&mut self, node: NodeId) -> BackendResult<&mut Node> {
        self.nodes
            .get_mut(&node)
            .ok_or(BackendError::UnknownNode(node))
    }

    fn source_mut(&mut self, node: NodeId) -> BackendResult<&mut Node> {
        let n = self.node_mut(node)?;
        if n.is_source() {
            Ok(n)
        } else {
            Err(BackendError::NotASource(node))
        }
    }

    fn timeline_mut(&mut self, node: NodeId, param: Param) -> BackendResult<&mut ParamTimeline> {
        self.node_mut(node)?
            .param_mut(param)
            .ok_or(BackendError::UnknownParam { node, param })
    }
}

impl Default for AudioGraph {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl AudioBackend for AudioGraph {
    fn current_time(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> BackendResult {
        self.state = ContextState::Running;
        Ok(())
    }

    fn create_oscillator(&mut self, waveform: Waveform) -> BackendResult<NodeId> {
        Ok(self.insert(Node::new(NodeKind::Oscillator {
            waveform,
            phase: 0.0,
            frequency: ParamTimeline::new(DEFAULT_FREQUENCY),
        })))
    }

    fn create_gain(&mut self) -> BackendResult<NodeId> {
        Ok(self.insert(Node::new(NodeKind::Gain {
            gain: ParamTimeline::new(1.0),
        })))
    }

    fn create_bus(&mut self) -> BackendResult<NodeId> {
        let mut node = Node::new(NodeKind::Gain {
            gain: ParamTimeline::new(1.0),
        });
        node.held = true;
        Ok(self.insert(node))
    }

    fn create_filter(&mut self, kind: FilterKind) -> BackendResult<NodeId> {
        Ok(self.insert(Node::new(NodeKind::Filter {
            biquad: Biquad::new(kind, self.sample_rate),
            cutoff: ParamTimeline::new(DEFAULT_CUTOFF),
        })))
    }

    fn create_noise_burst(&mut self, duration: f64) -> BackendResult<NodeId> {
        let frames = (duration.max(0.0) * self.sample_rate as f64).ceil() as usize;
        let buffer = (0..frames)
            .map(|_| self.rng.random_range(-1.0f32..1.0))
            .collect();
        Ok(self.insert(Node::new(NodeKind::Noise {
            buffer,
            length: duration.max(0.0),
        })))
    }

    fn set_param(&mut self, node: NodeId, param: Param, value: f32) -> BackendResult {
        self.timeline_mut(node, param)?.set(value);
        Ok(())
    }

    fn automate(&mut self, node: NodeId, param: Param, automation: Automation) -> BackendResult {
        let now = self.current_time();
        self.timeline_mut(node, param)?.insert(automation, now);
        Ok(())
    }

    fn cancel_scheduled(&mut self, node: NodeId, param: Param, from: f64) -> BackendResult {
        self.timeline_mut(node, param)?.cancel_and_hold(from);
        Ok(())
    }

    fn connect(&mut self, from: NodeId, to: Target) -> BackendResult {
        if !self.nodes.contains_key(&from) {
            return Err(BackendError::UnknownNode(from));
        }
        let invalid = BackendError::InvalidConnection { from, to };
        match to {
            Target::Output => {
                self.node_mut(from)?.to_output = true;
            }
            Target::Node(dest) => {
                if dest == from || self.feeds(dest, from) {
                    return Err(invalid);
                }
                let node = self.node_mut(dest)?;
                if node.is_source() {
                    return Err(invalid);
                }
                node.inputs.push(from);
                node.fed = true;
            }
            Target::Param(dest, param) => {
                if dest == from || self.feeds(dest, from) {
                    return Err(invalid);
                }
                let node = self.node_mut(dest)?;
                if node.param(param).is_none() {
                    return Err(BackendError::UnknownParam { node: dest, param });
                }
                node.modulators.push((param, from));
                node.fed = true;
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn start(&mut self, node: NodeId, at: f64) -> BackendResult {
        let n = self.source_mut(node)?;
        n.start = Some(at);
        if let NodeKind::Noise { length, .. } = n.kind {
            let end = at + length;
            n.stop = Some(n.stop.map_or(end, |s| s.min(end)));
        }
        Ok(())
    }

    fn stop(&mut self, node: NodeId, at: f64) -> BackendResult {
        let n = self.source_mut(node)?;
        n.stop = Some(at);
        Ok(())
    }

    fn release(&mut self, node: NodeId) -> BackendResult {
        if self.nodes.remove(&node).is_none() {
            return Err(BackendError::UnknownNode(node));
        }
        for other in self.nodes.values_mut() {
            other.inputs.retain(|i| *i != node);
            other.modulators.retain(|(_, i)| *i != node);
        }
        self.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 8_000.0;

    #[test]
    fn test_waveform_ranges() {
        for waveform in [
            Waveform::Sine,
            Waveform::Sawtooth,
            Waveform::Square,
            Waveform::Triangle,
        ] {
            for i in 0..100 {
                let value = waveform_value(waveform, i as f32 / 100.0);
                assert!(
                    (-1.0..=1.0).contains(&value),
                    "{:?} out of range: {}",
                    waveform,
                    value
                );
            }
        }
    }

    #[test]
    fn test_suspended_clock_does_not_advance() {
        let mut graph = AudioGraph::new(SAMPLE_RATE);
        let mut block = [1.0f32; 64];
        graph.render(&mut block);
        assert_eq!(graph.current_time(), 0.0);
        assert!(block.iter().all(|s| *s == 0.0));

        graph.resume().unwrap();
        graph.render(&mut block);
        assert!((graph.current_time() - 64.0 / SAMPLE_RATE as f64).abs() < 1e-12);
    }

    #[test]
    fn test_oscillator_sounds_between_start_and_stop() {
        let mut graph = AudioGraph::running(SAMPLE_RATE);
        let osc = graph.create_oscillator(Waveform::Square).unwrap();
        let gain = graph.create_gain().unwrap();
        graph.set_param(gain, Param::Gain, 0.5).unwrap();
        graph.connect(osc, Target::Node(gain)).unwrap();
        graph.connect(gain, Target::Output).unwrap();
        graph.start(osc, 0.1).unwrap();
        graph.stop(osc, 0.2).unwrap();

        assert_eq!(graph.render_for(0.1), 0.0);
        assert_eq!(graph.render_for(0.1), 0.5);
        assert_eq!(graph.render_for(0.1), 0.0);
    }

    #[test]
    fn test_finished_voice_is_reclaimed_but_bus_is_held() {
        let mut graph = AudioGraph::running(SAMPLE_RATE);
        let bus = graph.create_bus().unwrap();
        graph.connect(bus, Target::Output).unwrap();

        let osc = graph.create_oscillator(Waveform::Sine).unwrap();
        let filter = graph.create_filter(FilterKind::LowPass).unwrap();
        let gain = graph.create_gain().unwrap();
        graph.connect(osc, Target::Node(filter)).unwrap();
        graph.connect(filter, Target::Node(gain)).unwrap();
        graph.connect(gain, Target::Node(bus)).unwrap();
        graph.start(osc, 0.0).unwrap();
        graph.stop(osc, 0.05).unwrap();
        assert_eq!(graph.active_nodes(), 4);

        graph.render_for(0.1);
        assert_eq!(graph.active_nodes(), 1);
        assert!(graph.contains(bus));
    }

    #[test]
    fn test_unfed_nodes_are_kept() {
        let mut graph = AudioGraph::running(SAMPLE_RATE);
        let gain = graph.create_gain().unwrap();
        graph.render_for(0.1);
        assert!(graph.contains(gain));
    }

    #[test]
    fn test_noise_burst_plays_once() {
        let mut graph = AudioGraph::running(SAMPLE_RATE);
        let noise = graph.create_noise_burst(0.05).unwrap();
        graph.connect(noise, Target::Output).unwrap();
        graph.start(noise, 0.0).unwrap();
        assert!(graph.render_for(0.05) > 0.0);
        assert!(!graph.contains(noise));
        assert_eq!(graph.render_for(0.05), 0.0);
    }

    #[test]
    fn test_rejects_cycles_and_source_inputs() {
        let mut graph = AudioGraph::running(SAMPLE_RATE);
        let a = graph.create_gain().unwrap();
        let b = graph.create_gain().unwrap();
        let osc = graph.create_oscillator(Waveform::Sine).unwrap();
        graph.connect(a, Target::Node(b)).unwrap();
        assert!(matches!(
            graph.connect(b, Target::Node(a)),
            Err(BackendError::InvalidConnection { .. })
        ));
        assert!(matches!(
            graph.connect(a, Target::Node(osc)),
            Err(BackendError::InvalidConnection { .. })
        ));
        assert!(matches!(
            graph.connect(a, Target::Param(b, Param::Frequency)),
            Err(BackendError::InvalidConnection { .. }) | Err(BackendError::UnknownParam { .. })
        ));
    }

    #[test]
    fn test_gain_automation_applies() {
        let mut graph = AudioGraph::running(SAMPLE_RATE);
        let gain = graph.create_gain().unwrap();
        graph
            .automate(gain, Param::Gain, Automation::SetValue { value: 0.0, at: 0.0 })
            .unwrap();
        graph
            .automate(gain, Param::Gain, Automation::LinearRamp { value: 1.0, end: 1.0 })
            .unwrap();
        graph.render_for(0.5);
        let value = graph.param_value(gain, Param::Gain).unwrap();
        assert!((value - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_unknown_node_and_param() {
        let mut graph = AudioGraph::running(SAMPLE_RATE);
        let gain = graph.create_gain().unwrap();
        assert_eq!(
            graph.set_param(NodeId(999), Param::Gain, 1.0),
            Err(BackendError::UnknownNode(NodeId(999)))
        );
        assert_eq!(
            graph.set_param(gain, Param::Cutoff, 1.0),
            Err(BackendError::UnknownParam {
                node: gain,
                param: Param::Cutoff
            })
        );
    }

    #[test]
    fn test_lowpass_attenuates_high_tone() {
        let mut graph = AudioGraph::running(SAMPLE_RATE);
        let osc = graph.create_oscillator(Waveform::Sine).unwrap();
        graph.set_param(osc, Param::Frequency, 3_000.0).unwrap();
        let filter = graph.create_filter(FilterKind::LowPass).unwrap();
        graph.set_param(filter, Param::Cutoff, 100.0).unwrap();
        graph.connect(osc, Target::Node(filter)).unwrap();
        graph.connect(filter, Target::Output).unwrap();
        graph.start(osc, 0.0).unwrap();
        graph.render_for(0.05);
        assert!(graph.render_for(0.05) < 0.05);
    }
}
