//! Voice synthesizer
//!
//! Emits the backend operations for one tonal note (oscillator, ADSR gain,
//! optional low-pass sweep, optional vibrato) and for a glide, the
//! single-oscillator pitch drop shared by the kick and the sound effects.
//! Every node is started and stopped at absolute times and then left to the
//! backend to reclaim. Start times are taken as given: callers pick one time
//! for everything they submit together.

use bgmkit_core::types::{GlideShape, ScheduledNote, Waveform, GAIN_FLOOR};

use crate::audio::adsr::EnvelopePlan;
use crate::audio::backend::{AudioBackend, Automation, BackendResult, FilterKind, NodeId, Param, Target};
use crate::error::VoiceError;

/// Nodes created so far for one voice
#[derive(Debug, Default)]
pub(crate) struct VoiceNodes(Vec<NodeId>);

impl VoiceNodes {
    pub(crate) fn track(&mut self, created: BackendResult<NodeId>) -> BackendResult<NodeId> {
        let node = created?;
        self.0.push(node);
        Ok(node)
    }

    /// Release every tracked node if the voice could not be built
    pub(crate) fn settle<B: AudioBackend + ?Sized, T>(
        self,
        backend: &mut B,
        result: Result<T, VoiceError>,
    ) -> Result<T, VoiceError> {
        if result.is_err() {
            for node in self.0.into_iter().rev() {
                if let Err(e) = backend.release(node) {
                    log::debug!(target: "bgmkit::sequencer", "could not release {:?}: {}", node, e);
                }
            }
        }
        result
    }
}

fn require_positive(what: &'static str, value: f64) -> Result<(), VoiceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(VoiceError::InvalidParameter { what, value })
    }
}

/// Schedule one note into `destination`.
///
/// Returns the oscillator carrying the note. Nodes built before a failing
/// operation are released again.
pub fn play_voice<B: AudioBackend + ?Sized>(
    backend: &mut B,
    destination: Target,
    note: &ScheduledNote,
) -> Result<NodeId, VoiceError> {
    require_positive("frequency", note.frequency as f64)?;
    require_positive("duration", note.duration)?;
    if !note.gain.is_finite() {
        return Err(VoiceError::InvalidParameter {
            what: "gain",
            value: note.gain as f64,
        });
    }

    let mut nodes = VoiceNodes::default();
    let result = build_voice(backend, destination, note, &mut nodes);
    nodes.settle(backend, result)
}

fn build_voice<B: AudioBackend + ?Sized>(
    backend: &mut B,
    destination: Target,
    note: &ScheduledNote,
    nodes: &mut VoiceNodes,
) -> Result<NodeId, VoiceError> {
    let instrument = &note.instrument;
    let start = note.start_time;
    let envelope = EnvelopePlan::new(&instrument.envelope, note.gain.max(0.0), start, note.duration);
    let end = envelope.end();

    let osc = nodes.track(backend.create_oscillator(instrument.waveform))?;
    backend.set_param(osc, Param::Frequency, note.frequency)?;

    let amp = nodes.track(backend.create_gain())?;
    backend.set_param(amp, Param::Gain, 0.0)?;
    for &ramp in envelope.ramps() {
        backend.automate(amp, Param::Gain, ramp)?;
    }

    match instrument.filter {
        Some(sweep) => {
            let lowpass = nodes.track(backend.create_filter(FilterKind::LowPass))?;
            backend.set_param(lowpass, Param::Cutoff, sweep.cutoff_hz)?;
            if let Some(target) = sweep.target_hz {
                backend.automate(
                    lowpass,
                    Param::Cutoff,
                    Automation::SetValue {
                        value: sweep.cutoff_hz,
                        at: start,
                    },
                )?;
                backend.automate(
                    lowpass,
                    Param::Cutoff,
                    Automation::ExponentialRamp {
                        value: target.max(GAIN_FLOOR),
                        end,
                    },
                )?;
            }
            backend.connect(osc, Target::Node(lowpass))?;
            backend.connect(lowpass, Target::Node(amp))?;
        }
        None => backend.connect(osc, Target::Node(amp))?,
    }
    backend.connect(amp, destination)?;

    if let Some(vibrato) = instrument.vibrato {
        let lfo = nodes.track(backend.create_oscillator(Waveform::Sine))?;
        backend.set_param(lfo, Param::Frequency, vibrato.rate_hz)?;
        let depth = nodes.track(backend.create_gain())?;
        backend.set_param(depth, Param::Gain, note.frequency * vibrato.depth_ratio)?;
        backend.connect(lfo, Target::Node(depth))?;
        backend.connect(depth, Target::Param(osc, Param::Frequency))?;
        backend.start(lfo, start)?;
        backend.stop(lfo, end)?;
    }

    backend.start(osc, start)?;
    backend.stop(osc, end)?;
    Ok(osc)
}

/// Schedule a glide: exponential pitch drop with an exponentially decaying gain
pub fn play_glide<B: AudioBackend + ?Sized>(
    backend: &mut B,
    destination: Target,
    shape: &GlideShape,
    at: f64,
) -> Result<NodeId, VoiceError> {
    require_positive("glide start frequency", shape.start_hz as f64)?;
    require_positive("glide length", shape.length)?;

    let mut nodes = VoiceNodes::default();
    let result = build_glide(backend, destination, shape, at, &mut nodes);
    nodes.settle(backend, result)
}

fn build_glide<B: AudioBackend + ?Sized>(
    backend: &mut B,
    destination: Target,
    shape: &GlideShape,
    start: f64,
    nodes: &mut VoiceNodes,
) -> Result<NodeId, VoiceError> {
    let end = start + shape.length;

    let osc = nodes.track(backend.create_oscillator(shape.waveform))?;
    backend.automate(
        osc,
        Param::Frequency,
        Automation::SetValue {
            value: shape.start_hz,
            at: start,
        },
    )?;
    backend.automate(
        osc,
        Param::Frequency,
        Automation::ExponentialRamp {
            value: shape.end_hz.max(GAIN_FLOOR),
            end,
        },
    )?;

    let amp = nodes.track(backend.create_gain())?;
    backend.automate(
        amp,
        Param::Gain,
        Automation::SetValue {
            value: shape.peak_gain.max(0.0),
            at: start,
        },
    )?;
    backend.automate(
        amp,
        Param::Gain,
        Automation::ExponentialRamp {
            value: shape.floor_gain.max(GAIN_FLOOR),
            end,
        },
    )?;

    backend.connect(osc, Target::Node(amp))?;
    backend.connect(amp, destination)?;
    backend.start(osc, start)?;
    backend.stop(osc, end)?;
    Ok(osc)
}
