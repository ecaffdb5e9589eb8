//! Drum synthesizer module
//!
//! Schedules the two percussion voices of the arrangement: the kick, a sine
//! glide dropping to near-silence, and the hi-hat, a burst of white noise
//! through a high-pass filter. Both use a two-stage (set, exponential decay)
//! gain envelope and are fire-and-forget.

use bgmkit_core::types::{DrumSound, DrumVoice, NoiseBurstShape, GAIN_FLOOR};

use crate::audio::backend::{AudioBackend, Automation, FilterKind, NodeId, Param, Target};
use crate::audio::voice::{play_glide, VoiceNodes};
use crate::error::VoiceError;

/// Schedule `sound` at `at` into `destination`
pub fn play_drum<B: AudioBackend + ?Sized>(
    backend: &mut B,
    destination: Target,
    sound: DrumSound,
    at: f64,
) -> Result<NodeId, VoiceError> {
    match sound.voice() {
        DrumVoice::Glide(shape) => play_glide(backend, destination, &shape, at),
        DrumVoice::Noise(shape) => play_noise_burst(backend, destination, &shape, at),
    }
}

pub fn play_kick<B: AudioBackend + ?Sized>(
    backend: &mut B,
    destination: Target,
    at: f64,
) -> Result<NodeId, VoiceError> {
    play_drum(backend, destination, DrumSound::Kick, at)
}

pub fn play_hihat<B: AudioBackend + ?Sized>(
    backend: &mut B,
    destination: Target,
    at: f64,
) -> Result<NodeId, VoiceError> {
    play_drum(backend, destination, DrumSound::HiHat, at)
}

fn play_noise_burst<B: AudioBackend + ?Sized>(
    backend: &mut B,
    destination: Target,
    shape: &NoiseBurstShape,
    at: f64,
) -> Result<NodeId, VoiceError> {
    let mut nodes = VoiceNodes::default();
    let result = build_noise_burst(backend, destination, shape, at, &mut nodes);
    nodes.settle(backend, result)
}

fn build_noise_burst<B: AudioBackend + ?Sized>(
    backend: &mut B,
    destination: Target,
    shape: &NoiseBurstShape,
    start: f64,
    nodes: &mut VoiceNodes,
) -> Result<NodeId, VoiceError> {
    let end = start + shape.length;

    let noise = nodes.track(backend.create_noise_burst(shape.length))?;
    let highpass = nodes.track(backend.create_filter(FilterKind::HighPass))?;
    backend.set_param(highpass, Param::Cutoff, shape.highpass_hz)?;

    let amp = nodes.track(backend.create_gain())?;
    backend.automate(
        amp,
        Param::Gain,
        Automation::SetValue {
            value: shape.peak_gain,
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

    backend.connect(noise, Target::Node(highpass))?;
    backend.connect(highpass, Target::Node(amp))?;
    backend.connect(amp, destination)?;
    backend.start(noise, start)?;
    Ok(noise)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::graph::AudioGraph;
    use crate::audio::recording::{BackendOp, RecordingBackend};
    use bgmkit_core::types::Waveform;

    #[test]
    fn test_kick_is_sine_glide() {
        let mut backend = RecordingBackend::new();
        let osc = play_kick(&mut backend, Target::Output, 0.0).unwrap();
        assert_eq!(
            backend.operations()[0],
            BackendOp::CreateOscillator {
                node: osc,
                waveform: Waveform::Sine
            }
        );
        let ramps = backend.param_ops(osc, Param::Frequency);
        assert_eq!(
            ramps.last(),
            Some(&BackendOp::Automate {
                node: osc,
                param: Param::Frequency,
                automation: Automation::ExponentialRamp {
                    value: 0.01,
                    end: 0.2
                }
            })
        );
    }

    #[test]
    fn test_hihat_is_highpassed_noise() {
        let mut backend = RecordingBackend::new();
        let noise = play_hihat(&mut backend, Target::Output, 1.0).unwrap();
        assert_eq!(
            backend.operations()[0],
            BackendOp::CreateNoiseBurst {
                node: noise,
                duration: 0.05
            }
        );
        assert!(backend
            .find(|op| matches!(
                op,
                BackendOp::SetParam {
                    param: Param::Cutoff,
                    value,
                    ..
                } if *value == 8000.0
            ))
            .is_some());
        assert!(backend
            .find(|op| *op == BackendOp::Start { node: noise, at: 1.0 })
            .is_some());
    }

    #[test]
    fn test_drums_render_and_vanish() {
        let mut graph = AudioGraph::running(16_000.0);
        play_kick(&mut graph, Target::Output, 0.0).unwrap();
        play_hihat(&mut graph, Target::Output, 0.0).unwrap();
        assert!(graph.render_for(0.1) > 0.0);
        graph.render_for(0.2);
        assert_eq!(graph.active_nodes(), 0);
    }

    #[test]
    fn test_unroutable_hihat_leaves_nothing_behind() {
        let mut graph = AudioGraph::running(16_000.0);
        assert!(play_hihat(&mut graph, Target::Node(NodeId(404)), 0.0).is_err());
        assert_eq!(graph.active_nodes(), 0);
    }
}
