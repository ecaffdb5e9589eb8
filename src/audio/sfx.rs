//! One-shot sound effects
//!
//! Plays a cue as a single glide routed straight to the main output, so the
//! music bus volume and fades never touch it.

use bgmkit_core::types::SfxKind;
use bgmkit_core::SfxParams;

use crate::audio::backend::{AudioBackend, ContextState, NodeId, Target};
use crate::audio::voice::play_glide;
use crate::error::AudioError;

/// Play `kind` now, resuming a suspended context first.
///
/// Returns `Ok(None)` when sound effects are disabled.
pub fn play_one_shot<B: AudioBackend + ?Sized>(
    backend: &mut B,
    params: &SfxParams,
    kind: SfxKind,
) -> Result<Option<NodeId>, AudioError> {
    if !params.enabled {
        return Ok(None);
    }
    if backend.state() == ContextState::Suspended {
        backend.resume().map_err(AudioError::ResumeFailed)?;
    }
    let shape = params.glide_for(kind);
    let now = backend.current_time();
    let osc = play_glide(backend, Target::Output, &shape, now)?;
    log::debug!(target: "bgmkit::sfx", "{} at {:.3}s", kind, now);
    Ok(Some(osc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::{Automation, Param};
    use crate::audio::recording::{BackendOp, RecordingBackend};

    #[test]
    fn test_resumes_before_creating_oscillator() {
        let mut backend = RecordingBackend::suspended();
        play_one_shot(&mut backend, &SfxParams::default(), SfxKind::Bounce).unwrap();
        let resume = backend.position(|op| *op == BackendOp::Resume).unwrap();
        let osc = backend
            .position(|op| matches!(op, BackendOp::CreateOscillator { .. }))
            .unwrap();
        assert!(resume < osc);
    }

    #[test]
    fn test_resume_failure_plays_nothing() {
        let mut backend = RecordingBackend::suspended();
        backend.fail_resume(true);
        let result = play_one_shot(&mut backend, &SfxParams::default(), SfxKind::Click);
        assert!(matches!(result, Err(AudioError::ResumeFailed(_))));
        assert_eq!(backend.oscillators_created(), 0);
    }

    #[test]
    fn test_disabled_is_silent() {
        let mut backend = RecordingBackend::new();
        let params = SfxParams {
            enabled: false,
            ..SfxParams::default()
        };
        assert_eq!(
            play_one_shot(&mut backend, &params, SfxKind::Bounce).unwrap(),
            None
        );
        assert!(backend.operations().is_empty());
    }

    #[test]
    fn test_routes_to_output_scaled_by_volume() {
        let mut backend = RecordingBackend::new();
        let params = SfxParams {
            volume: 0.5,
            ..SfxParams::default()
        };
        play_one_shot(&mut backend, &params, SfxKind::Click).unwrap();
        assert!(backend
            .find(|op| matches!(op, BackendOp::Connect { to: Target::Output, .. }))
            .is_some());
        assert!(backend
            .find(|op| matches!(
                op,
                BackendOp::Automate {
                    param: Param::Gain,
                    automation: Automation::SetValue { value, .. },
                    ..
                } if *value == 0.075
            ))
            .is_some());
    }
}
