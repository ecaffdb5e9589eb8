#[cfg(test)]
mod tests {
    use bgmkit::audio::backend::{Automation, BackendError, Param, Target};
    use bgmkit::audio::graph::AudioGraph;
    use bgmkit::audio::recording::{BackendOp, RecordingBackend};
    use bgmkit::audio::transport::{PlaybackState, Transport, FADE_SECONDS};
    use bgmkit::{AudioParams, GameEvent, SfxKind};

    fn recording_transport(backend: &RecordingBackend) -> Transport<RecordingBackend> {
        let mut transport = Transport::new(AudioParams::default());
        let handle = backend.clone();
        transport.initialize(move || Ok(handle));
        assert_eq!(transport.state(), PlaybackState::Ready);
        transport
    }

    fn starts(backend: &RecordingBackend) -> Vec<f64> {
        backend
            .operations()
            .into_iter()
            .filter_map(|op| match op {
                BackendOp::Start { at, .. } => Some(at),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_beats_stay_anchored_under_jitter() {
        let backend = RecordingBackend::new();
        backend.set_time(1.25);
        let mut transport = recording_transport(&backend);
        transport.start();
        let origin = transport.origin();
        assert_eq!(origin, 1.25);

        let mut last_fire = origin;
        for beat in 1..=150u64 {
            let due = transport.next_wake().unwrap();
            assert_eq!(due, origin + beat as f64 * 0.45, "beat {}", beat);

            // Too early: nothing fires
            backend.set_time(due - 0.05);
            assert!(transport.poll().is_none());

            // Wake up late by a varying amount
            let late = (beat * 7 % 13) as f64 * 0.002;
            backend.set_time(due + late);
            let report = transport.poll().unwrap();
            assert_eq!(report.beat, beat);
            assert_eq!(report.fired_at, due + late);
            assert!(report.fired_at > last_fire);
            last_fire = report.fired_at;
        }
        assert_eq!(transport.beat(), 151);
        assert_eq!(transport.next_wake(), Some(origin + 151.0 * 0.45));
    }

    #[test]
    fn test_voices_of_one_beat_share_a_start_time() {
        let backend = RecordingBackend::new();
        let mut transport = recording_transport(&backend);
        transport.start();
        backend.clear();
        backend.set_time(0.46);
        transport.poll().unwrap();
        let times = starts(&backend);
        assert!(!times.is_empty());
        assert!(times.iter().all(|&t| t == 0.46));
    }

    #[test]
    fn test_start_twice_keeps_one_chain() {
        let backend = RecordingBackend::new();
        let mut transport = recording_transport(&backend);
        transport.start();
        let wake = transport.pending_wake();
        let ops = backend.operations().len();

        backend.set_time(0.1);
        transport.start();
        assert_eq!(transport.pending_wake(), wake);
        assert_eq!(backend.operations().len(), ops);
        assert_eq!(transport.beat(), 1);
    }

    #[test]
    fn test_stop_then_start_resets_beat_and_origin() {
        let backend = RecordingBackend::new();
        let mut transport = recording_transport(&backend);
        transport.start();
        for _ in 0..4 {
            let due = transport.next_wake().unwrap();
            backend.set_time(due);
            transport.poll().unwrap();
        }
        assert_eq!(transport.beat(), 5);

        transport.stop();
        assert_eq!(transport.state(), PlaybackState::Stopped);
        assert_eq!(transport.next_wake(), None);

        backend.set_time(10.0);
        transport.start();
        assert_eq!(transport.origin(), 10.0);
        assert_eq!(transport.beat(), 1);
        assert_eq!(transport.next_wake(), Some(10.45));
    }

    #[test]
    fn test_set_volume_is_immediate() {
        let backend = RecordingBackend::new();
        let mut transport = recording_transport(&backend);
        transport.start();
        let bus = transport.bus().unwrap();
        backend.clear();

        transport.set_volume(0.3);
        assert_eq!(
            backend.operations(),
            vec![BackendOp::SetParam {
                node: bus,
                param: Param::Gain,
                value: 0.3
            }]
        );
        assert_eq!(transport.status().volume, 0.3);

        // Later fades head for the new volume
        transport.stop();
        backend.set_time(5.0);
        transport.start();
        assert!(backend
            .find(|op| *op
                == BackendOp::Automate {
                    node: bus,
                    param: Param::Gain,
                    automation: Automation::LinearRamp {
                        value: 0.3,
                        end: 5.0 + FADE_SECONDS
                    }
                })
            .is_some());
    }

    #[test]
    fn test_set_volume_clamps() {
        let backend = RecordingBackend::new();
        let mut transport = recording_transport(&backend);
        transport.set_volume(4.0);
        assert_eq!(transport.status().volume, 1.0);
        transport.set_volume(-1.0);
        assert_eq!(transport.status().volume, 0.0);
    }

    #[test]
    fn test_stop_fades_bus_and_lets_voices_ring_out() {
        let mut transport: Transport<AudioGraph> = Transport::new(AudioParams::default());
        transport.initialize(|| Ok(AudioGraph::running(8_000.0)));
        let bus = transport.bus().unwrap();
        transport.start();

        let graph = transport.backend_mut().unwrap();
        assert!(graph.render_for(0.2) > 0.0);
        assert_eq!(graph.param_value(bus, Param::Gain), Some(0.5));

        transport.stop();
        assert_eq!(transport.next_wake(), None);
        assert!(transport.poll().is_none());

        let graph = transport.backend_mut().unwrap();
        graph.render_for(FADE_SECONDS + 0.05);
        assert_eq!(graph.param_value(bus, Param::Gain), Some(0.0));

        // The cello from beat 0 lasts 8.5 beats
        graph.render_for(2.6);
        assert!(graph.active_nodes() > 1);
        graph.render_for(1.0);
        assert_eq!(graph.active_nodes(), 1);
        assert!(graph.contains(bus));
    }

    #[test]
    fn test_bounce_while_suspended_resumes_first() {
        let backend = RecordingBackend::suspended();
        let mut transport = recording_transport(&backend);
        transport.play_one_shot(SfxKind::Bounce);

        let resume = backend.position(|op| *op == BackendOp::Resume).unwrap();
        let osc = backend
            .position(|op| matches!(op, BackendOp::CreateOscillator { .. }))
            .unwrap();
        assert!(resume < osc);
        assert!(backend
            .find(|op| matches!(op, BackendOp::Connect { to: Target::Output, .. }))
            .is_some());
    }

    #[test]
    fn test_resume_failure_is_retried_on_next_gesture() {
        let backend = RecordingBackend::suspended();
        backend.fail_resume(true);
        let mut transport = recording_transport(&backend);

        transport.handle_event(GameEvent::BallBounced);
        assert_eq!(backend.oscillators_created(), 0);

        backend.fail_resume(false);
        transport.handle_event(GameEvent::ButtonClicked);
        assert_eq!(backend.oscillators_created(), 1);
        assert_eq!(backend.count(|op| *op == BackendOp::Resume), 2);
    }

    #[test]
    fn test_music_starts_even_if_resume_fails() {
        let backend = RecordingBackend::suspended();
        backend.fail_resume(true);
        let mut transport = recording_transport(&backend);
        transport.start();
        assert_eq!(transport.state(), PlaybackState::Playing);
        assert!(transport.next_wake().is_some());
        assert!(!transport.clock_running());
    }

    #[test]
    fn test_voice_failure_does_not_halt_the_loop() {
        let backend = RecordingBackend::new();
        backend.fail_oscillators(3);
        let mut transport = recording_transport(&backend);
        transport.start();
        assert_eq!(transport.status().dropped_voices, 3);

        backend.set_time(0.45);
        let report = transport.poll().unwrap();
        assert_eq!(report.dropped, 0);
        assert!(report.voices > 0);
        assert_eq!(transport.beat(), 2);
    }

    #[test]
    fn test_disabled_engine_ignores_everything() {
        let mut transport: Transport<RecordingBackend> = Transport::new(AudioParams::default());
        transport.initialize(|| Err(BackendError::Unavailable("no output device".to_string())));
        assert_eq!(transport.state(), PlaybackState::Disabled);

        transport.initialize(|| Ok(RecordingBackend::new()));
        transport.start();
        transport.toggle(true);
        transport.toggle_music();
        transport.set_volume(0.9);
        transport.play_one_shot(SfxKind::Click);
        transport.handle_event(GameEvent::GameStarted);
        transport.stop();

        assert!(transport.poll().is_none());
        assert!(transport.backend().is_none());
        let status = transport.status();
        assert_eq!(status.state, PlaybackState::Disabled);
        assert_eq!(status.beat, 0);
        assert!(status.music_enabled);
        assert_eq!(status.volume, 0.5);
    }

    #[test]
    fn test_game_lifecycle_events() {
        let backend = RecordingBackend::new();
        let mut transport = recording_transport(&backend);
        transport.handle_event(GameEvent::GameStarted);
        assert_eq!(transport.state(), PlaybackState::Playing);
        transport.handle_event(GameEvent::GameExited);
        assert_eq!(transport.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_sfx_bypass_the_music_bus() {
        let backend = RecordingBackend::new();
        let mut transport = recording_transport(&backend);
        let bus = transport.bus().unwrap();
        transport.set_volume(0.0);
        backend.clear();
        transport.play_one_shot(SfxKind::Click);
        assert_eq!(
            backend.count(|op| matches!(op, BackendOp::Connect { to: Target::Node(n), .. } if *n == bus)),
            0
        );
        assert_eq!(
            backend.count(|op| matches!(op, BackendOp::Connect { to: Target::Output, .. })),
            1
        );
    }
}
