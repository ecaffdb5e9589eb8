//! Engine control thread
//!
//! The transport runs on its own thread. The application sends commands over
//! a channel; the pending beat is the receive deadline, so a command that
//! arrives mid-wait is handled at once and `stop` needs no timer handle.
//! Status is mirrored into atomics for lock-free reads.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use bgmkit_core::types::{GameEvent, SfxKind};
use bgmkit_core::AudioParams;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::audio::backend::{AudioBackend, BackendError};
use crate::audio::transport::{PlaybackState, Transport, TransportStatus};

/// Shortest wait between polls while a beat is pending
const MIN_WAIT: f64 = 0.001;

/// Commands that can be sent to the engine thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCommand {
    Start,
    Stop,
    Toggle(bool),
    ToggleMusic,
    SetVolume(f32),
    PlayOneShot(SfxKind),
    Event(GameEvent),
    Shutdown,
}

/// Status published by the engine thread after every command and beat
struct SharedStatus {
    state: AtomicU8,
    beat: AtomicU64,
    music_enabled: AtomicBool,
    sfx_enabled: AtomicBool,
    volume: AtomicU32,
    dropped_voices: AtomicU64,
}

impl SharedStatus {
    fn new(params: &AudioParams) -> Self {
        Self {
            state: AtomicU8::new(encode_state(PlaybackState::Uninitialized)),
            beat: AtomicU64::new(0),
            music_enabled: AtomicBool::new(params.bgm.enabled),
            sfx_enabled: AtomicBool::new(params.sfx.enabled),
            volume: AtomicU32::new(params.bgm.volume.to_bits()),
            dropped_voices: AtomicU64::new(0),
        }
    }

    fn publish(&self, status: &TransportStatus) {
        self.beat.store(status.beat, Ordering::Relaxed);
        self.music_enabled.store(status.music_enabled, Ordering::Relaxed);
        self.sfx_enabled.store(status.sfx_enabled, Ordering::Relaxed);
        self.volume.store(status.volume.to_bits(), Ordering::Relaxed);
        self.dropped_voices.store(status.dropped_voices, Ordering::Relaxed);
        self.state.store(encode_state(status.state), Ordering::Release);
    }

    fn snapshot(&self) -> TransportStatus {
        let state = decode_state(self.state.load(Ordering::Acquire));
        TransportStatus {
            state,
            beat: self.beat.load(Ordering::Relaxed),
            music_enabled: self.music_enabled.load(Ordering::Relaxed),
            sfx_enabled: self.sfx_enabled.load(Ordering::Relaxed),
            volume: f32::from_bits(self.volume.load(Ordering::Relaxed)),
            dropped_voices: self.dropped_voices.load(Ordering::Relaxed),
        }
    }
}

fn encode_state(state: PlaybackState) -> u8 {
    match state {
        PlaybackState::Uninitialized => 0,
        PlaybackState::Ready => 1,
        PlaybackState::Playing => 2,
        PlaybackState::Stopped => 3,
        PlaybackState::Disabled => 4,
    }
}

fn decode_state(value: u8) -> PlaybackState {
    match value {
        1 => PlaybackState::Ready,
        2 => PlaybackState::Playing,
        3 => PlaybackState::Stopped,
        4 => PlaybackState::Disabled,
        _ => PlaybackState::Uninitialized,
    }
}

/// Handle to the engine thread; dropping it shuts the thread down
pub struct EngineHandle {
    command_tx: Sender<EngineCommand>,
    status: Arc<SharedStatus>,
    thread: Option<JoinHandle<()>>,
}

impl EngineHandle {
    /// Spawn the engine thread and initialize the backend on it.
    ///
    /// The backend is built by `factory` on the engine thread, so it does not
    /// need to be `Send`.
    pub fn spawn<B, F>(params: AudioParams, factory: F) -> Self
    where
        B: AudioBackend + 'static,
        F: FnOnce() -> Result<B, BackendError> + Send + 'static,
    {
        let (command_tx, command_rx) = crossbeam_channel::bounded(64);
        let status = Arc::new(SharedStatus::new(&params));
        let thread_status = status.clone();

        let thread = thread::spawn(move || {
            let mut transport = Transport::new(params);
            transport.initialize(factory);
            EngineLoop {
                transport,
                command_rx,
                status: thread_status,
            }
            .run();
        });

        EngineHandle {
            command_tx,
            status,
            thread: Some(thread),
        }
    }

    /// Queue a command for the engine thread
    pub fn send(&self, command: EngineCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|e| anyhow::anyhow!("Failed to send command: {}", e))
    }

    pub fn start(&self) -> Result<()> {
        self.send(EngineCommand::Start)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(EngineCommand::Stop)
    }

    pub fn toggle(&self, enabled: bool) -> Result<()> {
        self.send(EngineCommand::Toggle(enabled))
    }

    pub fn toggle_music(&self) -> Result<()> {
        self.send(EngineCommand::ToggleMusic)
    }

    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.send(EngineCommand::SetVolume(volume))
    }

    pub fn play_one_shot(&self, kind: SfxKind) -> Result<()> {
        self.send(EngineCommand::PlayOneShot(kind))
    }

    pub fn handle_event(&self, event: GameEvent) -> Result<()> {
        self.send(EngineCommand::Event(event))
    }

    /// Last status published by the engine thread
    pub fn status(&self) -> TransportStatus {
        self.status.snapshot()
    }

    pub fn is_ready(&self) -> bool {
        !matches!(
            self.status().state,
            PlaybackState::Uninitialized | PlaybackState::Disabled
        )
    }

    pub fn is_playing(&self) -> bool {
        self.status().state == PlaybackState::Playing
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let _ = self.command_tx.send(EngineCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

struct EngineLoop<B: AudioBackend> {
    transport: Transport<B>,
    command_rx: Receiver<EngineCommand>,
    status: Arc<SharedStatus>,
}

impl<B: AudioBackend> EngineLoop<B> {
    fn run(&mut self) {
        loop {
            self.status.publish(&self.transport.status());

            // A suspended clock only moves again after a command resumes it
            let due = self
                .transport
                .next_wake()
                .filter(|_| self.transport.clock_running());
            let command = match due {
                Some(due) => {
                    let wait = (due - self.transport.now()).max(MIN_WAIT);
                    match self.command_rx.recv_timeout(Duration::from_secs_f64(wait)) {
                        Ok(command) => Some(command),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.command_rx.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                },
            };

            if let Some(command) = command {
                if command == EngineCommand::Shutdown {
                    break;
                }
                self.handle_command(command);
            }
            self.transport.poll();
        }

        self.transport.stop();
        self.status.publish(&self.transport.status());
        log::debug!(target: "bgmkit::transport", "engine thread exiting");
    }

    fn handle_command(&mut self, command: EngineCommand) {
        log::trace!(target: "bgmkit::transport", "command {:?}", command);
        match command {
            EngineCommand::Start => self.transport.start(),
            EngineCommand::Stop => self.transport.stop(),
            EngineCommand::Toggle(enabled) => self.transport.toggle(enabled),
            EngineCommand::ToggleMusic => {
                self.transport.toggle_music();
            }
            EngineCommand::SetVolume(volume) => self.transport.set_volume(volume),
            EngineCommand::PlayOneShot(kind) => self.transport.play_one_shot(kind),
            EngineCommand::Event(event) => self.transport.handle_event(event),
            EngineCommand::Shutdown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::recording::{BackendOp, RecordingBackend};
    use std::time::Instant;

    fn wait_for(engine: &EngineHandle, f: impl Fn(&TransportStatus) -> bool) -> TransportStatus {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let status = engine.status();
            if f(&status) || Instant::now() > deadline {
                return status;
            }
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn test_engine_starts_and_fires_beats() {
        let backend = RecordingBackend::new();
        let handle = backend.clone();
        let engine = EngineHandle::spawn(AudioParams::default(), move || Ok(handle));

        engine.start().unwrap();
        let status = wait_for(&engine, |s| s.state == PlaybackState::Playing);
        assert_eq!(status.state, PlaybackState::Playing);
        assert_eq!(status.beat, 1);

        backend.set_time(0.45);
        // Any command wakes the loop early; the due beat then fires
        engine.set_volume(0.4).unwrap();
        let status = wait_for(&engine, |s| s.beat == 2);
        assert_eq!(status.beat, 2);
        assert_eq!(status.volume, 0.4);
    }

    #[test]
    fn test_stop_cancels_the_pending_beat() {
        let backend = RecordingBackend::new();
        let handle = backend.clone();
        let engine = EngineHandle::spawn(AudioParams::default(), move || Ok(handle));
        engine.start().unwrap();
        engine.stop().unwrap();
        let status = wait_for(&engine, |s| s.state == PlaybackState::Stopped);
        assert_eq!(status.state, PlaybackState::Stopped);

        let created = backend.oscillators_created();
        backend.set_time(5.0);
        engine.play_one_shot(SfxKind::Click).unwrap();
        wait_for(&engine, |_| backend.oscillators_created() > created);
        assert_eq!(backend.oscillators_created(), created + 1);
        assert_eq!(engine.status().beat, 1);
    }

    #[test]
    fn test_suspended_clock_waits_for_a_command() {
        let backend = RecordingBackend::suspended();
        backend.fail_resume(true);
        let handle = backend.clone();
        let engine = EngineHandle::spawn(AudioParams::default(), move || Ok(handle));
        engine.start().unwrap();
        let status = wait_for(&engine, |s| s.state == PlaybackState::Playing);
        assert_eq!(status.beat, 1);

        // The beat is due, but nothing polls while the clock is suspended
        backend.set_time(0.45);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(engine.status().beat, 1);

        // A gesture resumes the clock and the loop catches up
        backend.fail_resume(false);
        engine.play_one_shot(SfxKind::Bounce).unwrap();
        let status = wait_for(&engine, |s| s.beat == 2);
        assert_eq!(status.beat, 2);
    }

    #[test]
    fn test_unavailable_backend_reports_disabled() {
        let engine = EngineHandle::spawn::<RecordingBackend, _>(AudioParams::default(), || {
            Err(BackendError::Unavailable("no device".to_string()))
        });
        engine.start().unwrap();
        let status = wait_for(&engine, |s| s.state == PlaybackState::Disabled);
        assert_eq!(status.state, PlaybackState::Disabled);
        assert!(!engine.is_ready());
    }

    #[test]
    fn test_drop_joins_and_fades_out() {
        let backend = RecordingBackend::new();
        let handle = backend.clone();
        let engine = EngineHandle::spawn(AudioParams::default(), move || Ok(handle));
        engine.start().unwrap();
        wait_for(&engine, |s| s.state == PlaybackState::Playing);
        drop(engine);
        let fade_out = backend
            .operations()
            .into_iter()
            .filter(|op| matches!(op, BackendOp::CancelScheduled { .. }))
            .count();
        assert_eq!(fade_out, 2);
    }
}
