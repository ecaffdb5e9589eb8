//! Transport controller
//!
//! Owns the backend context, the main music bus and the playback state.
//! The transport is driven from a single control thread: callers feed it
//! commands and call [`Transport::poll`] whenever [`Transport::next_wake`]
//! comes due. Nothing here ever returns an error to the caller; backend
//! trouble is logged and the engine degrades to silence.

use std::fmt;

use bgmkit_core::types::{Arrangement, GameEvent, SfxKind, Song};
use bgmkit_core::AudioParams;

use crate::audio::backend::{AudioBackend, Automation, BackendError, ContextState, NodeId, Param, Target};
use crate::audio::scheduler::{BeatReport, Sequencer};
use crate::audio::sfx;
use crate::error::AudioError;

/// Bus fade length for start and stop, in seconds
pub const FADE_SECONDS: f64 = 0.1;

/// A wake this close to its due time fires
pub const WAKE_TOLERANCE: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Uninitialized,
    Ready,
    Playing,
    Stopped,
    /// No backend; every call is a no-op
    Disabled,
}

impl PlaybackState {
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackState::Uninitialized => "uninitialized",
            PlaybackState::Ready => "ready",
            PlaybackState::Playing => "playing",
            PlaybackState::Stopped => "stopped",
            PlaybackState::Disabled => "disabled",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The next scheduled beat of one playback chain.
///
/// `generation` changes on every `start`, so a wake left over from an
/// earlier chain never fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingWake {
    pub generation: u64,
    pub due: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportStatus {
    pub state: PlaybackState,
    pub beat: u64,
    pub music_enabled: bool,
    pub sfx_enabled: bool,
    pub volume: f32,
    pub dropped_voices: u64,
}

pub struct Transport<B: AudioBackend> {
    params: AudioParams,
    sequencer: Sequencer,
    backend: Option<B>,
    bus: Option<NodeId>,
    state: PlaybackState,
    music_enabled: bool,
    generation: u64,
    pending: Option<PendingWake>,
    dropped_voices: u64,
}

impl<B: AudioBackend> Transport<B> {
    /// An uninitialized transport.
    ///
    /// Unplayable music tables fall back to the reference song.
    pub fn new(mut params: AudioParams) -> Self {
        let song = params.song().unwrap_or_else(|e| {
            log::warn!(target: "bgmkit::transport", "{}; using the reference song", e);
            Song::reference()
        });
        let beat_duration = params.bgm.beat_duration;
        if !(beat_duration.is_finite() && beat_duration > 0.0) {
            log::warn!(target: "bgmkit::transport", "beat duration {} is not playable", beat_duration);
            params.bgm.beat_duration = bgmkit_core::BgmParams::default().beat_duration;
        }
        params.bgm.volume = params.bgm.volume.clamp(0.0, 1.0);

        Self {
            sequencer: Sequencer::new(song, Arrangement::reference(), params.bgm.beat_duration),
            music_enabled: params.bgm.enabled,
            params,
            backend: None,
            bus: None,
            state: PlaybackState::Uninitialized,
            generation: 0,
            pending: None,
            dropped_voices: 0,
        }
    }

    /// Acquire the backend and build the main bus.
    ///
    /// Runs once; later calls are ignored. A failure leaves the transport
    /// disabled.
    pub fn initialize<F>(&mut self, factory: F)
    where
        F: FnOnce() -> Result<B, BackendError>,
    {
        if self.state != PlaybackState::Uninitialized {
            return;
        }
        let mut backend = match factory() {
            Ok(backend) => backend,
            Err(e) => {
                self.disable(e);
                return;
            }
        };
        match Self::build_bus(&mut backend) {
            Ok(bus) => {
                self.bus = Some(bus);
                self.backend = Some(backend);
                self.state = PlaybackState::Ready;
                log::info!(target: "bgmkit::transport", "audio ready, main bus {:?}", bus);
            }
            Err(e) => self.disable(e),
        }
    }

    fn build_bus(backend: &mut B) -> Result<NodeId, BackendError> {
        let bus = backend.create_bus()?;
        backend.set_param(bus, Param::Gain, 0.0)?;
        backend.connect(bus, Target::Output)?;
        Ok(bus)
    }

    fn disable(&mut self, e: BackendError) {
        log::error!(target: "bgmkit::transport", "{}; audio disabled", AudioError::BackendUnavailable(e));
        self.state = PlaybackState::Disabled;
    }

    /// Begin a new playback chain at beat 0 and fire its first beat
    pub fn start(&mut self) {
        if !matches!(self.state, PlaybackState::Ready | PlaybackState::Stopped) {
            return;
        }
        let volume = self.params.bgm.volume;
        let (Some(backend), Some(bus)) = (self.backend.as_mut(), self.bus) else {
            return;
        };

        if backend.state() == ContextState::Suspended {
            if let Err(e) = backend.resume() {
                log::warn!(target: "bgmkit::transport", "{}", AudioError::ResumeFailed(e));
            }
        }

        let now = backend.current_time();
        self.generation += 1;
        self.sequencer.reset(now);
        if let Err(e) = fade_bus(backend, bus, now, volume) {
            log::warn!(target: "bgmkit::transport", "bus fade-in failed: {}", e);
        }
        self.state = PlaybackState::Playing;
        log::info!(target: "bgmkit::transport", "music started at {:.3}s", now);
        self.run_wake();
    }

    /// Cancel the pending wake and fade the bus out.
    ///
    /// Voices already submitted ring out behind the fade.
    pub fn stop(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.pending = None;
        self.state = PlaybackState::Stopped;
        let (Some(backend), Some(bus)) = (self.backend.as_mut(), self.bus) else {
            return;
        };
        let now = backend.current_time();
        if let Err(e) = fade_bus(backend, bus, now, 0.0) {
            log::warn!(target: "bgmkit::transport", "bus fade-out failed: {}", e);
        }
        log::info!(target: "bgmkit::transport", "music stopped at {:.3}s, beat {}", now, self.sequencer.beat());
    }

    pub fn toggle(&mut self, enabled: bool) {
        if enabled {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Flip the music preference and start or stop accordingly
    pub fn toggle_music(&mut self) -> bool {
        if self.state == PlaybackState::Disabled {
            return self.music_enabled;
        }
        self.music_enabled = !self.music_enabled;
        self.params.bgm.enabled = self.music_enabled;
        self.toggle(self.music_enabled);
        self.music_enabled
    }

    /// Set the music volume now, without a ramp
    pub fn set_volume(&mut self, volume: f32) {
        if self.state == PlaybackState::Disabled {
            return;
        }
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.params.bgm.volume = volume;
        if let (Some(backend), Some(bus)) = (self.backend.as_mut(), self.bus) {
            if let Err(e) = backend.set_param(bus, Param::Gain, volume) {
                log::warn!(target: "bgmkit::transport", "volume change failed: {}", e);
            }
        }
    }

    pub fn play_one_shot(&mut self, kind: SfxKind) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if let Err(e) = sfx::play_one_shot(backend, &self.params.sfx, kind) {
            log::warn!(target: "bgmkit::sfx", "{} dropped: {}", kind, e);
        }
    }

    pub fn handle_event(&mut self, event: GameEvent) {
        log::debug!(target: "bgmkit::transport", "event {:?}", event);
        match event {
            GameEvent::BallBounced => self.play_one_shot(SfxKind::Bounce),
            GameEvent::ButtonClicked => self.play_one_shot(SfxKind::Click),
            GameEvent::GameStarted => {
                if self.music_enabled {
                    self.start();
                }
            }
            GameEvent::GameExited => self.stop(),
        }
    }

    /// Fire the pending wake if it is due
    pub fn poll(&mut self) -> Option<BeatReport> {
        let wake = self.pending?;
        if self.now() + WAKE_TOLERANCE < wake.due {
            return None;
        }
        self.wake(wake)
    }

    /// Fire `wake` unless it belongs to a finished chain
    pub fn wake(&mut self, wake: PendingWake) -> Option<BeatReport> {
        if self.state != PlaybackState::Playing || wake.generation != self.generation {
            log::trace!(target: "bgmkit::sequencer", "ignoring stale wake for chain {}", wake.generation);
            return None;
        }
        self.pending = None;
        self.run_wake()
    }

    fn run_wake(&mut self) -> Option<BeatReport> {
        let backend = self.backend.as_mut()?;
        let bus = self.bus?;
        let now = backend.current_time();
        let report = self.sequencer.fire(backend, bus, now);
        self.dropped_voices += report.dropped as u64;
        self.pending = Some(PendingWake {
            generation: self.generation,
            due: report.next_fire,
        });
        Some(report)
    }

    /// Audio-clock time the next beat is due
    pub fn next_wake(&self) -> Option<f64> {
        self.pending.map(|wake| wake.due)
    }

    pub fn pending_wake(&self) -> Option<PendingWake> {
        self.pending
    }

    /// Current audio-clock time, `0.0` without a backend
    pub fn now(&self) -> f64 {
        self.backend.as_ref().map_or(0.0, |b| b.current_time())
    }

    /// Whether the audio clock is advancing
    pub fn clock_running(&self) -> bool {
        self.backend
            .as_ref()
            .is_some_and(|b| b.state() == ContextState::Running)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn beat(&self) -> u64 {
        self.sequencer.beat()
    }

    pub fn origin(&self) -> f64 {
        self.sequencer.origin()
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    pub fn status(&self) -> TransportStatus {
        TransportStatus {
            state: self.state,
            beat: self.sequencer.beat(),
            music_enabled: self.music_enabled,
            sfx_enabled: self.params.sfx.enabled,
            volume: self.params.bgm.volume,
            dropped_voices: self.dropped_voices,
        }
    }

    pub fn params(&self) -> &AudioParams {
        &self.params
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.backend.as_mut()
    }

    pub fn bus(&self) -> Option<NodeId> {
        self.bus
    }
}

/// Ramp the bus from wherever it is now to `target` over the fade window
fn fade_bus<B: AudioBackend + ?Sized>(backend: &mut B, bus: NodeId, now: f64, target: f32) -> Result<(), BackendError> {
    backend.cancel_scheduled(bus, Param::Gain, now)?;
    backend.automate(
        bus,
        Param::Gain,
        Automation::LinearRamp {
            value: target,
            end: now + FADE_SECONDS,
        },
    )
}
