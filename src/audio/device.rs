//! Output device backend
//!
//! Drives an [`AudioGraph`] from the default `cpal` output stream. The graph
//! is shared with the stream callback behind a mutex; the callback renders
//! mono and copies it to every channel. The stream is not `Send`, so the
//! backend must be built on the thread that uses it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{anyhow, Context, Result};
use bgmkit_core::types::Waveform;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};

use crate::audio::backend::{
    AudioBackend, Automation, BackendError, BackendResult, ContextState, FilterKind, NodeId, Param,
    Target,
};
use crate::audio::graph::AudioGraph;

/// Frames rendered per graph call inside the stream callback
const RENDER_FRAMES: usize = 512;

pub struct CpalBackend {
    graph: Arc<Mutex<AudioGraph>>,
    stream: Stream,
}

impl CpalBackend {
    /// Open the default output device. The context starts suspended.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;
        let config = device
            .default_output_config()
            .context("no default output config")?;

        let sample_format = config.sample_format();
        let config: StreamConfig = config.into();
        let graph = Arc::new(Mutex::new(AudioGraph::new(config.sample_rate.0 as f32)));

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, graph.clone())?,
            SampleFormat::I16 => Self::build_stream::<i16>(&device, &config, graph.clone())?,
            SampleFormat::U16 => Self::build_stream::<u16>(&device, &config, graph.clone())?,
            _ => return Err(anyhow!("Unsupported sample format: {:?}", sample_format)),
        };

        log::info!(
            target: "bgmkit::device",
            "opened {} at {} Hz, {} channels, {:?}",
            device.name().unwrap_or_else(|_| "output device".to_string()),
            config.sample_rate.0,
            config.channels,
            sample_format
        );
        Ok(CpalBackend { graph, stream })
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        graph: Arc<Mutex<AudioGraph>>,
    ) -> Result<Stream>
    where
        T: Sample + SizedSample + FromSample<f32> + Send + 'static,
    {
        let channels = config.channels.max(1) as usize;
        let mut mono = [0.0f32; RENDER_FRAMES];

        let err_fn = |err| log::error!(target: "bgmkit::device", "output stream error: {}", err);

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let mut graph = graph.lock().unwrap_or_else(PoisonError::into_inner);
                    for block in data.chunks_mut(RENDER_FRAMES * channels) {
                        let frames = &mut mono[..block.len() / channels];
                        graph.render(frames);
                        for (frame, value) in block.chunks_mut(channels).zip(frames.iter()) {
                            let sample: T = Sample::from_sample(*value);
                            frame.fill(sample);
                        }
                    }
                },
                err_fn,
                None,
            )
            .context("Failed to build output stream")?;

        Ok(stream)
    }

    fn graph(&self) -> BackendResult<MutexGuard<'_, AudioGraph>> {
        self.graph.lock().map_err(|_| BackendError::Poisoned)
    }

    /// Lock for reads and batches, which must not fail
    fn peek(&self) -> MutexGuard<'_, AudioGraph> {
        self.graph.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AudioBackend for CpalBackend {
    fn current_time(&self) -> f64 {
        self.peek().current_time()
    }

    fn state(&self) -> ContextState {
        self.peek().state()
    }

    fn resume(&mut self) -> BackendResult {
        self.graph()?.resume()?;
        self.stream
            .play()
            .map_err(|e| BackendError::Device(e.to_string()))?;
        log::debug!(target: "bgmkit::device", "stream resumed");
        Ok(())
    }

    fn create_oscillator(&mut self, waveform: Waveform) -> BackendResult<NodeId> {
        self.graph()?.create_oscillator(waveform)
    }

    fn create_gain(&mut self) -> BackendResult<NodeId> {
        self.graph()?.create_gain()
    }

    fn create_bus(&mut self) -> BackendResult<NodeId> {
        self.graph()?.create_bus()
    }

    fn create_filter(&mut self, kind: FilterKind) -> BackendResult<NodeId> {
        self.graph()?.create_filter(kind)
    }

    fn create_noise_burst(&mut self, duration: f64) -> BackendResult<NodeId> {
        self.graph()?.create_noise_burst(duration)
    }

    fn set_param(&mut self, node: NodeId, param: Param, value: f32) -> BackendResult {
        self.graph()?.set_param(node, param, value)
    }

    fn automate(&mut self, node: NodeId, param: Param, automation: Automation) -> BackendResult {
        self.graph()?.automate(node, param, automation)
    }

    fn cancel_scheduled(&mut self, node: NodeId, param: Param, from: f64) -> BackendResult {
        self.graph()?.cancel_scheduled(node, param, from)
    }

    fn connect(&mut self, from: NodeId, to: Target) -> BackendResult {
        self.graph()?.connect(from, to)
    }

    fn start(&mut self, node: NodeId, at: f64) -> BackendResult {
        self.graph()?.start(node, at)
    }

    fn stop(&mut self, node: NodeId, at: f64) -> BackendResult {
        self.graph()?.stop(node, at)
    }

    fn release(&mut self, node: NodeId) -> BackendResult {
        self.graph()?.release(node)
    }

    /// Holds the graph lock for the whole batch, so the stream callback
    /// cannot render a block halfway through it
    fn submit(&mut self, batch: &mut dyn FnMut(&mut dyn AudioBackend))
    where
        Self: Sized,
    {
        let mut graph = self.peek();
        batch(&mut *graph);
    }
}
