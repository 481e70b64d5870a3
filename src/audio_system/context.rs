/// Output context
///
/// Owns the synthesis graph and its clock, and (when opened on a device)
/// the rodio output stream that pulls rendered blocks from it.
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rodio::{OutputStream, OutputStreamHandle, Source};

use super::graph::{BusId, Graph, NodeId};
use super::music::MusicSession;
use super::voice::Voice;
use crate::error::{AudioError, AudioResult};

/// State shared between the engine and the render callback
#[derive(Debug)]
pub(crate) struct RenderState {
    pub(crate) graph: Graph,
    pub(crate) music: Option<MusicSession>,
}

impl RenderState {
    fn render_block(&mut self, out: &mut [f32]) {
        if let Some(music) = self.music.as_mut() {
            music.top_up(&mut self.graph);
        }
        self.graph.render(out);
    }
}

/// Keeps the device stream alive for as long as the context lives
struct OutputDevice {
    _stream: OutputStream,
    _handle: OutputStreamHandle,
}

/// Live handle to the graph, its clock, and optionally an output device
pub struct AudioContext {
    state: Arc<Mutex<RenderState>>,
    device: Option<OutputDevice>,
}

impl AudioContext {
    /// Open the default output device and start streaming the graph
    pub fn open_default(sample_rate: u32, block_frames: usize) -> AudioResult<Self> {
        let (stream, handle) = OutputStream::try_default().map_err(AudioError::StreamInitFailed)?;

        let mut context = Self::offline(sample_rate);
        let source = GraphSource::new(Arc::clone(&context.state), sample_rate, block_frames);
        handle.play_raw(source).map_err(AudioError::PlaybackFailed)?;

        context.device = Some(OutputDevice {
            _stream: stream,
            _handle: handle,
        });
        tracing::info!(
            "Audio output opened: {} Hz, {} frame blocks",
            sample_rate,
            block_frames
        );
        Ok(context)
    }

    /// A context with no device. Time only advances through [`render`].
    ///
    /// [`render`]: AudioContext::render
    pub fn offline(sample_rate: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(RenderState {
                graph: Graph::new(sample_rate),
                music: None,
            })),
            device: None,
        }
    }

    /// Whether a device is pulling audio from this context
    pub fn is_realtime(&self) -> bool {
        self.device.is_some()
    }

    pub fn sample_rate(&self) -> u32 {
        self.state.lock().graph.sample_rate()
    }

    /// Context clock in seconds
    pub fn current_time(&self) -> f64 {
        self.state.lock().graph.current_time()
    }

    /// Render `frames` mono samples, advancing the clock.
    ///
    /// Meant for offline contexts; on a realtime context this steals time
    /// from the device.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        self.state.lock().render_block(&mut out);
        out
    }

    pub fn master_gain(&self) -> f32 {
        self.state.lock().graph.bus_gain(BusId::MASTER).unwrap_or(0.0)
    }

    pub fn set_master_gain(&self, gain: f32) {
        self.state.lock().graph.set_bus_gain(BusId::MASTER, gain);
    }

    /// Snapshot of a live voice
    pub fn voice(&self, id: NodeId) -> Option<Voice> {
        self.state.lock().graph.voice(id).cloned()
    }

    pub fn voice_ids(&self) -> Vec<NodeId> {
        self.state.lock().graph.voice_ids()
    }

    pub fn has_bus(&self, id: BusId) -> bool {
        self.state.lock().graph.has_bus(id)
    }

    pub fn bus_gain(&self, id: BusId) -> Option<f32> {
        self.state.lock().graph.bus_gain(id)
    }

    /// Run `f` with exclusive access to the graph and music session
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut RenderState) -> R) -> R {
        f(&mut self.state.lock())
    }
}

/// Infinite mono source rendering the graph in blocks
struct GraphSource {
    state: Arc<Mutex<RenderState>>,
    sample_rate: u32,
    buffer: Vec<f32>,
    pos: usize,
}

impl GraphSource {
    fn new(state: Arc<Mutex<RenderState>>, sample_rate: u32, block_frames: usize) -> Self {
        let block_frames = block_frames.max(1);
        Self {
            state,
            sample_rate,
            buffer: vec![0.0; block_frames],
            pos: block_frames,
        }
    }
}

impl Iterator for GraphSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.pos >= self.buffer.len() {
            self.state.lock().render_block(&mut self.buffer);
            self.pos = 0;
        }
        let sample = self.buffer[self.pos];
        self.pos += 1;
        Some(sample)
    }
}

impl Source for GraphSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
