use std::path::PathBuf;

use crate::compose::frame::FrameRGBA;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::StoryreelResult;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Optional raw PCM audio file muxed alongside the frames.
    pub audio: Option<AudioInputConfig>,
}

/// Raw PCM audio input for sinks that encode audio.
#[derive(Debug, Clone)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Sink contract for consuming composited frames in timeline order.
///
/// `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StoryreelResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StoryreelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> StoryreelResult<()>;
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// `true` once `end` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StoryreelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StoryreelResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> StoryreelResult<()> {
        self.finished = true;
        Ok(())
    }
}
