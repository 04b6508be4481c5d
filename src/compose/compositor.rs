use crate::caption::animator::CaptionOverlay;
use crate::caption::render::CaptionSprite;
use crate::compose::frame::FrameRGBA;
use crate::compose::reader::SegmentDecoder;
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::StoryreelResult;
use crate::timeline::model::Timeline;

/// Counters from one composition run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ComposeStats {
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Segments opened.
    pub segments: usize,
    /// Caption draws across all frames.
    pub caption_draws: u64,
}

/// Layers segment frames and caption sprites and feeds them to a sink.
pub struct Compositor<'a> {
    canvas: Canvas,
    fps: Fps,
    decoder: &'a dyn SegmentDecoder,
}

impl<'a> Compositor<'a> {
    /// Compositor writing `canvas`-sized frames at `fps`.
    pub fn new(canvas: Canvas, fps: Fps, decoder: &'a dyn SegmentDecoder) -> Self {
        Self {
            canvas,
            fps,
            decoder,
        }
    }

    /// Output frame size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Render every output frame of `timeline` into `sink`.
    ///
    /// Frame `i` samples time `i / fps`. Captions whose window contains that time are drawn in
    /// index order over the base frame. Each segment's reader lives only while its frames are
    /// produced.
    #[tracing::instrument(skip_all, fields(segments = timeline.segments().len(), captions = captions.len()))]
    pub fn compose(
        &self,
        timeline: &Timeline,
        captions: &[(CaptionOverlay, CaptionSprite)],
        audio: Option<AudioInputConfig>,
        sink: &mut dyn FrameSink,
    ) -> StoryreelResult<ComposeStats> {
        timeline.check_duration(self.fps)?;

        sink.begin(SinkConfig {
            width: self.canvas.width,
            height: self.canvas.height,
            fps: self.fps,
            audio,
        })?;

        let mut stats = ComposeStats::default();
        let total = timeline.total_frames(self.fps);
        for span in timeline.frame_spans(self.fps) {
            if span.frames.is_empty() {
                continue;
            }
            let segment = &timeline.segments()[span.segment];
            let mut reader = self.decoder.open(segment, self.canvas, self.fps)?;
            stats.segments += 1;
            tracing::debug!(
                position = segment.position,
                freeze = segment.is_freeze(),
                frames = span.frames.end - span.frames.start,
                "compositing segment"
            );

            for f in span.frames {
                let mut frame = FrameRGBA::from_rgba8(self.canvas, reader.next_frame()?.to_vec())?;
                let t = self.fps.frame_to_secs(FrameIndex(f));
                for (overlay, sprite) in captions.iter().filter(|(o, _)| o.is_active(t)) {
                    sprite.draw_onto(&mut frame, overlay.position_at(t));
                    stats.caption_draws += 1;
                }
                sink.push_frame(FrameIndex(f), &frame)?;
                stats.frames += 1;
                if stats.frames % 240 == 0 {
                    tracing::debug!(done = stats.frames, total, "compose progress");
                }
            }
        }

        sink.end()?;
        tracing::info!(frames = stats.frames, segments = stats.segments, "composition finished");
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
