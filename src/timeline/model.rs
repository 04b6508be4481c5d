use std::ops::Range;

use crate::assets::catalog::MediaClip;
use crate::foundation::core::Fps;
use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Where a segment's pixels come from.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentSource {
    /// Play `clip` from the segment's in-point to its out-point.
    Clip {
        /// Source clip.
        clip: MediaClip,
    },
    /// Hold one still of `clip`, sampled at `at_secs`, for the segment duration.
    Freeze {
        /// Clip the still is sampled from.
        clip: MediaClip,
        /// Source time of the held frame.
        at_secs: f64,
    },
}

/// A trimmed, positioned excerpt placed into the output timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Segment {
    /// Pixel source.
    pub source: SegmentSource,
    /// In-point in source seconds (0 for freeze frames).
    pub in_secs: f64,
    /// Out-point in source seconds (hold duration for freeze frames).
    pub out_secs: f64,
    /// 0-based position in output order.
    pub position: usize,
}

impl Segment {
    /// Output duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.out_secs - self.in_secs
    }

    /// `true` for synthesized hold segments.
    pub fn is_freeze(&self) -> bool {
        matches!(self.source, SegmentSource::Freeze { .. })
    }

    /// Clip referenced by this segment.
    pub fn clip(&self) -> &MediaClip {
        match &self.source {
            SegmentSource::Clip { clip } | SegmentSource::Freeze { clip, .. } => clip,
        }
    }
}

/// Output frames covered by one segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSpan {
    /// Index into [`Timeline::segments`].
    pub segment: usize,
    /// Half-open output frame range.
    pub frames: Range<u64>,
}

/// Ordered sequence of segments whose durations sum to the target duration.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Timeline {
    segments: Vec<Segment>,
    seed: u64,
    target_secs: f64,
}

impl Timeline {
    pub(crate) fn new(segments: Vec<Segment>, seed: u64, target_secs: f64) -> Self {
        Self {
            segments,
            seed,
            target_secs,
        }
    }

    /// Segments in output order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Seed the clip order was drawn with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Duration the timeline was packed for.
    pub fn target_secs(&self) -> f64 {
        self.target_secs
    }

    /// Sum of segment durations.
    pub fn duration_secs(&self) -> f64 {
        self.segments.iter().map(Segment::duration_secs).sum()
    }

    /// `true` when no segment was produced (zero target).
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Verify the packed duration is within one output frame of the target.
    pub fn check_duration(&self, fps: Fps) -> StoryreelResult<()> {
        let drift = (self.duration_secs() - self.target_secs).abs();
        if drift > fps.frame_duration_secs() {
            return Err(StoryreelError::evaluation(format!(
                "timeline duration {:.6}s drifts {drift:.6}s from target {:.6}s",
                self.duration_secs(),
                self.target_secs
            )));
        }
        Ok(())
    }

    /// Total output frame count at `fps`.
    pub fn total_frames(&self, fps: Fps) -> u64 {
        fps.secs_to_frames_round(self.duration_secs())
    }

    /// Map each segment onto contiguous output frame ranges.
    ///
    /// Ranges tile `[0, total_frames)` without gaps or overlap; a segment shorter than half a
    /// frame may receive an empty range.
    pub fn frame_spans(&self, fps: Fps) -> Vec<FrameSpan> {
        let mut out = Vec::with_capacity(self.segments.len());
        let mut start_secs = 0.0f64;
        let mut start_frame = 0u64;
        for (i, seg) in self.segments.iter().enumerate() {
            let end_secs = start_secs + seg.duration_secs();
            let end_frame = fps.secs_to_frames_round(end_secs).max(start_frame);
            out.push(FrameSpan {
                segment: i,
                frames: start_frame..end_frame,
            });
            start_secs = end_secs;
            start_frame = end_frame;
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
