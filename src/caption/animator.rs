use rand::Rng;

use crate::caption::motion::{MotionPath, MotionPreset};
use crate::caption::style::{CaptionStyle, style_for_index};
use crate::caption::transcript::WordToken;
use crate::foundation::core::{Canvas, Point};
use crate::foundation::seed::rng_for;

/// Half-open visibility window `[start, end)` in output seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeWindow {
    /// Inclusive start.
    pub start: f64,
    /// Exclusive end.
    pub end: f64,
}

impl TimeWindow {
    /// `true` when `t` lies in `[start, end)`.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }
}

/// Description of one animated caption word. Carries no pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionOverlay {
    /// Position among eligible words.
    pub index: usize,
    /// Text to draw.
    pub word: String,
    /// Colors and outline.
    pub style: CaptionStyle,
    /// Preset the motion was resolved from.
    pub preset: MotionPreset,
    /// Resolved motion of the ink-box centre.
    pub motion: MotionPath,
    /// When the word is visible.
    pub window: TimeWindow,
}

impl CaptionOverlay {
    /// Ink-box centre at output time `t`.
    pub fn position_at(&self, t: f64) -> Point {
        self.motion
            .position_at(t, self.window.start, self.window.end)
    }

    /// `true` when the overlay is drawn at `t`.
    pub fn is_active(&self, t: f64) -> bool {
        self.window.contains(t)
    }
}

/// Turn words into independent animated overlays.
///
/// Words ending after `video_duration` are dropped before styles are assigned, so style indices
/// count eligible words only. Motion presets are drawn from `seed`.
#[tracing::instrument(skip(words), fields(words = words.len()))]
pub fn animate(
    words: &[WordToken],
    canvas: Canvas,
    video_duration: f64,
    seed: u64,
) -> Vec<CaptionOverlay> {
    let mut rng = rng_for(seed);
    let overlays: Vec<CaptionOverlay> = words
        .iter()
        .filter(|w| w.end <= video_duration)
        .enumerate()
        .map(|(index, w)| {
            let preset = MotionPreset::ALL[rng.gen_range(0..MotionPreset::ALL.len())];
            CaptionOverlay {
                index,
                word: w.text.clone(),
                style: CaptionStyle::preset(style_for_index(index)),
                preset,
                motion: preset.path(canvas),
                window: TimeWindow {
                    start: w.start,
                    end: w.end,
                },
            }
        })
        .collect();

    let dropped = words.len() - overlays.len();
    if dropped > 0 {
        tracing::debug!(dropped, "words past the end of the video dropped");
    }
    overlays
}

#[cfg(test)]
#[path = "../../tests/unit/caption/animator.rs"]
mod tests;
