use crate::animation::ease::{out_quad, window_progress};
use crate::foundation::core::{Canvas, Point};

/// Caption anchor height as a fraction of the frame.
pub const ANCHOR_Y_FRAC: f64 = 0.85;

/// Where a caption word flies in from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPreset {
    /// One frame width left of the frame.
    FromLeft,
    /// Past the right edge, at `2W`.
    FromRight,
    /// One frame height above the top edge.
    FromAbove,
}

impl MotionPreset {
    /// Every preset, in selection order.
    pub const ALL: [Self; 3] = [Self::FromLeft, Self::FromRight, Self::FromAbove];

    /// Resolve the preset against a frame size.
    pub fn path(self, canvas: Canvas) -> MotionPath {
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let end = anchor(canvas);
        let start = match self {
            Self::FromLeft => Point::new(-w, end.y),
            Self::FromRight => Point::new(2.0 * w, end.y),
            Self::FromAbove => Point::new(end.x, -h),
        };
        MotionPath { start, end }
    }
}

/// Shared end point of every preset: bottom centre of the frame.
pub fn anchor(canvas: Canvas) -> Point {
    Point::new(
        0.5 * f64::from(canvas.width),
        ANCHOR_Y_FRAC * f64::from(canvas.height),
    )
}

/// Straight-line motion of a caption's ink-box centre, eased out quadratically.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionPath {
    /// Centre at the start of the window.
    pub start: Point,
    /// Centre at the end of the window.
    pub end: Point,
}

impl MotionPath {
    /// Position at time `t` for a word shown over `[win_start, win_end)`.
    pub fn position_at(&self, t: f64, win_start: f64, win_end: f64) -> Point {
        let p = out_quad(window_progress(t, win_start, win_end));
        self.start.lerp(self.end, p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/motion.rs"]
mod tests;
