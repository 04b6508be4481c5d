/// Quadratic ease-out of normalized progress: `1 - (1 - t)^2`.
///
/// `t` is clamped to `[0, 1]`; NaN counts as finished.
pub fn out_quad(t: f64) -> f64 {
    let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Normalized progress of `t` through `[start, end)`. An empty window is already complete.
pub fn window_progress(t: f64, start: f64, end: f64) -> f64 {
    let len = end - start;
    if len <= 0.0 {
        return 1.0;
    }
    ((t - start) / len).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
