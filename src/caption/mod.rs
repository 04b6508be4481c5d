//! Word captions: transcript intake, styling, motion and rasterization.

/// Per-word overlay construction.
pub mod animator;
/// Fly-in motion presets.
pub mod motion;
/// Outlined text rasterization.
pub mod render;
/// Style presets.
pub mod style;
/// Transcript parsing and external transcription.
pub mod transcript;
