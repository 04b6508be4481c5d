//! Encoding sinks.
//!
//! Sinks consume composited frames in timeline order.

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// Frame sink trait and the in-memory sink.
pub mod sink;
