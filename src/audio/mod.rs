//! Narration time-scaling and background mixing.

/// Background selection and additive mixing.
pub mod mix;
/// Interleaved PCM track type.
pub mod pcm;
/// Tempo scaling of the narration.
pub mod tempo;
