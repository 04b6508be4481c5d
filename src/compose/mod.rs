//! Frame-by-frame layering of segments and captions.

/// The compose loop.
pub mod compositor;
/// Premultiplied RGBA frame buffer.
pub mod frame;
/// Per-segment base frame readers.
pub mod reader;
