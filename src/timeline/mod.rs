//! Output timeline model and the clip packer that builds it.

/// Segment and timeline types.
pub mod model;
/// Seeded clip selection, trimming and freeze-frame padding.
pub mod packer;
