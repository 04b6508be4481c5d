/// Clip manifest handling and pool validation.
pub mod catalog;
/// Caption font discovery.
pub mod fonts;
/// `ffprobe`/`ffmpeg` media boundary.
pub mod media;
