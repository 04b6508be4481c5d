use std::path::{Path, PathBuf};

use crate::foundation::core::Canvas;
use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Internal audio mixing sample rate used across decode/mix/encode pipeline.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Channel count used across decode/mix/encode pipeline.
pub const MIX_CHANNELS: u16 = 2;

/// Basic metadata about a probed media file.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaInfo {
    /// Source path used for probing/decoding.
    pub source_path: PathBuf,
    /// Container duration in seconds.
    pub duration_secs: f64,
    /// Video dimensions, when a video stream is present.
    pub video_size: Option<(u32, u32)>,
}

/// Decode probe boundary.
///
/// The catalog and the packer only need durations and dimensions; tests substitute an in-memory
/// implementation for the `ffprobe`-backed one.
pub trait MediaProbe {
    /// Probe `path`, failing with [`StoryreelError::UnreadableMedia`] when it cannot be read.
    fn probe(&self, path: &Path) -> StoryreelResult<MediaInfo>;
}

/// [`MediaProbe`] backed by the system `ffprobe`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfprobeProbe;

impl MediaProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> StoryreelResult<MediaInfo> {
        probe_media(path)
    }
}

#[cfg(feature = "media-ffmpeg")]
#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

#[cfg(feature = "media-ffmpeg")]
#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[cfg(feature = "media-ffmpeg")]
#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Probe media metadata through `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_media(source_path: &Path) -> StoryreelResult<MediaInfo> {
    if !source_path.is_file() {
        return Err(StoryreelError::unreadable(source_path, "file does not exist"));
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| StoryreelError::evaluation(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(StoryreelError::unreadable(
            source_path,
            String::from_utf8_lossy(&out.stderr).trim().to_string(),
        ));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout).map_err(|e| {
        StoryreelError::unreadable(source_path, format!("ffprobe json parse failed: {e}"))
    })?;
    media_info_from_probe(source_path, parsed)
}

#[cfg(feature = "media-ffmpeg")]
fn media_info_from_probe(source_path: &Path, parsed: ProbeOut) -> StoryreelResult<MediaInfo> {
    let parse_secs = |s: &Option<String>| s.as_deref().and_then(|d| d.trim().parse::<f64>().ok());

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let duration_secs = parsed
        .format
        .as_ref()
        .and_then(|f| parse_secs(&f.duration))
        .or_else(|| parsed.streams.iter().find_map(|s| parse_secs(&s.duration)))
        .ok_or_else(|| StoryreelError::unreadable(source_path, "no duration reported"))?;
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(StoryreelError::unreadable(
            source_path,
            format!("non-positive duration {duration_secs}"),
        ));
    }

    let video_size = match video {
        Some(v) => Some((
            v.width
                .ok_or_else(|| StoryreelError::unreadable(source_path, "missing video width"))?,
            v.height
                .ok_or_else(|| StoryreelError::unreadable(source_path, "missing video height"))?,
        )),
        None => None,
    };

    Ok(MediaInfo {
        source_path: source_path.to_path_buf(),
        duration_secs,
        video_size,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Probe media metadata through `ffprobe`.
///
/// Returns an error when `media-ffmpeg` feature is disabled.
pub fn probe_media(source_path: &Path) -> StoryreelResult<MediaInfo> {
    Err(StoryreelError::unreadable(
        source_path,
        "media probing requires the 'media-ffmpeg' feature",
    ))
}

/// `ffmpeg` filter chain that scales a source into `canvas`, letterboxed and centred.
pub(crate) fn fit_canvas_filter(canvas: Canvas) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black,setsar=1",
        w = canvas.width,
        h = canvas.height
    )
}

#[cfg(feature = "media-ffmpeg")]
/// Decode a single RGBA frame at `source_time_sec`, fitted to `canvas`.
pub fn decode_still_rgba8(
    source_path: &Path,
    source_time_sec: f64,
    canvas: Canvas,
) -> StoryreelResult<Vec<u8>> {
    let out = std::process::Command::new("ffmpeg")
        .args([
            "-v",
            "error",
            "-ss",
            &format!("{:.6}", source_time_sec.max(0.0)),
        ])
        .arg("-i")
        .arg(source_path)
        .args([
            "-frames:v",
            "1",
            "-vf",
            &fit_canvas_filter(canvas),
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            StoryreelError::evaluation(format!("failed to run ffmpeg for still decode: {e}"))
        })?;

    if !out.status.success() {
        return Err(StoryreelError::unreadable(
            source_path,
            String::from_utf8_lossy(&out.stderr).trim().to_string(),
        ));
    }
    let expected_len = canvas.rgba_len();
    if out.stdout.len() < expected_len {
        return Err(StoryreelError::unreadable(
            source_path,
            format!(
                "decoded still has {} bytes, expected {expected_len}",
                out.stdout.len()
            ),
        ));
    }
    let mut frame = out.stdout;
    frame.truncate(expected_len);
    Ok(frame)
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Decode a single RGBA frame at `source_time_sec`, fitted to `canvas`.
///
/// Returns an error when `media-ffmpeg` feature is disabled.
pub fn decode_still_rgba8(
    source_path: &Path,
    _source_time_sec: f64,
    _canvas: Canvas,
) -> StoryreelResult<Vec<u8>> {
    Err(StoryreelError::unreadable(
        source_path,
        "video decoding requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(feature = "media-ffmpeg")]
/// Decode audio from a media source to interleaved `f32` PCM at the mix format.
pub fn decode_audio_f32(path: &Path, sample_rate: u32, channels: u16) -> StoryreelResult<Vec<f32>> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &channels.to_string(),
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            StoryreelError::evaluation(format!("failed to run ffmpeg for audio decode: {e}"))
        })?;

    if !out.status.success() {
        return Err(StoryreelError::unreadable(
            path,
            String::from_utf8_lossy(&out.stderr).trim().to_string(),
        ));
    }

    f32le_bytes_to_samples(&out.stdout)
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Decode audio from a media source to interleaved `f32` PCM at the mix format.
///
/// Returns an error when `media-ffmpeg` feature is disabled.
pub fn decode_audio_f32(
    path: &Path,
    _sample_rate: u32,
    _channels: u16,
) -> StoryreelResult<Vec<f32>> {
    Err(StoryreelError::unreadable(
        path,
        "audio decoding requires the 'media-ffmpeg' feature",
    ))
}

pub(crate) fn f32le_bytes_to_samples(bytes: &[u8]) -> StoryreelResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(StoryreelError::evaluation(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Return `true` when `tool` can be invoked from `PATH`.
pub fn is_tool_on_path(tool: &str) -> bool {
    std::process::Command::new(tool)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
