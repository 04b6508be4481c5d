use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::assets::media::is_tool_on_path;
use crate::compose::frame::FrameRGBA;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{StoryreelError, StoryreelResult};
use crate::foundation::math::mul_div255_u16;

/// Codec and quality settings passed to `ffmpeg`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    /// Video encoder name.
    pub video_codec: String,
    /// Audio encoder name.
    pub audio_codec: String,
    /// Constant rate factor.
    pub crf: u8,
    /// Encoder speed preset.
    pub preset: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            crf: 18,
            preset: "fast".to_string(),
        }
    }
}

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// Codec settings.
    pub encode: EncodeSettings,
}

impl FfmpegSinkOpts {
    /// Options for writing an MP4 to `out_path` with default codec settings.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
            encode: EncodeSettings::default(),
        }
    }

    /// Replace the codec settings.
    pub fn with_encode(mut self, encode: EncodeSettings) -> Self {
        self.encode = encode;
        self
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw frames to its stdin.
///
/// Audio is optional and provided through `SinkConfig.audio`. Any failure is an
/// [`StoryreelError::Encode`] and is not retried.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a sink; `ffmpeg` is spawned in `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    fn command(&self, cfg: &SinkConfig) -> StoryreelResult<Command> {
        let enc = &self.opts.encode;
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });

        // Raw RGBA on stdin; alpha is flattened in push_frame.
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);

        if let Some(audio) = cfg.audio.as_ref() {
            if audio.sample_rate == 0 || audio.channels == 0 {
                return Err(StoryreelError::validation(
                    "audio sample_rate and channels must be non-zero when audio is enabled",
                ));
            }
            cmd.args([
                "-f",
                "f32le",
                "-ar",
                &audio.sample_rate.to_string(),
                "-ac",
                &audio.channels.to_string(),
                "-i",
            ])
            .arg(&audio.path);
        }

        cmd.args([
            "-c:v",
            &enc.video_codec,
            "-crf",
            &enc.crf.to_string(),
            "-preset",
            &enc.preset,
            "-pix_fmt",
            "yuv420p",
        ]);
        if cfg.audio.is_some() {
            cmd.args(["-c:a", &enc.audio_codec, "-shortest"]);
        } else {
            cmd.arg("-an");
        }
        cmd.args(["-movflags", "+faststart"]);
        cmd.arg(&self.opts.out_path);
        Ok(cmd)
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> StoryreelResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(StoryreelError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(StoryreelError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(StoryreelError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(StoryreelError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_tool_on_path("ffmpeg") {
            return Err(StoryreelError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut child = self.command(&cfg)?.spawn().map_err(|e| {
            StoryreelError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| StoryreelError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| StoryreelError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::info!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            codec = %self.opts.encode.video_codec,
            audio = cfg.audio.is_some(),
            "ffmpeg encoder started"
        );
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> StoryreelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StoryreelError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(StoryreelError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(StoryreelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(StoryreelError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        flatten_premul_over_bg(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(StoryreelError::encode("ffmpeg sink is already finalized"));
        };
        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            StoryreelError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }

    fn end(&mut self) -> StoryreelResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| StoryreelError::encode("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            StoryreelError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| StoryreelError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| StoryreelError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(StoryreelError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        tracing::info!(out = %self.opts.out_path.display(), "ffmpeg encoder finished");
        self.cfg = None;
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // `-r` before `-i` sets the rawvideo input rate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

fn flatten_premul_over_bg(dst: &mut [u8], src_premul: &[u8], bg_rgba: [u8; 4]) -> StoryreelResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(StoryreelError::validation(
            "flatten_premul_over_bg expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> StoryreelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
