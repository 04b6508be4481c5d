use std::io::Read;
use std::process::{Child, ChildStdout};
use std::thread::JoinHandle;

use crate::assets::media::decode_still_rgba8;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{StoryreelError, StoryreelResult};
use crate::timeline::model::{Segment, SegmentSource};

/// Sequential base frames of one segment, already fitted to the canvas.
pub trait SegmentFrames {
    /// Next opaque RGBA8 frame (`canvas.rgba_len()` bytes).
    fn next_frame(&mut self) -> StoryreelResult<&[u8]>;
}

/// Opens a frame stream for each segment as the compositor reaches it.
pub trait SegmentDecoder {
    /// Open `segment` for sequential reading at `fps`.
    fn open(
        &self,
        segment: &Segment,
        canvas: Canvas,
        fps: Fps,
    ) -> StoryreelResult<Box<dyn SegmentFrames>>;
}

/// Decodes segments with the system `ffmpeg`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegDecoder;

impl SegmentDecoder for FfmpegDecoder {
    fn open(
        &self,
        segment: &Segment,
        canvas: Canvas,
        fps: Fps,
    ) -> StoryreelResult<Box<dyn SegmentFrames>> {
        match &segment.source {
            SegmentSource::Freeze { clip, at_secs } => {
                let still = decode_still_rgba8(clip.path(), *at_secs, canvas)?;
                Ok(Box::new(HeldFrame { frame: still }))
            }
            SegmentSource::Clip { .. } => Ok(Box::new(ClipReader::spawn(segment, canvas, fps)?)),
        }
    }
}

/// The same frame forever.
pub(crate) struct HeldFrame {
    pub(crate) frame: Vec<u8>,
}

impl SegmentFrames for HeldFrame {
    fn next_frame(&mut self) -> StoryreelResult<&[u8]> {
        Ok(&self.frame)
    }
}

/// Scoped `ffmpeg` process streaming one clip excerpt as raw RGBA.
///
/// The process is killed and reaped when the reader drops. When a cleanly exiting stream ends
/// early the last decoded frame is repeated. A stream that yields no frame, or a decoder that exits
/// with an error, fails with [`StoryreelError::UnreadableMedia`].
pub struct ClipReader {
    child: Child,
    stdout: Option<ChildStdout>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    frame: Vec<u8>,
    scratch: Vec<u8>,
    decoded: u64,
    label: String,
}

impl ClipReader {
    #[cfg(feature = "media-ffmpeg")]
    fn spawn(segment: &Segment, canvas: Canvas, fps: Fps) -> StoryreelResult<Self> {
        use std::process::{Command, Stdio};

        let path = segment.clip().path();
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-ss", &format!("{:.6}", segment.in_secs)])
            .arg("-i")
            .arg(path)
            .args([
                "-t",
                &format!("{:.6}", segment.duration_secs()),
                "-an",
                "-sn",
                "-vf",
                &format!(
                    "fps={}/{},{}",
                    fps.num,
                    fps.den,
                    crate::assets::media::fit_canvas_filter(canvas)
                ),
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                StoryreelError::evaluation(format!("failed to spawn ffmpeg segment decoder: {e}"))
            })?;
        let stdout = child.stdout.take();
        let stderr_drain = child.stderr.take().map(|mut stderr| {
            std::thread::spawn(move || {
                let mut bytes = Vec::new();
                stderr.read_to_end(&mut bytes)?;
                Ok(bytes)
            })
        });
        tracing::debug!(clip = %path.display(), in_secs = segment.in_secs, out_secs = segment.out_secs, "segment reader opened");
        Ok(Self {
            child,
            stdout,
            stderr_drain,
            frame: [0, 0, 0, 255].repeat(canvas.rgba_len() / 4),
            scratch: vec![0; canvas.rgba_len()],
            decoded: 0,
            label: path.display().to_string(),
        })
    }

    #[cfg(not(feature = "media-ffmpeg"))]
    fn spawn(segment: &Segment, _canvas: Canvas, _fps: Fps) -> StoryreelResult<Self> {
        Err(StoryreelError::unreadable(
            segment.clip().path(),
            "video decoding requires the 'media-ffmpeg' feature",
        ))
    }

    /// Reap the decoder once its output is exhausted.
    fn finish_stream(&mut self) -> StoryreelResult<()> {
        self.stdout = None;
        let status = self.child.wait().map_err(|e| {
            StoryreelError::evaluation(format!("failed to wait for ffmpeg on '{}': {e}", self.label))
        })?;
        let stderr = match self.stderr_drain.take().map(JoinHandle::join) {
            Some(Ok(Ok(bytes))) => String::from_utf8_lossy(&bytes).trim().to_owned(),
            _ => String::new(),
        };

        if !status.success() {
            return Err(StoryreelError::unreadable(
                self.label.as_str(),
                format!("ffmpeg decode exited with {status}: {stderr}"),
            ));
        }
        if self.decoded == 0 {
            return Err(StoryreelError::unreadable(
                self.label.as_str(),
                format!("ffmpeg decoded no frames: {stderr}"),
            ));
        }
        tracing::debug!(clip = %self.label, decoded = self.decoded, "segment stream ended early, holding last frame");
        Ok(())
    }
}

impl SegmentFrames for ClipReader {
    fn next_frame(&mut self) -> StoryreelResult<&[u8]> {
        if let Some(stdout) = self.stdout.as_mut() {
            match stdout.read_exact(&mut self.scratch) {
                Ok(()) => {
                    std::mem::swap(&mut self.frame, &mut self.scratch);
                    self.decoded += 1;
                }
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    self.finish_stream()?;
                }
                Err(e) => {
                    return Err(StoryreelError::evaluation(format!(
                        "failed to read frames of '{}': {e}",
                        self.label
                    )));
                }
            }
        }
        Ok(&self.frame)
    }
}

impl Drop for ClipReader {
    fn drop(&mut self) {
        drop(self.stdout.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/reader.rs"]
mod tests;
