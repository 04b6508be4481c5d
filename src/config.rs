//! Run configuration loaded from JSON.

use std::path::{Path, PathBuf};

use crate::audio::mix::DEFAULT_BACKGROUND_GAIN;
use crate::audio::tempo::{DEFAULT_TEMPO, TempoMode};
use crate::caption::transcript::TranscriptTimebase;
use crate::encode::ffmpeg::EncodeSettings;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{StoryreelError, StoryreelResult};
use crate::retry::RetryPolicy;

/// Everything a pipeline run needs besides its inputs.
///
/// Missing JSON fields take their defaults. Relative directories are resolved against the
/// process working directory.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Asset root; holds `fonts/impact.ttf` and the default clip/music directories.
    pub assets_dir: PathBuf,
    /// Clip directory. Defaults to `<assets_dir>/video`.
    pub video_dir: Option<PathBuf>,
    /// Background music directory. Defaults to `<assets_dir>/audio`.
    pub background_dir: Option<PathBuf>,
    /// Clip manifest.
    pub manifest: PathBuf,
    /// Preferred caption font.
    pub font: Option<PathBuf>,
    /// Narration speed-up factor.
    pub tempo: f64,
    /// Tempo scaling strategy.
    pub tempo_mode: TempoMode,
    /// Background attenuation.
    pub background_gain: f32,
    /// Output frame rate.
    pub fps: Fps,
    /// Output size. Defaults to the first clip's size rounded down to even.
    pub canvas: Option<Canvas>,
    /// Codec settings.
    pub encode: EncodeSettings,
    /// Clock the transcript times refer to.
    pub transcript_timebase: TranscriptTimebase,
    /// External transcriber argv; `{audio}` is replaced with the narration path.
    pub transcriber: Option<Vec<String>>,
    /// Retry policy for the transcriber.
    pub transcriber_retry: RetryPolicy,
    /// Render captions at all.
    pub captions: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            video_dir: None,
            background_dir: None,
            manifest: PathBuf::from("data/video_list.txt"),
            font: None,
            tempo: DEFAULT_TEMPO,
            tempo_mode: TempoMode::default(),
            background_gain: DEFAULT_BACKGROUND_GAIN,
            fps: Fps::default(),
            canvas: None,
            encode: EncodeSettings::default(),
            transcript_timebase: TranscriptTimebase::default(),
            transcriber: None,
            transcriber_retry: RetryPolicy::default(),
            captions: true,
        }
    }
}

impl PipelineConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> StoryreelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StoryreelError::validation(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate JSON config text.
    pub fn from_json(text: &str) -> StoryreelResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| StoryreelError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Clip directory after defaults.
    pub fn video_dir(&self) -> PathBuf {
        self.video_dir
            .clone()
            .unwrap_or_else(|| self.assets_dir.join("video"))
    }

    /// Background directory after defaults.
    pub fn background_dir(&self) -> PathBuf {
        self.background_dir
            .clone()
            .unwrap_or_else(|| self.assets_dir.join("audio"))
    }

    /// Reject values no stage can work with.
    pub fn validate(&self) -> StoryreelResult<()> {
        if !self.tempo.is_finite() || self.tempo <= 0.0 {
            return Err(StoryreelError::validation(format!(
                "tempo must be finite and > 0, got {}",
                self.tempo
            )));
        }
        if !self.background_gain.is_finite() || self.background_gain < 0.0 {
            return Err(StoryreelError::validation(format!(
                "background_gain must be finite and >= 0, got {}",
                self.background_gain
            )));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if let Some(c) = self.canvas {
            Canvas::new(c.width, c.height)?;
        }
        if self.encode.video_codec.trim().is_empty() || self.encode.audio_codec.trim().is_empty() {
            return Err(StoryreelError::validation("encoder names must not be empty"));
        }
        if self.encode.crf > 51 {
            return Err(StoryreelError::validation(format!(
                "crf must be in 0..=51, got {}",
                self.encode.crf
            )));
        }
        if let Some(argv) = &self.transcriber
            && argv.first().is_none_or(|a| a.trim().is_empty())
        {
            return Err(StoryreelError::validation(
                "transcriber command must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
