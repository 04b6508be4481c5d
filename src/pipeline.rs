//! End-to-end run: catalog, audio mix, packing, captions, composition.

use std::path::{Path, PathBuf};

use crate::assets::catalog::{AssetCatalog, MediaClip};
use crate::assets::fonts::load_caption_font;
use crate::assets::media::{FfprobeProbe, MediaProbe};
use crate::audio::mix::{AudioMixBuilder, MixedAudio};
use crate::audio::pcm::AudioTrack;
use crate::caption::animator::{CaptionOverlay, animate};
use crate::caption::render::{CaptionRenderer, CaptionSprite, rasterize_all};
use crate::caption::transcript::{CommandTranscriber, TranscriptTimebase, WordToken, load_transcript};
use crate::compose::compositor::{ComposeStats, Compositor};
use crate::compose::reader::{FfmpegDecoder, SegmentDecoder};
use crate::config::PipelineConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink};
use crate::foundation::core::Canvas;
use crate::foundation::error::{StoryreelError, StoryreelResult};
use crate::foundation::seed::derive_seed;
use crate::timeline::model::Timeline;
use crate::timeline::packer::{ProbeOpener, pack_with_opener};

/// Stage salts mixed into the run seed.
const PACK_SALT: &str = "pack";
const BACKGROUND_SALT: &str = "background";
const MOTION_SALT: &str = "motion";

/// Inputs of one render.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    /// Narration audio.
    pub narration: PathBuf,
    /// Word-level transcript JSON. When absent the configured transcriber is used, if any.
    pub transcript: Option<PathBuf>,
    /// Output MP4 path.
    pub output: PathBuf,
    /// Run seed; every random choice derives from it.
    pub seed: u64,
}

/// Summary of a finished render.
#[derive(Clone, Debug, serde::Serialize)]
pub struct PipelineReport {
    /// Run seed, for replay.
    pub seed: u64,
    /// Written file.
    pub output: PathBuf,
    /// Output duration (the time-scaled narration's).
    pub duration_secs: f64,
    /// Output frame size.
    pub canvas: Canvas,
    /// Clips that passed validation.
    pub valid_clips: usize,
    /// Segments in the timeline.
    pub segments: usize,
    /// Whether a freeze frame padded the end.
    pub freeze_padded: bool,
    /// Background track mixed in.
    pub background: Option<PathBuf>,
    /// Transcript words available.
    pub words: usize,
    /// Captions actually drawn.
    pub captions: usize,
    /// Composition counters.
    pub compose: ComposeStats,
}

/// Stage runner bound to one configuration.
pub struct Pipeline<'a> {
    cfg: PipelineConfig,
    probe: &'a dyn MediaProbe,
    decoder: &'a dyn SegmentDecoder,
}

impl Pipeline<'static> {
    /// Pipeline using `ffprobe`/`ffmpeg` for media access.
    pub fn new(cfg: PipelineConfig) -> StoryreelResult<Self> {
        Self::with_media(cfg, &FfprobeProbe, &FfmpegDecoder)
    }
}

impl<'a> Pipeline<'a> {
    /// Pipeline with substitute probe and decoder.
    pub fn with_media(
        cfg: PipelineConfig,
        probe: &'a dyn MediaProbe,
        decoder: &'a dyn SegmentDecoder,
    ) -> StoryreelResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            probe,
            decoder,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Read the manifest (populating it if needed) and validate every clip.
    pub fn resolve_pool(&self) -> StoryreelResult<Vec<MediaClip>> {
        let catalog = AssetCatalog::new(self.cfg.video_dir());
        let entries = catalog.load_or_populate_manifest(&self.cfg.manifest)?;
        catalog.resolve(&entries, self.probe)
    }

    /// Pack `pool` for `target_secs` with the run seed's packing stream.
    pub fn plan(&self, pool: &[MediaClip], target_secs: f64, seed: u64) -> StoryreelResult<Timeline> {
        let timeline = pack_with_opener(
            pool,
            target_secs,
            derive_seed(seed, PACK_SALT),
            &ProbeOpener(self.probe),
        )?;
        timeline.check_duration(self.cfg.fps)?;
        Ok(timeline)
    }

    /// Time-scale the narration and mix the background under it.
    pub fn mix_audio(&self, narration: &Path, seed: u64) -> StoryreelResult<MixedAudio> {
        AudioMixBuilder {
            tempo: self.cfg.tempo,
            tempo_mode: self.cfg.tempo_mode,
            background_gain: self.cfg.background_gain,
            background_dir: Some(self.cfg.background_dir()),
        }
        .build(narration, derive_seed(seed, BACKGROUND_SALT))
    }

    /// Output size: configured, else the first segment's clip rounded down to even.
    pub fn canvas_for(&self, timeline: &Timeline, pool: &[MediaClip]) -> StoryreelResult<Canvas> {
        if let Some(c) = self.cfg.canvas {
            return Ok(c);
        }
        let (w, h) = timeline
            .segments()
            .first()
            .and_then(|s| s.clip().video_size())
            .or_else(|| pool.iter().find_map(MediaClip::video_size))
            .ok_or_else(|| {
                StoryreelError::validation("no clip reports a frame size; set `canvas` explicitly")
            })?;
        Canvas::even_floor(w, h)
    }

    /// Words on the output clock, from a transcript file or the configured transcriber.
    ///
    /// Missing transcription is not fatal: the video is produced without captions.
    pub fn words(
        &self,
        transcript: Option<&Path>,
        narration: &AudioTrack,
    ) -> StoryreelResult<Vec<WordToken>> {
        if let Some(path) = transcript {
            let words = load_transcript(path)?;
            return Ok(self.cfg.transcript_timebase.apply(words, self.cfg.tempo));
        }
        let Some(argv) = &self.cfg.transcriber else {
            tracing::warn!("no transcript and no transcriber configured, rendering without captions");
            return Ok(Vec::new());
        };

        let transcriber = CommandTranscriber::new(argv.clone())?;
        let wav = tempfile::Builder::new()
            .prefix("storyreel-narration-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| StoryreelError::evaluation(format!("failed to create temp wav: {e}")))?;
        narration.write_wav(wav.path())?;

        let outcome = transcriber.transcribe_with_retry(wav.path(), &self.cfg.transcriber_retry);
        if outcome.is_accepted() {
            tracing::info!(attempts = outcome.attempts(), "transcription accepted");
        } else {
            tracing::warn!(
                attempts = outcome.attempts(),
                "transcription below policy, using best result"
            );
        }
        // The transcriber heard the time-scaled narration.
        Ok(TranscriptTimebase::Scaled.apply(outcome.into_value().unwrap_or_default(), self.cfg.tempo))
    }

    /// Build and rasterize caption overlays; degrade to none when no font is available.
    pub fn captions(
        &self,
        words: &[WordToken],
        canvas: Canvas,
        video_duration: f64,
        seed: u64,
    ) -> StoryreelResult<Vec<(CaptionOverlay, CaptionSprite)>> {
        if !self.cfg.captions {
            return Ok(Vec::new());
        }
        if words.is_empty() {
            tracing::warn!("transcription empty, no captions");
            return Ok(Vec::new());
        }
        let font = match load_caption_font(self.cfg.font.as_deref(), &self.cfg.assets_dir) {
            Ok(f) => f,
            Err(e) if e.is_recoverable() => {
                tracing::warn!(error = %e, "no caption font, rendering without captions");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        let overlays = animate(words, canvas, video_duration, derive_seed(seed, MOTION_SALT));
        let mut renderer = CaptionRenderer::new(font, canvas);
        Ok(rasterize_all(&mut renderer, overlays))
    }

    /// Run every stage into `sink`.
    #[tracing::instrument(skip_all, fields(seed = req.seed))]
    pub fn run_into(
        &self,
        req: &RenderRequest,
        sink: &mut dyn FrameSink,
    ) -> StoryreelResult<PipelineReport> {
        tracing::info!(seed = req.seed, narration = %req.narration.display(), "pipeline started");

        let pool = self.resolve_pool()?;
        let audio = self.mix_audio(&req.narration, req.seed)?;
        let target = audio.mixed.duration_secs();
        let timeline = self.plan(&pool, target, req.seed)?;
        let canvas = self.canvas_for(&timeline, &pool)?;

        let words = self.words(req.transcript.as_deref(), &audio.narration)?;
        let captions = self.captions(&words, canvas, timeline.duration_secs(), req.seed)?;

        let mut pcm = tempfile::Builder::new()
            .prefix("storyreel-mix-")
            .suffix(".f32le")
            .tempfile()
            .map_err(|e| StoryreelError::evaluation(format!("failed to create temp audio: {e}")))?;
        audio.mixed.write_f32le(pcm.as_file_mut())?;
        let audio_input = AudioInputConfig {
            path: pcm.path().to_path_buf(),
            sample_rate: audio.mixed.sample_rate(),
            channels: audio.mixed.channels(),
        };

        let compose = Compositor::new(canvas, self.cfg.fps, self.decoder).compose(
            &timeline,
            &captions,
            Some(audio_input),
            sink,
        )?;

        let report = PipelineReport {
            seed: req.seed,
            output: req.output.clone(),
            duration_secs: timeline.duration_secs(),
            canvas,
            valid_clips: pool.len(),
            segments: timeline.segments().len(),
            freeze_padded: timeline.segments().iter().any(|s| s.is_freeze()),
            background: audio.background,
            words: words.len(),
            captions: captions.len(),
            compose,
        };
        tracing::info!(
            seed = report.seed,
            duration = report.duration_secs,
            segments = report.segments,
            captions = report.captions,
            "pipeline finished"
        );
        Ok(report)
    }

    /// Run every stage and encode to `req.output` with `ffmpeg`.
    pub fn run(&self, req: &RenderRequest) -> StoryreelResult<PipelineReport> {
        let mut sink = FfmpegSink::new(
            FfmpegSinkOpts::new(&req.output).with_encode(self.cfg.encode.clone()),
        );
        self.run_into(req, &mut sink)
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
