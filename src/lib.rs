//! storyreel assembles short-form story videos.
//!
//! A run takes a pool of video clips, a narration track and a word-level transcript and produces
//! one MP4:
//!
//! - validate the clip pool ([`AssetCatalog`])
//! - speed up the narration and mix a background track under it ([`AudioMixBuilder`])
//! - pack clips into a [`Timeline`] exactly as long as the narration ([`pack`])
//! - animate one caption per word ([`animate`], [`CaptionRenderer`])
//! - composite and encode through `ffmpeg` ([`Compositor`], [`FfmpegSink`])
//!
//! Every random choice is drawn from an explicit seed that is returned with the results.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
/// Clip catalog, fonts and the `ffmpeg` media boundary.
pub mod assets;
/// Narration tempo and background mixing.
pub mod audio;
/// Word captions.
pub mod caption;
/// Frame compositing.
pub mod compose;
/// Run configuration.
pub mod config;
/// Encoding sinks.
pub mod encode;
/// Stage orchestration.
pub mod pipeline;
/// Retry policies.
pub mod retry;
/// Timeline model and packer.
pub mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rgba8};
pub use crate::foundation::error::{StoryreelError, StoryreelResult};
pub use crate::foundation::seed::{derive_seed, fresh_seed};

pub use crate::assets::catalog::{AssetCatalog, MediaClip};
pub use crate::assets::fonts::{CaptionFont, load_caption_font};
pub use crate::assets::media::{FfprobeProbe, MediaInfo, MediaProbe};
pub use crate::audio::mix::{AudioMixBuilder, MixedAudio, mix};
pub use crate::audio::pcm::AudioTrack;
pub use crate::audio::tempo::TempoMode;
pub use crate::caption::animator::{CaptionOverlay, TimeWindow, animate};
pub use crate::caption::motion::MotionPreset;
pub use crate::caption::render::{CaptionRenderer, CaptionSprite, render_overlay_frame};
pub use crate::caption::style::{CaptionStyle, StyleKind};
pub use crate::caption::transcript::{TranscriptTimebase, WordToken};
pub use crate::compose::compositor::{ComposeStats, Compositor};
pub use crate::compose::frame::FrameRGBA;
pub use crate::config::PipelineConfig;
pub use crate::encode::ffmpeg::{EncodeSettings, FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::pipeline::{Pipeline, PipelineReport, RenderRequest};
pub use crate::retry::{RetryOutcome, RetryPolicy};
pub use crate::timeline::model::{Segment, SegmentSource, Timeline};
pub use crate::timeline::packer::{pack, pack_with_opener};
