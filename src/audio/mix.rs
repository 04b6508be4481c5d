use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;

use crate::assets::catalog::{AUDIO_EXTENSIONS, list_media_files};
use crate::audio::pcm::AudioTrack;
use crate::audio::tempo::{TempoMode, time_scale_file};
use crate::foundation::error::{StoryreelError, StoryreelResult};
use crate::foundation::seed::rng_for;

/// Default background attenuation.
pub const DEFAULT_BACKGROUND_GAIN: f32 = 0.3;

/// Result of the audio stage.
#[derive(Clone, Debug)]
pub struct MixedAudio {
    /// Final track handed to the encoder.
    pub mixed: AudioTrack,
    /// Time-scaled narration alone (what captions are timed against).
    pub narration: AudioTrack,
    /// Background track that was mixed in, if any.
    pub background: Option<PathBuf>,
}

/// Builds the single mixed track from narration and an optional background pool.
#[derive(Clone, Debug)]
pub struct AudioMixBuilder {
    /// Narration speed-up factor.
    pub tempo: f64,
    /// Tempo scaling strategy.
    pub tempo_mode: TempoMode,
    /// Background attenuation.
    pub background_gain: f32,
    /// Directory holding candidate background tracks.
    pub background_dir: Option<PathBuf>,
}

impl AudioMixBuilder {
    /// Time-scale `narration_path` and mix a seeded background pick under it.
    #[tracing::instrument(skip(self, narration_path), fields(narration = %narration_path.display()))]
    pub fn build(&self, narration_path: &Path, seed: u64) -> StoryreelResult<MixedAudio> {
        let narration = time_scale_file(narration_path, self.tempo, self.tempo_mode)?;
        if narration.is_empty() {
            return Err(StoryreelError::evaluation(format!(
                "narration '{}' decoded to zero samples",
                narration_path.display()
            )));
        }
        tracing::info!(
            duration = narration.duration_secs(),
            tempo = self.tempo,
            "narration ready"
        );

        let candidates = match &self.background_dir {
            Some(dir) => list_media_files(dir, AUDIO_EXTENSIONS)?,
            None => Vec::new(),
        };
        let Some(choice) = choose_background(&candidates, seed) else {
            tracing::warn!("no background track available, using narration alone");
            return Ok(MixedAudio {
                mixed: narration.clone(),
                narration,
                background: None,
            });
        };

        let background = match AudioTrack::decode(choice) {
            Ok(t) if !t.is_empty() => t,
            Ok(_) => {
                tracing::warn!(track = %choice.display(), "background track is silent, skipping");
                return Ok(MixedAudio {
                    mixed: narration.clone(),
                    narration,
                    background: None,
                });
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!(track = %choice.display(), error = %e, "background track unreadable, skipping");
                return Ok(MixedAudio {
                    mixed: narration.clone(),
                    narration,
                    background: None,
                });
            }
            Err(e) => return Err(e),
        };

        tracing::info!(track = %choice.display(), gain = self.background_gain, "mixing background");
        let mixed = mix(&narration, Some(&background), self.background_gain)?;
        Ok(MixedAudio {
            mixed,
            narration,
            background: Some(choice.clone()),
        })
    }
}

/// Pick one background candidate with `seed`.
pub fn choose_background(candidates: &[PathBuf], seed: u64) -> Option<&PathBuf> {
    candidates.choose(&mut rng_for(seed))
}

/// Mix `background`, attenuated by `gain`, under `narration`.
///
/// The output always has the narration's format and exact length. Without a background the
/// narration is returned unchanged.
pub fn mix(
    narration: &AudioTrack,
    background: Option<&AudioTrack>,
    gain: f32,
) -> StoryreelResult<AudioTrack> {
    if !gain.is_finite() || gain < 0.0 {
        return Err(StoryreelError::validation(format!(
            "background gain must be finite and >= 0, got {gain}"
        )));
    }
    let Some(background) = background else {
        return Ok(narration.clone());
    };

    let background = conform(background, narration.sample_rate(), narration.channels())?;
    let looped = loop_to_frames(&background, narration.frames())?;

    let mut out = narration.samples().to_vec();
    for (o, b) in out.iter_mut().zip(looped.samples()) {
        *o = (*o + b * gain).clamp(-1.0, 1.0);
    }
    AudioTrack::new(narration.sample_rate(), narration.channels(), out)
}

/// Repeat `track` whole until it covers `frames`, then truncate to exactly `frames`.
pub fn loop_to_frames(track: &AudioTrack, frames: usize) -> StoryreelResult<AudioTrack> {
    if track.is_empty() {
        return Err(StoryreelError::validation("cannot loop an empty track"));
    }
    let channels = usize::from(track.channels());
    let repetitions = frames / track.frames() + 1;
    let mut out = Vec::with_capacity(repetitions * track.samples().len());
    for _ in 0..repetitions {
        out.extend_from_slice(track.samples());
    }
    out.truncate(frames * channels);
    AudioTrack::new(track.sample_rate(), track.channels(), out)
}

/// Convert `track` to `sample_rate`/`channels` (linear resampling, channel up/down-mix).
pub fn conform(track: &AudioTrack, sample_rate: u32, channels: u16) -> StoryreelResult<AudioTrack> {
    if track.sample_rate() == sample_rate && track.channels() == channels {
        return Ok(track.clone());
    }

    let src_ch = usize::from(track.channels());
    let dst_ch = usize::from(channels);
    let src = track.samples();
    let src_frames = track.frames();
    if src_frames == 0 {
        return AudioTrack::new(sample_rate, channels, Vec::new());
    }

    let ratio = f64::from(track.sample_rate()) / f64::from(sample_rate);
    let out_frames = ((src_frames as f64) / ratio).round() as usize;
    let mut out = Vec::with_capacity(out_frames * dst_ch);
    for i in 0..out_frames {
        let pos = (i as f64) * ratio;
        let f0 = (pos.floor() as usize).min(src_frames - 1);
        let f1 = (f0 + 1).min(src_frames - 1);
        let frac = (pos - f0 as f64).clamp(0.0, 1.0) as f32;
        let sample = |c: usize| {
            let a = src[f0 * src_ch + c];
            let b = src[f1 * src_ch + c];
            a + (b - a) * frac
        };
        if src_ch == dst_ch {
            out.extend((0..dst_ch).map(sample));
        } else {
            let mono = (0..src_ch).map(sample).sum::<f32>() / src_ch as f32;
            out.extend(std::iter::repeat_n(mono, dst_ch));
        }
    }
    AudioTrack::new(sample_rate, channels, out)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
