use std::path::Path;

use crate::audio::pcm::AudioTrack;
use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Default narration speed-up.
pub const DEFAULT_TEMPO: f64 = 1.35;

/// How narration is time-scaled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempoMode {
    /// `ffmpeg` `atempo`: shorter, same pitch.
    #[default]
    PitchPreserving,
    /// In-process resampling: shorter and higher pitched.
    Resample,
}

/// Split `factor` into an `atempo` filter chain whose stages stay within `[0.5, 2.0]`.
pub fn atempo_chain(factor: f64) -> StoryreelResult<String> {
    validate_factor(factor)?;
    let mut stages = Vec::new();
    let mut rest = factor;
    while rest > 2.0 {
        stages.push(2.0);
        rest /= 2.0;
    }
    while rest < 0.5 {
        stages.push(0.5);
        rest /= 0.5;
    }
    stages.push(rest);
    Ok(stages
        .iter()
        .map(|s| format!("atempo={s:.6}"))
        .collect::<Vec<_>>()
        .join(","))
}

fn validate_factor(factor: f64) -> StoryreelResult<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(StoryreelError::validation(format!(
            "tempo factor must be finite and > 0, got {factor}"
        )));
    }
    Ok(())
}

/// Decode `path` and speed it up by `factor`.
///
/// In pitch-preserving mode the scaled audio goes through a temporary WAV that is removed on
/// every exit path when the handle drops.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn time_scale_file(path: &Path, factor: f64, mode: TempoMode) -> StoryreelResult<AudioTrack> {
    validate_factor(factor)?;
    match mode {
        TempoMode::Resample => {
            let track = AudioTrack::decode(path)?;
            resample_tempo(&track, factor)
        }
        TempoMode::PitchPreserving => {
            if factor == 1.0 {
                return AudioTrack::decode(path);
            }
            let tmp = tempfile::Builder::new()
                .prefix("storyreel-tempo-")
                .suffix(".wav")
                .tempfile()
                .map_err(|e| {
                    StoryreelError::evaluation(format!("failed to create temp wav: {e}"))
                })?;
            run_atempo(path, tmp.path(), factor)?;
            let track = AudioTrack::decode(tmp.path())?;
            tracing::debug!(duration = track.duration_secs(), "narration time-scaled");
            Ok(track)
        }
    }
}

#[cfg(feature = "media-ffmpeg")]
fn run_atempo(input: &Path, output: &Path, factor: f64) -> StoryreelResult<()> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-i"])
        .arg(input)
        .args(["-vn", "-filter:a", &atempo_chain(factor)?])
        .arg(output)
        .output()
        .map_err(|e| StoryreelError::evaluation(format!("failed to run ffmpeg atempo: {e}")))?;
    if !out.status.success() {
        return Err(StoryreelError::unreadable(
            input,
            String::from_utf8_lossy(&out.stderr).trim().to_string(),
        ));
    }
    Ok(())
}

#[cfg(not(feature = "media-ffmpeg"))]
fn run_atempo(input: &Path, _output: &Path, _factor: f64) -> StoryreelResult<()> {
    Err(StoryreelError::unreadable(
        input,
        "tempo scaling requires the 'media-ffmpeg' feature",
    ))
}

/// Speed `track` up by `factor` with linear-interpolation resampling.
pub fn resample_tempo(track: &AudioTrack, factor: f64) -> StoryreelResult<AudioTrack> {
    validate_factor(factor)?;
    let channels = usize::from(track.channels());
    let src = track.samples();
    let src_frames = track.frames();
    if src_frames == 0 || factor == 1.0 {
        return Ok(track.clone());
    }

    let out_frames = ((src_frames as f64) / factor).round() as usize;
    let mut out = Vec::with_capacity(out_frames * channels);
    for i in 0..out_frames {
        let pos = (i as f64) * factor;
        let f0 = (pos.floor() as usize).min(src_frames - 1);
        let f1 = (f0 + 1).min(src_frames - 1);
        let frac = (pos - f0 as f64).clamp(0.0, 1.0) as f32;
        for c in 0..channels {
            let a = src[f0 * channels + c];
            let b = src[f1 * channels + c];
            out.push(a + (b - a) * frac);
        }
    }
    AudioTrack::new(track.sample_rate(), track.channels(), out)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/tempo.rs"]
mod tests;
