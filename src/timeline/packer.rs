use std::collections::HashSet;
use std::path::PathBuf;

use rand::seq::SliceRandom;

use crate::assets::catalog::MediaClip;
use crate::assets::media::MediaProbe;
use crate::foundation::error::{StoryreelError, StoryreelResult};
use crate::foundation::seed::rng_for;
use crate::timeline::model::{Segment, SegmentSource, Timeline};

/// How far before the end of the last segment the freeze-frame still is sampled.
pub const FREEZE_LEAD_SECS: f64 = 0.1;

/// Opens a clip as the packer consumes it, returning the handle with its usable duration.
///
/// Failures marked recoverable skip the clip; anything else aborts packing.
pub trait ClipOpener {
    /// Open `clip` for accumulation.
    fn open(&self, clip: &MediaClip) -> StoryreelResult<MediaClip>;
}

/// Trusts the durations recorded by the catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct CatalogDurations;

impl ClipOpener for CatalogDurations {
    fn open(&self, clip: &MediaClip) -> StoryreelResult<MediaClip> {
        Ok(clip.clone())
    }
}

/// Re-probes each clip when it is reached, so files that vanished or broke since cataloguing
/// are skipped instead of failing at decode time.
pub struct ProbeOpener<'a>(pub &'a dyn MediaProbe);

impl ClipOpener for ProbeOpener<'_> {
    fn open(&self, clip: &MediaClip) -> StoryreelResult<MediaClip> {
        let info = self.0.probe(clip.path())?;
        let mut reopened = MediaClip::new(clip.path(), info.duration_secs)?;
        if let Some((w, h)) = info.video_size.or(clip.video_size()) {
            reopened = reopened.with_video_size(w, h);
        }
        Ok(reopened)
    }
}

/// Pack `pool` into a timeline of exactly `target_secs`, trusting catalogued durations.
pub fn pack(pool: &[MediaClip], target_secs: f64, seed: u64) -> StoryreelResult<Timeline> {
    pack_with_opener(pool, target_secs, seed, &CatalogDurations)
}

/// Pack `pool` into a timeline of exactly `target_secs`.
///
/// The pool is shuffled with `seed`, then clips are appended whole until the next one would
/// reach the target; that one is trimmed from its start to the exact remainder. When the pool
/// runs out first, a single freeze-frame segment covers the shortfall.
#[tracing::instrument(skip(pool, opener), fields(pool = pool.len()))]
pub fn pack_with_opener(
    pool: &[MediaClip],
    target_secs: f64,
    seed: u64,
    opener: &dyn ClipOpener,
) -> StoryreelResult<Timeline> {
    if pool.is_empty() {
        return Err(StoryreelError::no_valid_media("clip pool is empty"));
    }
    if !target_secs.is_finite() || target_secs < 0.0 {
        return Err(StoryreelError::validation(format!(
            "target duration must be finite and >= 0, got {target_secs}"
        )));
    }

    let mut order: Vec<&MediaClip> = pool.iter().collect();
    order.shuffle(&mut rng_for(seed));

    let mut segments: Vec<Segment> = Vec::new();
    let mut used: HashSet<PathBuf> = HashSet::new();
    let mut accumulated = 0.0f64;

    for candidate in order {
        if accumulated >= target_secs {
            break;
        }
        if used.contains(candidate.path()) {
            continue;
        }

        let clip = match opener.open(candidate) {
            Ok(c) => c,
            Err(e) if e.is_recoverable() => {
                tracing::warn!(path = %candidate.path().display(), error = %e, "skipping clip");
                continue;
            }
            Err(e) => return Err(e),
        };
        used.insert(clip.path().to_path_buf());

        let duration = clip.duration_secs();
        let position = segments.len();
        if accumulated + duration < target_secs {
            tracing::debug!(path = %clip.path().display(), duration, "added clip");
            segments.push(Segment {
                source: SegmentSource::Clip { clip },
                in_secs: 0.0,
                out_secs: duration,
                position,
            });
            accumulated += duration;
        } else {
            // Rounding can leave the remainder a few ULP past the clip's end.
            let remaining = (target_secs - accumulated).min(duration);
            tracing::debug!(path = %clip.path().display(), remaining, "added final clip");
            segments.push(Segment {
                source: SegmentSource::Clip { clip },
                in_secs: 0.0,
                out_secs: remaining,
                position,
            });
            accumulated = target_secs;
        }
    }

    if accumulated < target_secs {
        let shortfall = target_secs - accumulated;
        let last = segments.last().ok_or_else(|| {
            StoryreelError::no_valid_media("every clip in the pool failed to open")
        })?;
        let at_secs = (last.out_secs - FREEZE_LEAD_SECS).max(last.in_secs);
        tracing::info!(shortfall, "pool exhausted, padding with freeze frame");
        let freeze = Segment {
            source: SegmentSource::Freeze {
                clip: last.clip().clone(),
                at_secs,
            },
            in_secs: 0.0,
            out_secs: shortfall,
            position: segments.len(),
        };
        segments.push(freeze);
    }

    tracing::info!(segments = segments.len(), target_secs, "timeline packed");
    Ok(Timeline::new(segments, seed, target_secs))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/packer.rs"]
mod tests;
