use std::path::{Path, PathBuf};

use crate::assets::media::MediaProbe;
use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Extensions picked up when the clip manifest is auto-populated.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv"];

/// Extensions accepted as background tracks.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aac", "m4a", "ogg"];

/// A validated source clip with a known, positive duration.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MediaClip {
    path: PathBuf,
    duration_secs: f64,
    video_size: Option<(u32, u32)>,
}

impl MediaClip {
    /// Create a clip handle; the duration must be finite and positive.
    pub fn new(path: impl Into<PathBuf>, duration_secs: f64) -> StoryreelResult<Self> {
        let path = path.into();
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(StoryreelError::unreadable(
                path,
                format!("clip duration must be finite and > 0, got {duration_secs}"),
            ));
        }
        Ok(Self {
            path,
            duration_secs,
            video_size: None,
        })
    }

    /// Attach probed video dimensions.
    pub fn with_video_size(mut self, width: u32, height: u32) -> Self {
        self.video_size = Some((width, height));
        self
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Probed `(width, height)`, if known.
    pub fn video_size(&self) -> Option<(u32, u32)> {
        self.video_size
    }
}

/// Resolves manifest references into a validated clip pool.
#[derive(Clone, Debug)]
pub struct AssetCatalog {
    video_dir: PathBuf,
}

impl AssetCatalog {
    /// Create a catalog resolving relative names against `video_dir`.
    pub fn new(video_dir: impl Into<PathBuf>) -> Self {
        Self {
            video_dir: video_dir.into(),
        }
    }

    /// Default asset directory used for relative references.
    pub fn video_dir(&self) -> &Path {
        &self.video_dir
    }

    /// Resolve one manifest entry.
    ///
    /// Absolute paths are used as-is. Relative names prefer the asset directory when the file
    /// exists there and otherwise stay relative to the working directory.
    pub fn resolve_reference(&self, entry: &str) -> PathBuf {
        let p = Path::new(entry);
        if p.is_absolute() {
            return p.to_path_buf();
        }
        let candidate = self.video_dir.join(p);
        if candidate.exists() {
            candidate
        } else {
            p.to_path_buf()
        }
    }

    /// Load the manifest at `manifest_path`, populating it from the asset directory first when it
    /// is absent or empty.
    pub fn load_or_populate_manifest(&self, manifest_path: &Path) -> StoryreelResult<Vec<String>> {
        let entries = read_manifest(manifest_path)?;
        if !entries.is_empty() {
            return Ok(entries);
        }

        let files = list_media_files(&self.video_dir, VIDEO_EXTENSIONS)?;
        let names: Vec<String> = files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        tracing::info!(
            manifest = %manifest_path.display(),
            video_dir = %self.video_dir.display(),
            count = names.len(),
            "populating empty clip manifest from asset directory"
        );

        if let Some(parent) = manifest_path.parent()
            && !parent.as_os_str().is_empty()
        {
            use anyhow::Context as _;
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create manifest directory '{}'", parent.display())
            })?;
        }
        let mut body = names.join("\n");
        if !body.is_empty() {
            body.push('\n');
        }
        std::fs::write(manifest_path, body).map_err(|e| {
            StoryreelError::evaluation(format!(
                "failed to write manifest '{}': {e}",
                manifest_path.display()
            ))
        })?;
        Ok(names)
    }

    /// Probe every reference and keep the readable ones.
    ///
    /// Unreadable, zero-duration and video-less entries are dropped with a warning; an empty
    /// result is [`StoryreelError::NoValidMedia`].
    #[tracing::instrument(skip_all, fields(candidates = entries.len()))]
    pub fn resolve(
        &self,
        entries: &[String],
        probe: &dyn MediaProbe,
    ) -> StoryreelResult<Vec<MediaClip>> {
        let mut pool = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = self.resolve_reference(entry);
            match probe_clip(&path, probe) {
                Ok(clip) => pool.push(clip),
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable clip");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(valid = pool.len(), "clip pool resolved");
        if pool.is_empty() {
            return Err(StoryreelError::no_valid_media(format!(
                "none of the {} listed clips could be read",
                entries.len()
            )));
        }
        Ok(pool)
    }
}

fn probe_clip(path: &Path, probe: &dyn MediaProbe) -> StoryreelResult<MediaClip> {
    let info = probe.probe(path)?;
    let (w, h) = info
        .video_size
        .ok_or_else(|| StoryreelError::unreadable(path, "no video stream"))?;
    Ok(MediaClip::new(path, info.duration_secs)?.with_video_size(w, h))
}

/// Read a newline-delimited manifest.
///
/// Blank lines and `#` comments are ignored. A missing file reads as empty.
pub fn read_manifest(path: &Path) -> StoryreelResult<Vec<String>> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(StoryreelError::evaluation(format!(
                "failed to read manifest '{}': {e}",
                path.display()
            )));
        }
    };
    Ok(parse_manifest(&text))
}

pub(crate) fn parse_manifest(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// List files in `dir` with one of `extensions` (case-insensitive), sorted by file name.
///
/// A missing directory lists as empty.
pub fn list_media_files(dir: &Path, extensions: &[&str]) -> StoryreelResult<Vec<PathBuf>> {
    let rd = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(StoryreelError::evaluation(format!(
                "failed to list '{}': {e}",
                dir.display()
            )));
        }
    };

    let mut out = Vec::new();
    for entry in rd {
        let entry = entry.map_err(|e| {
            StoryreelError::evaluation(format!("failed to list '{}': {e}", dir.display()))
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)));
        if matches {
            out.push(path);
        }
    }
    out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/catalog.rs"]
mod tests;
