use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Well-known bold display fonts tried after the configured and bundled ones.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts/Impact.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/impact.ttf",
    "/Library/Fonts/Impact.ttf",
    "/System/Library/Fonts/Supplemental/Impact.ttf",
    "C:\\Windows\\Fonts\\impact.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Arial_Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
];

/// Raw bytes of the font captions are drawn with.
#[derive(Clone, Debug)]
pub struct CaptionFont {
    /// File the font was loaded from.
    pub path: PathBuf,
    /// Font file bytes.
    pub bytes: Arc<Vec<u8>>,
}

/// Ordered fallback chain: configured font, bundled `fonts/impact.ttf`, then system fonts.
pub fn font_candidates(configured: Option<&Path>, assets_dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(p) = configured {
        out.push(p.to_path_buf());
    }
    out.push(assets_dir.join("fonts").join("impact.ttf"));
    out.extend(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from));
    out
}

/// Load the first readable font of the fallback chain.
pub fn load_caption_font(configured: Option<&Path>, assets_dir: &Path) -> StoryreelResult<CaptionFont> {
    load_first_font(&font_candidates(configured, assets_dir))
}

pub(crate) fn load_first_font(candidates: &[PathBuf]) -> StoryreelResult<CaptionFont> {
    for path in candidates {
        match std::fs::read(path) {
            Ok(bytes) if !bytes.is_empty() => {
                tracing::debug!(font = %path.display(), "caption font selected");
                return Ok(CaptionFont {
                    path: path.clone(),
                    bytes: Arc::new(bytes),
                });
            }
            Ok(_) => tracing::debug!(font = %path.display(), "skipping empty font file"),
            Err(_) => continue,
        }
    }
    Err(StoryreelError::missing_asset(format!(
        "no caption font found (tried {} locations)",
        candidates.len()
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
