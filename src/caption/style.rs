use crate::foundation::core::Rgba8;

/// Named caption look.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleKind {
    /// White on black.
    Normal,
    /// Gold on orange-red.
    Highlight,
    /// Tomato on dark red.
    Emphasis,
}

/// Fill/stroke colors and outline width of a caption word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CaptionStyle {
    /// Preset this style came from.
    pub kind: StyleKind,
    /// Text fill.
    pub fill: Rgba8,
    /// Outline color.
    pub stroke: Rgba8,
    /// Outline radius in pixels.
    pub stroke_width: u32,
}

impl CaptionStyle {
    /// White fill, black 3 px outline.
    pub const NORMAL: Self = Self {
        kind: StyleKind::Normal,
        fill: Rgba8::opaque(0xFF, 0xFF, 0xFF),
        stroke: Rgba8::opaque(0x00, 0x00, 0x00),
        stroke_width: 3,
    };

    /// `#FFD700` fill, `#FF4500` 4 px outline.
    pub const HIGHLIGHT: Self = Self {
        kind: StyleKind::Highlight,
        fill: Rgba8::opaque(0xFF, 0xD7, 0x00),
        stroke: Rgba8::opaque(0xFF, 0x45, 0x00),
        stroke_width: 4,
    };

    /// `#FF6347` fill, `#8B0000` 5 px outline.
    pub const EMPHASIS: Self = Self {
        kind: StyleKind::Emphasis,
        fill: Rgba8::opaque(0xFF, 0x63, 0x47),
        stroke: Rgba8::opaque(0x8B, 0x00, 0x00),
        stroke_width: 5,
    };

    /// Preset for `kind`.
    pub fn preset(kind: StyleKind) -> Self {
        match kind {
            StyleKind::Normal => Self::NORMAL,
            StyleKind::Highlight => Self::HIGHLIGHT,
            StyleKind::Emphasis => Self::EMPHASIS,
        }
    }
}

/// Style of the `index`-th eligible word: every 7th emphasised, else every 4th highlighted.
pub fn style_for_index(index: usize) -> StyleKind {
    if index.is_multiple_of(7) {
        StyleKind::Emphasis
    } else if index.is_multiple_of(4) {
        StyleKind::Highlight
    } else {
        StyleKind::Normal
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/style.rs"]
mod tests;
