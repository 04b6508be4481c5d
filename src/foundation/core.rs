use crate::foundation::error::{StoryreelError, StoryreelResult};

pub use kurbo::Point;

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> StoryreelResult<Self> {
        if den == 0 {
            return Err(StoryreelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(StoryreelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Presentation time of frame `idx` in seconds.
    pub fn frame_to_secs(self, idx: FrameIndex) -> f64 {
        (idx.0 as f64) * self.frame_duration_secs()
    }

    /// Convert seconds to a frame boundary, rounding to the nearest frame.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 24, den: 1 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas suitable for yuv420p encoding (non-zero, even dimensions).
    pub fn new(width: u32, height: u32) -> StoryreelResult<Self> {
        if width == 0 || height == 0 {
            return Err(StoryreelError::validation("canvas must be non-empty"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(StoryreelError::validation(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        Ok(Self { width, height })
    }

    /// Round arbitrary probed dimensions down to the nearest valid canvas.
    pub fn even_floor(width: u32, height: u32) -> StoryreelResult<Self> {
        Self::new(width & !1, height & !1)
    }

    /// Number of bytes of a tightly packed RGBA8 frame.
    pub fn rgba_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Straight-alpha RGBA8 color, used for caption style presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB components.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> StoryreelResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| StoryreelError::validation(format!("color '{s}' must start with '#'")))?;
        let channel = |i: usize| -> StoryreelResult<u8> {
            hex.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| StoryreelError::validation(format!("invalid hex color '{s}'")))
        };
        match hex.len() {
            6 => Ok(Self::opaque(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => Err(StoryreelError::validation(format!(
                "invalid hex color '{s}'"
            ))),
        }
    }

    /// Premultiplied RGBA8 bytes.
    pub fn premul(self) -> [u8; 4] {
        let a16 = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a16) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
