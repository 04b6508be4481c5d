use crate::foundation::core::Canvas;
use crate::foundation::error::{StoryreelError, StoryreelResult};
use crate::foundation::math::src_over_premul;

/// A frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the `premultiplied` flag makes that explicit at API
/// boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent frame.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.rgba_len()],
            premultiplied: true,
        }
    }

    /// Wrap decoded bytes, checking the length.
    pub fn from_rgba8(canvas: Canvas, data: Vec<u8>) -> StoryreelResult<Self> {
        if data.len() != canvas.rgba_len() {
            return Err(StoryreelError::evaluation(format!(
                "frame buffer has {} bytes, expected {} for {}x{}",
                data.len(),
                canvas.rgba_len(),
                canvas.width,
                canvas.height
            )));
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        })
    }

    /// Source-over `src` (premultiplied, `src_w`x`src_h`) with its top-left at `(x, y)`.
    ///
    /// Parts falling outside the frame are clipped.
    pub fn blit_over(&mut self, src: &[u8], src_w: u32, src_h: u32, x: i64, y: i64) {
        let (fw, fh) = (i64::from(self.width), i64::from(self.height));
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(src_w)).min(fw);
        let y1 = (y + i64::from(src_h)).min(fh);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let sw = src_w as usize;
        for dy in y0..y1 {
            let sy = (dy - y) as usize;
            for dx in x0..x1 {
                let sx = (dx - x) as usize;
                let si = (sy * sw + sx) * 4;
                let di = ((dy as usize) * (self.width as usize) + dx as usize) * 4;
                src_over_premul(&mut self.data[di..di + 4], &src[si..si + 4]);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/frame.rs"]
mod tests;
