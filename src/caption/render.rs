use crate::assets::fonts::CaptionFont;
use crate::caption::animator::CaptionOverlay;
use crate::compose::frame::FrameRGBA;
use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Caption font size as a fraction of frame height.
pub const FONT_SIZE_FRAC: f32 = 0.08;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: Option<String>,
    blob_id: Option<u64>,
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            family_name: None,
            blob_id: None,
        }
    }

    /// Register `font_bytes` once and remember its family name.
    fn register(&mut self, font_bytes: &[u8]) -> StoryreelResult<String> {
        if let Some(name) = &self.family_name {
            return Ok(name.clone());
        }
        let blob = parley::fontique::Blob::from(font_bytes.to_vec());
        let blob_id = blob.id();
        let families = self.font_ctx.collection.register_fonts(blob, None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| StoryreelError::missing_asset("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| StoryreelError::missing_asset("registered font family has no name"))?
            .to_string();
        self.family_name = Some(name.clone());
        self.blob_id = Some(blob_id);
        Ok(name)
    }

    /// `true` when a shaped run's font data is the registered caption font and not a fallback.
    pub(crate) fn is_caption_font(&self, font_blob_id: u64) -> bool {
        self.blob_id == Some(font_blob_id)
    }

    /// Shape and lay out a single unwrapped line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> StoryreelResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(StoryreelError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let family_name = self.register(font_bytes)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// A rasterized caption word cropped to its ink bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionSprite {
    /// Ink-box width in pixels.
    pub width: u32,
    /// Ink-box height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major.
    pub data: Vec<u8>,
}

impl CaptionSprite {
    /// Top-left pixel that puts the ink-box centre on `center`.
    pub fn origin_for(&self, center: Point) -> (i64, i64) {
        (
            (center.x - f64::from(self.width) / 2.0).round() as i64,
            (center.y - f64::from(self.height) / 2.0).round() as i64,
        )
    }

    /// Composite onto `frame` with the ink-box centre at `center`.
    pub fn draw_onto(&self, frame: &mut FrameRGBA, center: Point) {
        let (x, y) = self.origin_for(center);
        frame.blit_over(&self.data, self.width, self.height, x, y);
    }
}

/// Rasterizes caption overlays with one font at a fixed size.
pub struct CaptionRenderer {
    engine: TextLayoutEngine,
    font: CaptionFont,
    font_data: vello_cpu::peniko::FontData,
    font_size_px: f32,
}

impl CaptionRenderer {
    /// Renderer for `canvas`, sizing text at 8% of its height.
    pub fn new(font: CaptionFont, canvas: Canvas) -> Self {
        let font_data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
            0,
        );
        Self {
            engine: TextLayoutEngine::new(),
            font,
            font_data,
            font_size_px: (canvas.height as f32) * FONT_SIZE_FRAC,
        }
    }

    /// Font size in pixels.
    pub fn font_size_px(&self) -> f32 {
        self.font_size_px
    }

    /// Draw the outlined word and crop it to its ink box.
    ///
    /// The outline is the word stamped in the stroke color at every integer offset within the
    /// stroke radius, with the fill drawn once on top.
    pub fn rasterize(&mut self, overlay: &CaptionOverlay) -> StoryreelResult<CaptionSprite> {
        let style = overlay.style;
        let layout = self.engine.layout_line(
            &overlay.word,
            &self.font.bytes,
            self.font_size_px,
            TextBrushRgba8::from(style.fill),
        )?;

        let mut glyphs = Vec::new();
        let mut fill = style.fill;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                if !self.engine.is_caption_font(run.run().font().data.id()) {
                    return Err(StoryreelError::render(format!(
                        "'{}' needs a fallback font; only '{}' is drawn",
                        overlay.word,
                        self.font.path.display()
                    )));
                }
                let brush = run.style().brush;
                fill = Rgba8 {
                    r: brush.r,
                    g: brush.g,
                    b: brush.b,
                    a: brush.a,
                };
                for g in run.positioned_glyphs() {
                    if g.id == 0 {
                        return Err(StoryreelError::render(format!(
                            "font '{}' has no glyph for a character of '{}'",
                            self.font.path.display(),
                            overlay.word
                        )));
                    }
                    glyphs.push(vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                }
            }
        }
        if glyphs.is_empty() {
            return Err(StoryreelError::render(format!(
                "caption '{}' produced no glyphs",
                overlay.word
            )));
        }

        let stroke = style.stroke_width as i32;
        let pad = stroke as f32 + (self.font_size_px * 0.25).ceil();
        let w = (layout.width() + 2.0 * pad).ceil();
        let h = (layout.height() + 2.0 * pad).ceil();
        if !(1.0..=f32::from(u16::MAX)).contains(&w) || !(1.0..=f32::from(u16::MAX)).contains(&h) {
            return Err(StoryreelError::render(format!(
                "caption '{}' does not fit a {w}x{h} pixmap",
                overlay.word
            )));
        }
        let (w, h) = (w as u16, h as u16);

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        let stamp = |ctx: &mut vello_cpu::RenderContext, dx: i32, dy: i32, c: Rgba8| {
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(pad) + f64::from(dx),
                f64::from(pad) + f64::from(dy),
            )));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
            ctx.glyph_run(&self.font_data)
                .font_size(self.font_size_px)
                .fill_glyphs(glyphs.iter().copied());
        };
        for dy in -stroke..=stroke {
            for dx in -stroke..=stroke {
                if dx != 0 || dy != 0 {
                    stamp(&mut ctx, dx, dy, style.stroke);
                }
            }
        }
        stamp(&mut ctx, 0, 0, fill);

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        crop_to_ink(pixmap.data_as_u8_slice(), u32::from(w), u32::from(h)).ok_or_else(|| {
            StoryreelError::render(format!("caption '{}' rendered no ink", overlay.word))
        })
    }
}

/// Crop premultiplied RGBA to the tight box of non-transparent pixels.
pub(crate) fn crop_to_ink(data: &[u8], width: u32, height: u32) -> Option<CaptionSprite> {
    let (w, h) = (width as usize, height as usize);
    let (mut x0, mut y0, mut x1, mut y1) = (w, h, 0usize, 0usize);
    for y in 0..h {
        for x in 0..w {
            if data[(y * w + x) * 4 + 3] != 0 {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x + 1);
                y1 = y1.max(y + 1);
            }
        }
    }
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    let cw = x1 - x0;
    let mut out = Vec::with_capacity(cw * (y1 - y0) * 4);
    for y in y0..y1 {
        let row = (y * w + x0) * 4;
        out.extend_from_slice(&data[row..row + cw * 4]);
    }
    Some(CaptionSprite {
        width: cw as u32,
        height: (y1 - y0) as u32,
        data: out,
    })
}

/// The overlay alone on a transparent frame at time `t`.
///
/// Pure in `(overlay, sprite, t, canvas)`; inactive overlays give an empty frame.
pub fn render_overlay_frame(
    overlay: &CaptionOverlay,
    sprite: &CaptionSprite,
    t: f64,
    canvas: Canvas,
) -> FrameRGBA {
    let mut frame = FrameRGBA::transparent(canvas);
    if overlay.is_active(t) {
        sprite.draw_onto(&mut frame, overlay.position_at(t));
    }
    frame
}

/// Rasterize every overlay, dropping the ones that fail to render.
#[tracing::instrument(skip_all, fields(overlays = overlays.len()))]
pub fn rasterize_all(
    renderer: &mut CaptionRenderer,
    overlays: Vec<CaptionOverlay>,
) -> Vec<(CaptionOverlay, CaptionSprite)> {
    let mut out = Vec::with_capacity(overlays.len());
    for overlay in overlays {
        match renderer.rasterize(&overlay) {
            Ok(sprite) => out.push((overlay, sprite)),
            Err(e) => {
                tracing::warn!(word = %overlay.word, index = overlay.index, error = %e, "caption skipped");
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/caption/render.rs"]
mod tests;
