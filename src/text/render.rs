use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::fonts::{FontFace, resolve_font};
use crate::compose::frame::Frame;
use crate::config::TextStyle;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::text::layout::{
    BuiltinMetrics, Reveal, TextBrushRgba8, TextLayoutEngine, reveal_lines, wrap_words,
};

enum Shaper {
    Font {
        engine: TextLayoutEngine,
        font: vello_cpu::peniko::FontData,
    },
    /// No glyphs are drawn; wrapping uses fixed advances.
    Builtin(BuiltinMetrics),
}

#[derive(Clone, PartialEq, Eq)]
struct FrameKey {
    caption: String,
    width: u32,
    height: u32,
    budget: usize,
}

/// Draws captions, fully or partially revealed, onto solid caption-region frames.
///
/// Wrapped lines are memoized per `(caption, width)` and the most recent frame is reused when the
/// same reveal is requested again, so a typing sequence rasterizes each distinct prefix once.
pub struct TextFrameRenderer {
    style: TextStyle,
    shaper: Shaper,
    wrap_cache: HashMap<(String, u32), Arc<Vec<String>>>,
    last: Option<(FrameKey, Arc<Frame>)>,
}

impl std::fmt::Debug for TextFrameRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextFrameRenderer")
            .field("builtin", &matches!(self.shaper, Shaper::Builtin(_)))
            .field("cached_wraps", &self.wrap_cache.len())
            .finish_non_exhaustive()
    }
}

impl TextFrameRenderer {
    /// Resolve the style's font (with fallbacks) and build a renderer.
    pub fn new(style: &TextStyle) -> Self {
        Self::with_font(style, resolve_font(style.font_path.as_deref()))
    }

    /// Build a renderer around an already resolved font.
    pub fn with_font(style: &TextStyle, face: FontFace) -> Self {
        let shaper = match face {
            FontFace::Loaded(loaded) => match TextLayoutEngine::new(&loaded.bytes, style.font_size_px)
            {
                Ok(engine) => Shaper::Font {
                    engine,
                    font: vello_cpu::peniko::FontData::new(
                        vello_cpu::peniko::Blob::from(loaded.bytes.as_ref().clone()),
                        loaded.index,
                    ),
                },
                Err(e) => {
                    tracing::warn!(family = %loaded.family, error = %e, "font rejected by shaper; using built-in metrics");
                    Shaper::Builtin(BuiltinMetrics::new(style.font_size_px))
                }
            },
            FontFace::Builtin => Shaper::Builtin(BuiltinMetrics::new(style.font_size_px)),
        };
        Self {
            style: style.clone(),
            shaper,
            wrap_cache: HashMap::new(),
            last: None,
        }
    }

    /// Whether glyphs are actually drawn (false under built-in metrics).
    pub fn draws_glyphs(&self) -> bool {
        matches!(self.shaper, Shaper::Font { .. })
    }

    /// Wrapped lines of `caption` for a region `width` pixels wide.
    pub fn wrap(&mut self, caption: &str, width: u32) -> Arc<Vec<String>> {
        let key = (caption.to_owned(), width);
        if let Some(lines) = self.wrap_cache.get(&key) {
            return Arc::clone(lines);
        }
        let budget = width.saturating_sub(self.style.margin_px.saturating_mul(2)) as f32;
        let lines = Arc::new(match &mut self.shaper {
            Shaper::Font { engine, .. } => wrap_words(caption, budget, engine),
            Shaper::Builtin(metrics) => wrap_words(caption, budget, metrics),
        });
        self.wrap_cache.insert(key, Arc::clone(&lines));
        lines
    }

    /// Render `caption` into a `width x height` frame showing `reveal` of it.
    pub fn render(
        &mut self,
        caption: &str,
        width: u32,
        height: u32,
        reveal: Reveal,
    ) -> ReelResult<Frame> {
        Ok(self.render_shared(caption, width, height, reveal)?.as_ref().clone())
    }

    pub(crate) fn render_shared(
        &mut self,
        caption: &str,
        width: u32,
        height: u32,
        reveal: Reveal,
    ) -> ReelResult<Arc<Frame>> {
        if width == 0 || height == 0 {
            return Err(ReelError::render("text region must be non-empty"));
        }
        let lines = self.wrap(caption, width);
        // Budgets past the end of the last line all draw the same frame.
        let exhausted: usize = lines.iter().map(|l| l.chars().count() + 1).sum();
        let key = FrameKey {
            caption: caption.to_owned(),
            width,
            height,
            budget: reveal.budget(caption).min(exhausted),
        };
        if let Some((last_key, frame)) = &self.last
            && *last_key == key
        {
            return Ok(Arc::clone(frame));
        }

        let drawn = reveal_lines(&lines, key.budget);
        let frame = Arc::new(self.rasterize(&drawn, width, height)?);
        self.last = Some((key, Arc::clone(&frame)));
        Ok(frame)
    }

    fn rasterize(&mut self, lines: &[&str], width: u32, height: u32) -> ReelResult<Frame> {
        let mut frame = Frame::solid(Canvas::new(width, height), self.style.bg_rgb);
        let Shaper::Font { engine, font } = &mut self.shaper else {
            return Ok(frame);
        };
        if lines.iter().all(|l| l.is_empty()) {
            return Ok(frame);
        }

        let w16: u16 = width
            .try_into()
            .map_err(|_| ReelError::render("text region width exceeds u16"))?;
        let h16: u16 = height
            .try_into()
            .map_err(|_| ReelError::render("text region height exceeds u16"))?;

        let brush = TextBrushRgba8::opaque(self.style.fg_rgb);
        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        for (slot, text) in lines.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let y = f64::from(self.style.offset_y_px)
                + slot as f64 * f64::from(self.style.line_height_px);
            if y >= f64::from(height) {
                break;
            }
            let layout = engine.layout_line(text, brush);
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(self.style.margin_px),
                y,
            )));
            draw_layout(&mut ctx, &layout, font);
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        frame.composite_premul_rgba8(pixmap.data_as_u8_slice())?;
        Ok(frame)
    }
}

fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    font: &vello_cpu::peniko::FontData,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            // Positioned glyphs carry the run offset and the line baseline, so the layout's
            // top-left corner lands on the transform origin.
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/render.rs"]
mod tests;
