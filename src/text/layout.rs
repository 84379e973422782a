use std::borrow::Cow;

use crate::foundation::error::{ReelError, ReelResult};

/// Width of a single line of text under some font.
pub trait TextMeasure {
    /// Rendered width of `text` laid out on one line, in pixels.
    fn measure(&mut self, text: &str) -> f32;
}

/// Fixed-advance metrics used when no font can be loaded.
#[derive(Clone, Copy, Debug)]
pub struct BuiltinMetrics {
    advance_px: f32,
}

impl BuiltinMetrics {
    pub fn new(size_px: f32) -> Self {
        Self {
            advance_px: size_px * 0.55,
        }
    }
}

impl TextMeasure for BuiltinMetrics {
    fn measure(&mut self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance_px
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl TextBrushRgba8 {
    pub(crate) fn opaque(rgb: [u8; 3]) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a: 255,
        }
    }
}

/// Parley contexts bound to one registered font family and size.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    size_px: f32,
}

impl TextLayoutEngine {
    /// Register `font_bytes` and prepare fresh Parley contexts.
    pub(crate) fn new(font_bytes: &[u8], size_px: f32) -> ReelResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ReelError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            size_px,
        })
    }

    /// Shape `text` as a single unbroken line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let family = self.family_name.clone();
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextMeasure for TextLayoutEngine {
    fn measure(&mut self, text: &str) -> f32 {
        self.layout_line(text, TextBrushRgba8::default()).width()
    }
}

/// How much of a caption a frame shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reveal {
    /// The whole caption, i.e. `chars(caption)` characters.
    All,
    /// The first `n` characters under the per-line accounting of [`reveal_lines`].
    Chars(usize),
}

impl Reveal {
    /// Character budget this reveal grants for `caption`.
    pub fn budget(self, caption: &str) -> usize {
        match self {
            Reveal::All => caption.chars().count(),
            Reveal::Chars(n) => n,
        }
    }
}

/// Greedy word wrap.
///
/// Words are split on single spaces. A word joins the current line while the joined line
/// measures strictly less than `max_width_px`; otherwise the current line is closed (even when it
/// is still empty) and the word starts the next one.
pub fn wrap_words(caption: &str, max_width_px: f32, measure: &mut dyn TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in caption.split(' ') {
        current.push(word);
        if measure.measure(&current.join(" ")) < max_width_px {
            continue;
        }
        current.pop();
        lines.push(current.join(" "));
        current.clear();
        current.push(word);
    }
    lines.push(current.join(" "));
    lines
}

/// Visible prefix of each drawn line under a character `budget`.
///
/// Each line consumes `chars(line) + 1` from the budget, the `+1` standing in for the joining
/// space. Lines after the budget runs out are omitted. Entry `i` is drawn on line slot `i`.
pub fn reveal_lines(lines: &[String], budget: usize) -> Vec<&str> {
    let mut out = Vec::new();
    let mut consumed = 0usize;
    for line in lines {
        if consumed >= budget {
            break;
        }
        out.push(char_prefix(line, budget - consumed));
        consumed += line.chars().count() + 1;
    }
    out
}

fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
