use super::*;
use crate::text::layout::TextMeasure as _;

fn small_style() -> TextStyle {
    TextStyle {
        font_path: None,
        font_size_px: 10.0,
        margin_px: 5,
        offset_y_px: 4,
        line_height_px: 12,
        bg_rgb: [20, 20, 20],
        fg_rgb: [255, 255, 255],
    }
}

#[test]
fn builtin_renderer_draws_background_only() {
    let mut r = TextFrameRenderer::with_font(&small_style(), FontFace::Builtin);
    assert!(!r.draws_glyphs());
    let f = r.render("hello world", 40, 30, Reveal::All).unwrap();
    assert_eq!((f.width, f.height), (40, 30));
    assert!(f.data.chunks_exact(3).all(|px| px == [20, 20, 20]));
}

#[test]
fn wrap_uses_margins_and_is_memoized() {
    let mut r = TextFrameRenderer::with_font(&small_style(), FontFace::Builtin);
    // Advance is 5.5px; budget is 60 - 2 * 5 = 50px, so at most 9 chars per line.
    let a = r.wrap("aaaa bbbb cccc", 60);
    assert_eq!(a.as_slice(), ["aaaa bbbb", "cccc"]);
    let b = r.wrap("aaaa bbbb cccc", 60);
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn repeated_reveal_reuses_last_frame() {
    let mut r = TextFrameRenderer::with_font(&small_style(), FontFace::Builtin);
    let a = r.render_shared("one two", 40, 20, Reveal::Chars(3)).unwrap();
    let b = r.render_shared("one two", 40, 20, Reveal::Chars(3)).unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    // Budgets past the end collapse onto the same frame.
    let c = r.render_shared("one two", 40, 20, Reveal::Chars(1000)).unwrap();
    let d = r.render_shared("one two", 40, 20, Reveal::Chars(2000)).unwrap();
    assert!(Arc::ptr_eq(&c, &d));
}

#[test]
fn empty_region_is_rejected() {
    let mut r = TextFrameRenderer::with_font(&small_style(), FontFace::Builtin);
    assert!(r.render("x", 0, 10, Reveal::All).is_err());
}

#[test]
fn real_font_draws_revealed_text_only() {
    let mut style = small_style();
    style.font_size_px = 16.0;
    style.line_height_px = 20;
    style.offset_y_px = 2;
    let mut r = TextFrameRenderer::new(&style);
    if !r.draws_glyphs() {
        return;
    }

    let blank = r.render("Hello", 120, 40, Reveal::Chars(0)).unwrap();
    assert!(blank.data.chunks_exact(3).all(|px| px == [20, 20, 20]));

    let full = r.render("Hello", 120, 40, Reveal::All).unwrap();
    assert!(full.data.chunks_exact(3).any(|px| px[0] > 128));
}

/// Bounding box `(x0, y0, x1, y1)` of text pixels in rows `rows`, inclusive.
fn ink_bbox(frame: &Frame, rows: std::ops::Range<u32>) -> Option<(u32, u32, u32, u32)> {
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for y in rows {
        for x in 0..frame.width {
            if frame.pixel(x, y)[0] <= 100 {
                continue;
            }
            bbox = Some(match bbox {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bbox
}

fn measured(r: &mut TextFrameRenderer, line: &str) -> f32 {
    match &mut r.shaper {
        Shaper::Font { engine, .. } => engine.measure(line),
        Shaper::Builtin(metrics) => metrics.measure(line),
    }
}

fn glyph_style() -> TextStyle {
    TextStyle {
        font_size_px: 16.0,
        margin_px: 5,
        offset_y_px: 4,
        line_height_px: 24,
        ..small_style()
    }
}

#[test]
fn full_line_spans_its_measured_width_from_the_margin() {
    let style = glyph_style();
    let mut r = TextFrameRenderer::new(&style);
    if !r.draws_glyphs() {
        return;
    }

    let frame = r.render("Hello world", 400, 40, Reveal::All).unwrap();
    let (x0, y0, x1, y1) = ink_bbox(&frame, 0..40).unwrap();
    let width = measured(&mut r, "Hello world");

    assert!((5..=9).contains(&x0), "left edge {x0}");
    let inked = (x1 - x0 + 1) as f32;
    assert!(inked > 3.0 * style.font_size_px, "ink width {inked}");
    assert!(inked > 0.7 * width && inked <= width + 2.0, "ink {inked} vs layout {width}");
    assert!(y0 >= 4, "top {y0}");
    assert!(y1 < 4 + 24, "bottom {y1}");
}

#[test]
fn wrapped_lines_land_in_their_own_bands() {
    let style = glyph_style();
    let mut r = TextFrameRenderer::new(&style);
    if !r.draws_glyphs() {
        return;
    }

    let caption = "aaaa bbbb cccc dddd";
    let lines = r.wrap(caption, 100);
    assert!(lines.len() >= 2, "{lines:?}");
    let height = 4 + 24 * lines.len() as u32 + 4;
    let frame = r.render(caption, 100, height, Reveal::All).unwrap();

    assert!(ink_bbox(&frame, 0..4).is_none());
    for (i, line) in lines.iter().enumerate() {
        let band = 4 + 24 * i as u32..4 + 24 * (i as u32 + 1);
        let (x0, _, x1, _) = ink_bbox(&frame, band).unwrap_or_else(|| panic!("line {i} missing"));
        assert!((5..=9).contains(&x0), "line {i} left edge {x0}");
        let inked = (x1 - x0 + 1) as f32;
        assert!(inked > 0.7 * measured(&mut r, line), "line {i} ink width {inked}");
    }
}
