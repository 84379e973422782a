use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{blend_channel, mul_div255_u16};

/// An opaque RGB8 raster, tightly packed, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes.
    pub data: Vec<u8>,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Frame {
    /// A frame filled with one color.
    pub fn solid(canvas: Canvas, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(canvas.rgb_len());
        for _ in 0..(canvas.width as usize * canvas.height as usize) {
            data.extend_from_slice(&rgb);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    /// Composite a same-sized premultiplied RGBA8 buffer over this frame.
    pub fn composite_premul_rgba8(&mut self, rgba: &[u8]) -> ReelResult<()> {
        let expected = (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4);
        if rgba.len() != expected {
            return Err(ReelError::render(format!(
                "rgba buffer has {} bytes, expected {expected} for {}x{}",
                rgba.len(),
                self.width,
                self.height
            )));
        }
        for (dst, src) in self.data.chunks_exact_mut(3).zip(rgba.chunks_exact(4)) {
            let inv = 255 - u16::from(src[3]);
            for c in 0..3 {
                let v = u16::from(src[c]) + mul_div255_u16(u16::from(dst[c]), inv);
                dst[c] = v.min(255) as u8;
            }
        }
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Color at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Copy `src` with its top-left corner at `(x, y)`; parts outside `self` are clipped.
    pub fn blit(&mut self, src: &Frame, x: i64, y: i64) {
        let Some(span) = ClipSpan::new(self.canvas(), src.canvas(), x, y) else {
            return;
        };
        let row_bytes = span.w * 3;
        for row in 0..span.h {
            let s = ((span.src_y + row) * src.width as usize + span.src_x) * 3;
            let d = ((span.dst_y + row) * self.width as usize + span.dst_x) * 3;
            self.data[d..d + row_bytes].copy_from_slice(&src.data[s..s + row_bytes]);
        }
    }

    /// Alpha-blend a straight-alpha RGBA8 image with its top-left corner at `(x, y)`.
    pub fn blend_rgba8(
        &mut self,
        rgba: &[u8],
        width: u32,
        height: u32,
        x: i64,
        y: i64,
    ) -> ReelResult<()> {
        if rgba.len() != (width as usize) * (height as usize) * 4 {
            return Err(ReelError::render(
                "rgba overlay byte length does not match its dimensions",
            ));
        }
        let Some(span) = ClipSpan::new(self.canvas(), Canvas::new(width, height), x, y) else {
            return Ok(());
        };
        for row in 0..span.h {
            for col in 0..span.w {
                let s = ((span.src_y + row) * width as usize + span.src_x + col) * 4;
                let d = ((span.dst_y + row) * self.width as usize + span.dst_x + col) * 3;
                let a = rgba[s + 3];
                for c in 0..3 {
                    self.data[d + c] = blend_channel(rgba[s + c], self.data[d + c], a);
                }
            }
        }
        Ok(())
    }

    /// Write the frame as a PNG.
    pub fn save_png(&self, path: &Path) -> ReelResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Overlap of a source rectangle placed at `(x, y)` with a destination.
struct ClipSpan {
    dst_x: usize,
    dst_y: usize,
    src_x: usize,
    src_y: usize,
    w: usize,
    h: usize,
}

impl ClipSpan {
    fn new(dst: Canvas, src: Canvas, x: i64, y: i64) -> Option<Self> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(src.width)).min(i64::from(dst.width));
        let y1 = (y + i64::from(src.height)).min(i64::from(dst.height));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            dst_x: x0 as usize,
            dst_y: y0 as usize,
            src_x: (x0 - x) as usize,
            src_y: (y0 - y) as usize,
            w: (x1 - x0) as usize,
            h: (y1 - y0) as usize,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/frame.rs"]
mod tests;
