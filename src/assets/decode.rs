use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// Decoded raster image in straight-alpha RGBA8.
#[derive(Clone)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major straight-alpha RGBA8.
    pub rgba8: Vec<u8>,
}

impl std::fmt::Debug for PreparedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Decode encoded image bytes (any format the `image` crate recognizes) to RGBA8.
pub fn decode_image(bytes: &[u8]) -> ReelResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ReelError::validation("decoded image has zero size"));
    }
    Ok(PreparedImage {
        width,
        height,
        rgba8: rgba.into_raw(),
    })
}

/// Height an image takes when scaled to `target_width` with its aspect ratio preserved.
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let h = (f64::from(height) * f64::from(target_width) / f64::from(width.max(1))).round();
    (h as u32).max(1)
}

/// Resize to exactly `target_width` pixels wide, preserving aspect ratio.
pub fn scale_to_width(img: &PreparedImage, target_width: u32) -> ReelResult<PreparedImage> {
    if target_width == 0 {
        return Err(ReelError::validation("target width must be non-zero"));
    }
    let target_height = scaled_height(img.width, img.height, target_width);
    resize_rows(img, 0, img.height, target_width, target_height)
}

/// The rows of an image scaled to `target_width` that fall inside a `window_height` tall region
/// when the image is centered vertically in it.
#[derive(Clone, Debug)]
pub struct WindowSlice {
    pub image: PreparedImage,
    /// Top of the slice within the window; negative only when nothing was cropped.
    pub y: i64,
}

/// Scale `img` to `target_width` and center it in a `window_height` tall window, resizing only
/// the source rows that end up visible.
pub fn scale_into_window(
    img: &PreparedImage,
    target_width: u32,
    window_height: u32,
) -> ReelResult<WindowSlice> {
    if target_width == 0 || window_height == 0 {
        return Err(ReelError::validation("target window must be non-empty"));
    }
    let full_h = i64::from(scaled_height(img.width, img.height, target_width));
    let window_h = i64::from(window_height);
    let top = (window_h - full_h).div_euclid(2);

    // Visible rows of the scaled image.
    let v0 = (-top).max(0);
    let v1 = (window_h - top).min(full_h);
    if v0 == 0 && v1 == full_h {
        return Ok(WindowSlice {
            image: scale_to_width(img, target_width)?,
            y: top,
        });
    }

    let src_h = f64::from(img.height);
    let scale = src_h / full_h as f64;
    let s0 = ((v0 as f64 * scale).floor() as u32).min(img.height - 1);
    let s1 = ((v1 as f64 * scale).ceil() as u32).clamp(s0 + 1, img.height);
    let rows = u32::try_from(v1 - v0)
        .map_err(|_| ReelError::validation("visible image slice is empty"))?;
    Ok(WindowSlice {
        image: resize_rows(img, s0, s1, target_width, rows)?,
        y: top + v0,
    })
}

/// Resize source rows `y0..y1` to `width x height`.
fn resize_rows(
    img: &PreparedImage,
    y0: u32,
    y1: u32,
    width: u32,
    height: u32,
) -> ReelResult<PreparedImage> {
    if y0 == 0 && y1 == img.height && img.width == width && img.height == height {
        return Ok(img.clone());
    }
    let src = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
        img.width,
        img.height,
        img.rgba8.as_slice(),
    )
    .ok_or_else(|| ReelError::validation("image byte length does not match dimensions"))?;
    let rows = image::imageops::crop_imm(&src, 0, y0, img.width, y1 - y0);
    let resized = image::imageops::resize(
        &*rows,
        width,
        height,
        image::imageops::FilterType::Lanczos3,
    );
    Ok(PreparedImage {
        width,
        height,
        rgba8: resized.into_raw(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
