//! Immutable render configuration.
//!
//! A [`RenderConfig`] is built once (defaults or JSON) and passed by reference into every stage.
//! Nothing in the crate mutates it after validation.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Typography and colors of the caption region.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyle {
    /// Preferred font file. Falls back to a system sans-serif face when unreadable.
    pub font_path: Option<PathBuf>,
    /// Font size in pixels.
    pub font_size_px: f32,
    /// Horizontal margin on both sides; the wrap budget is `width - 2 * margin`.
    pub margin_px: u32,
    /// Y position of the first line.
    pub offset_y_px: u32,
    /// Distance between consecutive line origins.
    pub line_height_px: u32,
    /// Region background (RGB).
    pub bg_rgb: [u8; 3],
    /// Text fill (RGB).
    pub fg_rgb: [u8; 3],
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_path: Some(PathBuf::from("arial.ttf")),
            font_size_px: 60.0,
            margin_px: 50,
            offset_y_px: 100,
            line_height_px: 80,
            bg_rgb: [20, 20, 20],
            fg_rgb: [255, 255, 255],
        }
    }
}

/// Container and codecs of the encoded output.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputFormat {
    /// File extension without the dot (`mp4`).
    pub extension: String,
    /// ffmpeg video encoder name.
    pub video_codec: String,
    /// ffmpeg audio encoder name.
    pub audio_codec: String,
    /// Output pixel format.
    pub pix_fmt: String,
    /// Overwrite an existing output file.
    pub overwrite: bool,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            extension: "mp4".to_string(),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            pix_fmt: "yuv420p".to_string(),
            overwrite: true,
        }
    }
}

/// Process-wide render constants.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Output frame width in pixels.
    pub width: u32,
    /// Output frame height in pixels.
    pub height: u32,
    /// Height of the image region; the caption region takes the rest.
    pub top_height: u32,
    /// How long each step is shown.
    pub step_duration_secs: f64,
    /// Output frame rate.
    pub fps: Fps,
    /// Share of a step's frames spent typing; the remainder holds the full caption.
    pub typing_fraction: f64,
    /// Caption region styling.
    pub text: TextStyle,
    /// Background behind the step image (RGB).
    pub image_bg_rgb: [u8; 3],
    /// Fill used when a step image is unavailable (RGB).
    pub placeholder_rgb: [u8; 3],
    /// Sample rate used for decoded and fitted background music.
    pub audio_sample_rate: u32,
    /// Eligible image extensions, matched case-insensitively.
    pub image_extensions: Vec<String>,
    /// Eligible music extensions, matched case-insensitively.
    pub music_extensions: Vec<String>,
    /// Encoded output settings.
    pub output: OutputFormat,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            top_height: 1200,
            step_duration_secs: 5.0,
            fps: Fps { num: 24, den: 1 },
            typing_fraction: 0.8,
            text: TextStyle::default(),
            image_bg_rgb: [0, 0, 0],
            placeholder_rgb: [0, 0, 0],
            audio_sample_rate: 48_000,
            image_extensions: ["png", "jpg", "jpeg", "gif", "bmp", "webp"]
                .map(String::from)
                .to_vec(),
            music_extensions: ["mp3", "wav", "aac", "m4a"].map(String::from).to_vec(),
            output: OutputFormat::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ReelError::validation(format!("invalid render config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read render config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("frame width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(ReelError::validation(format!(
                "frame size {}x{} exceeds {} pixels per side",
                self.width,
                self.height,
                u16::MAX
            )));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "frame width/height must be even (required for yuv420p output)",
            ));
        }
        if self.top_height >= self.height {
            return Err(ReelError::validation(
                "top_height must leave a non-empty caption region",
            ));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.step_duration_secs.is_finite() || self.step_duration_secs <= 0.0 {
            return Err(ReelError::validation(
                "step_duration_secs must be finite and > 0",
            ));
        }
        if self.step_frames() == 0 {
            return Err(ReelError::validation(
                "step_duration_secs is shorter than one frame",
            ));
        }
        if !(0.0..=1.0).contains(&self.typing_fraction) {
            return Err(ReelError::validation("typing_fraction must be in [0, 1]"));
        }
        if !self.text.font_size_px.is_finite() || self.text.font_size_px <= 0.0 {
            return Err(ReelError::validation(
                "text font_size_px must be finite and > 0",
            ));
        }
        if self.audio_sample_rate == 0 {
            return Err(ReelError::validation("audio_sample_rate must be non-zero"));
        }
        if self.output.extension.trim().is_empty() || self.output.extension.contains('.') {
            return Err(ReelError::validation(
                "output extension must be a bare, non-empty extension",
            ));
        }
        Ok(())
    }

    /// Height of the caption region.
    pub fn bottom_height(&self) -> u32 {
        self.height.saturating_sub(self.top_height)
    }

    pub fn frame_canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    pub fn top_canvas(&self) -> Canvas {
        Canvas::new(self.width, self.top_height)
    }

    pub fn bottom_canvas(&self) -> Canvas {
        Canvas::new(self.width, self.bottom_height())
    }

    /// Frames per step: `round(step_duration_secs * fps)`.
    pub fn step_frames(&self) -> u64 {
        self.fps.secs_to_frames_round(self.step_duration_secs)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
