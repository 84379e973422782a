use crate::compose::clip::Clip;
use crate::config::RenderConfig;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Builds typing-effect clips: the caption appears character by character over the first part of
/// the clip and then holds fully revealed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypingSequenceBuilder {
    typing_fraction: f64,
}

impl TypingSequenceBuilder {
    pub fn new(typing_fraction: f64) -> Self {
        Self { typing_fraction }
    }

    pub fn from_config(cfg: &RenderConfig) -> Self {
        Self::new(cfg.typing_fraction)
    }

    /// `round(duration_secs * fps)`.
    pub fn total_frames(duration_secs: f64, fps: Fps) -> u64 {
        fps.secs_to_frames_round(duration_secs)
    }

    /// `floor(total * typing_fraction)`.
    pub fn typing_frames(&self, total: u64) -> u64 {
        // The epsilon absorbs binary rounding of fractions such as 0.29.
        let t = (total as f64 * self.typing_fraction + 1e-9).floor();
        (t.max(0.0) as u64).min(total)
    }

    /// Characters visible on each of `total` frames for a caption of `caption_chars` characters.
    pub fn reveal_schedule(&self, caption_chars: usize, total: u64) -> Vec<usize> {
        let typing = self.typing_frames(total);
        (0..total)
            .map(|f| {
                if f < typing {
                    (caption_chars as u128 * u128::from(f) / u128::from(typing)) as usize
                } else {
                    caption_chars
                }
            })
            .collect()
    }

    /// A clip of `round(duration_secs * fps)` caption frames of `width x height`; durations
    /// shorter than half a frame give an empty clip.
    pub fn build(
        &self,
        caption: &str,
        duration_secs: f64,
        width: u32,
        height: u32,
        fps: Fps,
    ) -> ReelResult<Clip> {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(ReelError::validation(
                "typing duration must be finite and >= 0",
            ));
        }
        if width == 0 || height == 0 {
            return Err(ReelError::render("typing region must be non-empty"));
        }
        let total = Self::total_frames(duration_secs, fps);
        let reveal = self.reveal_schedule(caption.chars().count(), total);
        Ok(Clip::typing(
            caption,
            Canvas::new(width, height),
            reveal,
            fps,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/typing.rs"]
mod tests;
