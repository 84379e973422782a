use std::path::Path;

use crate::assets::catalog::{MediaCatalog, resolve_in_dir};
use crate::assets::decode::{decode_image, scale_into_window};
use crate::compose::clip::Clip;
use crate::compose::frame::Frame;
use crate::compose::typing::TypingSequenceBuilder;
use crate::config::RenderConfig;
use crate::foundation::error::ReelResult;
use crate::model::Step;

/// Turns one [`Step`] into a full-size clip: the step image on top, its typed caption below.
pub struct StepComposer<'a> {
    cfg: &'a RenderConfig,
    catalog: &'a dyn MediaCatalog,
    typing: TypingSequenceBuilder,
}

impl<'a> StepComposer<'a> {
    pub fn new(cfg: &'a RenderConfig, catalog: &'a dyn MediaCatalog) -> Self {
        Self {
            cfg,
            catalog,
            typing: TypingSequenceBuilder::from_config(cfg),
        }
    }

    /// Compose `step`, reading its image from `image_dir`.
    ///
    /// An unusable image never fails the step; the image region becomes a placeholder instead.
    #[tracing::instrument(skip_all, fields(video = %step.video_name, order = step.order))]
    pub fn compose(&self, step: &Step, image_dir: &Path) -> ReelResult<Clip> {
        let cfg = self.cfg;
        let bottom = cfg.bottom_canvas();
        let text = self.typing.build(
            &step.caption,
            cfg.step_duration_secs,
            bottom.width,
            bottom.height,
            cfg.fps,
        )?;
        let image = Clip::still(
            self.image_region(&step.image_reference, image_dir),
            text.len_frames(),
            cfg.fps,
        );
        Clip::stack(
            cfg.frame_canvas(),
            vec![(image, 0), (text, i64::from(cfg.top_height))],
        )
    }

    /// The top region for `image_reference`: the image scaled to the frame width and centered
    /// vertically, or a solid placeholder when the image cannot be used.
    pub fn image_region(&self, image_reference: &str, image_dir: &Path) -> Frame {
        let top = self.cfg.top_canvas();
        let placeholder = || Frame::solid(top, self.cfg.placeholder_rgb);

        let path = match resolve_in_dir(image_dir, image_reference) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(image = image_reference, error = %e, "unusable image reference; using placeholder");
                return placeholder();
            }
        };
        if !self.catalog.exists(&path) {
            tracing::warn!(image = %path.display(), "image not found; using placeholder");
            return placeholder();
        }
        let slice = self
            .catalog
            .read(&path)
            .and_then(|bytes| decode_image(&bytes))
            .and_then(|img| scale_into_window(&img, top.width, top.height));
        let slice = match slice {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(image = %path.display(), error = %e, "image could not be decoded; using placeholder");
                return placeholder();
            }
        };

        let img = &slice.image;
        let mut region = Frame::solid(top, self.cfg.image_bg_rgb);
        match region.blend_rgba8(&img.rgba8, img.width, img.height, 0, slice.y) {
            Ok(()) => region,
            Err(e) => {
                tracing::warn!(image = %path.display(), error = %e, "image could not be placed; using placeholder");
                placeholder()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/step.rs"]
mod tests;
