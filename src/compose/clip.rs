use std::sync::Arc;

use crate::compose::frame::Frame;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::text::layout::Reveal;
use crate::text::render::TextFrameRenderer;

/// An immutable, timed sequence of equally sized frames.
///
/// Clips describe frames rather than hold them: typing sequences, stacks and concatenations are
/// rendered one index at a time by [`Clip::render_frame`].
#[derive(Clone)]
pub struct Clip {
    fps: Fps,
    canvas: Canvas,
    len_frames: u64,
    node: Arc<ClipNode>,
}

enum ClipNode {
    Still(Arc<Frame>),
    Frames(Vec<Arc<Frame>>),
    Typing(TypingTrack),
    Stack(Vec<Layer>),
    Concat { clips: Vec<Clip>, starts: Vec<u64> },
}

struct TypingTrack {
    caption: String,
    /// Character budget per frame.
    reveal: Vec<usize>,
}

struct Layer {
    clip: Clip,
    y: i64,
}

impl std::fmt::Debug for Clip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.node.as_ref() {
            ClipNode::Still(_) => "still",
            ClipNode::Frames(_) => "frames",
            ClipNode::Typing(_) => "typing",
            ClipNode::Stack(_) => "stack",
            ClipNode::Concat { .. } => "concat",
        };
        f.debug_struct("Clip")
            .field("kind", &kind)
            .field("canvas", &self.canvas)
            .field("fps", &self.fps)
            .field("len_frames", &self.len_frames)
            .finish()
    }
}

impl Clip {
    /// Hold one frame for `len_frames` frames.
    pub fn still(frame: Frame, len_frames: u64, fps: Fps) -> Self {
        Self {
            fps,
            canvas: frame.canvas(),
            len_frames,
            node: Arc::new(ClipNode::Still(Arc::new(frame))),
        }
    }

    /// One clip frame per given frame; all frames must share a size.
    pub fn from_frames(frames: Vec<Frame>, fps: Fps) -> ReelResult<Self> {
        let canvas = frames
            .first()
            .map(Frame::canvas)
            .ok_or_else(|| ReelError::render("frame list must be non-empty"))?;
        if frames.iter().any(|f| f.canvas() != canvas) {
            return Err(ReelError::render("frame list mixes frame sizes"));
        }
        Ok(Self {
            fps,
            canvas,
            len_frames: frames.len() as u64,
            node: Arc::new(ClipNode::Frames(frames.into_iter().map(Arc::new).collect())),
        })
    }

    /// Caption frames rendered on demand; frame `i` shows `reveal[i]` characters.
    pub(crate) fn typing(caption: &str, canvas: Canvas, reveal: Vec<usize>, fps: Fps) -> Self {
        Self {
            fps,
            canvas,
            len_frames: reveal.len() as u64,
            node: Arc::new(ClipNode::Typing(TypingTrack {
                caption: caption.to_owned(),
                reveal,
            })),
        }
    }

    /// Place clips of equal length and rate on a `canvas`, each at `(0, y)`.
    ///
    /// Later layers paint over earlier ones; pixels no layer covers are black.
    pub fn stack(canvas: Canvas, layers: Vec<(Clip, i64)>) -> ReelResult<Self> {
        let (first, _) = layers
            .first()
            .ok_or_else(|| ReelError::render("stack needs at least one layer"))?;
        let (fps, len_frames) = (first.fps, first.len_frames);
        if layers
            .iter()
            .any(|(c, _)| c.fps != fps || c.len_frames != len_frames)
        {
            return Err(ReelError::render(
                "stacked clips must share frame rate and length",
            ));
        }
        Ok(Self {
            fps,
            canvas,
            len_frames,
            node: Arc::new(ClipNode::Stack(
                layers.into_iter().map(|(clip, y)| Layer { clip, y }).collect(),
            )),
        })
    }

    /// Play clips back to back. All clips must share size and frame rate.
    pub fn concat(clips: Vec<Clip>) -> ReelResult<Self> {
        let first = clips
            .first()
            .ok_or_else(|| ReelError::render("concat needs at least one clip"))?;
        let (fps, canvas) = (first.fps, first.canvas);
        let mut starts = Vec::with_capacity(clips.len());
        let mut len_frames = 0u64;
        for c in &clips {
            if c.fps != fps || c.canvas != canvas {
                return Err(ReelError::render(
                    "concatenated clips must share frame size and rate",
                ));
            }
            starts.push(len_frames);
            len_frames += c.len_frames;
        }
        Ok(Self {
            fps,
            canvas,
            len_frames,
            node: Arc::new(ClipNode::Concat { clips, starts }),
        })
    }

    pub fn len_frames(&self) -> u64 {
        self.len_frames
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.len_frames)
    }

    /// Materialize frame `index`.
    pub fn render_frame(
        &self,
        index: FrameIndex,
        text: &mut TextFrameRenderer,
    ) -> ReelResult<Arc<Frame>> {
        let i = index.0;
        if i >= self.len_frames {
            return Err(ReelError::render(format!(
                "frame {i} out of range for clip of {} frames",
                self.len_frames
            )));
        }
        match self.node.as_ref() {
            ClipNode::Still(frame) => Ok(Arc::clone(frame)),
            ClipNode::Frames(frames) => Ok(Arc::clone(&frames[i as usize])),
            ClipNode::Typing(track) => text.render_shared(
                &track.caption,
                self.canvas.width,
                self.canvas.height,
                Reveal::Chars(track.reveal[i as usize]),
            ),
            ClipNode::Stack(layers) => {
                let mut out = Frame::solid(self.canvas, [0, 0, 0]);
                for layer in layers {
                    let f = layer.clip.render_frame(index, text)?;
                    out.blit(&f, 0, layer.y);
                }
                Ok(Arc::new(out))
            }
            ClipNode::Concat { clips, starts } => {
                let k = starts.partition_point(|&s| s <= i) - 1;
                clips[k].render_frame(FrameIndex(i - starts[k]), text)
            }
        }
    }

    /// Render every frame in order, handing each to `f`.
    pub fn for_each_frame(
        &self,
        text: &mut TextFrameRenderer,
        mut f: impl FnMut(FrameIndex, &Frame) -> ReelResult<()>,
    ) -> ReelResult<()> {
        for i in 0..self.len_frames {
            let idx = FrameIndex(i);
            let frame = self.render_frame(idx, text)?;
            f(idx, &frame)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/clip.rs"]
mod tests;
