//! stepreel turns a table of captioned steps into short vertical videos.
//!
//! Each distinct `VideoName` in the input becomes one video. Every step shows its image in the
//! top region while its caption types itself out in the bottom region, and an optional music
//! track is looped or trimmed to the video length.
//!
//! - Build a [`RenderConfig`] (defaults or JSON)
//! - Create a [`BatchRunner`] and call [`BatchRunner::run`] with the input rows
//! - Or drive single videos through [`VideoAssembler`] and any [`FrameSink`]
#![forbid(unsafe_code)]

mod foundation;

/// Video assembly for a single job.
pub mod assemble;
/// Image/music catalogs, image decoding and font resolution.
pub mod assets;
/// Background music decoding and fitting.
pub mod audio;
/// Batch grouping, policies and parallelism.
pub mod batch;
/// Frames, clips, typing sequences and step composition.
pub mod compose;
/// Render configuration.
pub mod config;
/// Frame sinks and the `ffmpeg` encoder.
pub mod encode;
/// Input rows, steps and jobs.
pub mod model;
/// Caption wrapping, reveal and rasterization.
pub mod text;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assemble::{VideoAssembler, output_path_for};
pub use crate::assets::catalog::{FsCatalog, MediaCatalog};
pub use crate::assets::fonts::{FontFace, resolve_font};
pub use crate::audio::fit::{AudioFit, apply_fit, fit};
pub use crate::batch::{BatchOpts, BatchReport, BatchRunner, FailurePolicy, JobFailure};
pub use crate::compose::clip::Clip;
pub use crate::compose::frame::Frame;
pub use crate::compose::step::StepComposer;
pub use crate::compose::typing::TypingSequenceBuilder;
pub use crate::config::{OutputFormat, RenderConfig, TextStyle};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkFactory, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{
    AudioInputConfig, FrameSink, InMemorySink, SinkConfig, SinkFactory,
};
pub use crate::model::{InputRow, Step, VideoJob, group_jobs, steps_from_rows};
pub use crate::text::layout::Reveal;
pub use crate::text::render::TextFrameRenderer;
