//! One video per job: compose every step, pick and fit a soundtrack, stream frames to a sink.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rand::Rng;
use rand::seq::IndexedRandom as _;

use crate::assets::catalog::MediaCatalog;
use crate::audio::fit::{apply_fit, frame_to_sample};
use crate::audio::pcm::{decode_audio_f32_stereo, write_f32le_file};
use crate::compose::clip::Clip;
use crate::compose::step::StepComposer;
use crate::config::RenderConfig;
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig, SinkFactory};
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::VideoJob;
use crate::text::render::TextFrameRenderer;

/// Builds and encodes the video of one [`VideoJob`].
pub struct VideoAssembler<'a> {
    cfg: &'a RenderConfig,
    catalog: &'a dyn MediaCatalog,
    sinks: &'a dyn SinkFactory,
}

impl<'a> VideoAssembler<'a> {
    pub fn new(
        cfg: &'a RenderConfig,
        catalog: &'a dyn MediaCatalog,
        sinks: &'a dyn SinkFactory,
    ) -> Self {
        Self {
            cfg,
            catalog,
            sinks,
        }
    }

    /// All steps composed and concatenated in order; `None` for a job without steps.
    pub fn compose_job(&self, job: &VideoJob, image_dir: &Path) -> ReelResult<Option<Clip>> {
        if job.is_empty() {
            return Ok(None);
        }
        let composer = StepComposer::new(self.cfg, self.catalog);
        let clips = job
            .steps
            .iter()
            .map(|step| composer.compose(step, image_dir))
            .collect::<ReelResult<Vec<_>>>()?;
        Clip::concat(clips).map(Some)
    }

    /// Pick a music track uniformly at random; `None` when there is nothing to pick.
    pub fn select_track<R: Rng + ?Sized>(&self, music_dir: &Path, rng: &mut R) -> Option<PathBuf> {
        let tracks = match self.catalog.list(music_dir, &self.cfg.music_extensions) {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::warn!(dir = %music_dir.display(), error = %e, "music directory unreadable; rendering without audio");
                return None;
            }
        };
        let choice = tracks.choose(rng).cloned();
        if choice.is_none() {
            tracing::info!(dir = %music_dir.display(), "no music tracks found; rendering without audio");
        }
        choice
    }

    /// Decode `track`, fit it to `video_frames` at `fps` and write it to a scratch PCM file.
    pub fn prepare_audio(
        &self,
        track: &Path,
        video_frames: u64,
        fps: Fps,
    ) -> ReelResult<tempfile::NamedTempFile> {
        let sample_rate = self.cfg.audio_sample_rate;
        // Tracks longer than the video are only needed up to its end; the extra second keeps
        // them decoding longer than the target so they are still trimmed, never looped.
        let limit = fps.frames_to_secs(video_frames) + 1.0;
        let pcm = decode_audio_f32_stereo(track, sample_rate, Some(limit))?;
        let fitted = apply_fit(&pcm, frame_to_sample(video_frames, fps, sample_rate))?;

        let file = tempfile::Builder::new()
            .prefix("stepreel-audio-")
            .suffix(".f32le")
            .tempfile()
            .context("create audio scratch file")?;
        write_f32le_file(&fitted.interleaved_f32, file.path())?;
        Ok(file)
    }

    /// Render `job` into `sink`. Returns the number of frames written, or `None` for an empty job
    /// (in which case the sink is never started).
    #[tracing::instrument(skip_all, fields(video = %job.video_name))]
    pub fn assemble_into<R: Rng + ?Sized>(
        &self,
        job: &VideoJob,
        image_dir: &Path,
        music_dir: &Path,
        text: &mut TextFrameRenderer,
        sink: &mut dyn FrameSink,
        rng: &mut R,
    ) -> ReelResult<Option<u64>> {
        let Some(clip) = self.compose_job(job, image_dir)? else {
            tracing::info!("job has no steps; nothing to render");
            return Ok(None);
        };

        let audio_file = self.select_track(music_dir, rng).and_then(|track| {
            match self.prepare_audio(&track, clip.len_frames(), clip.fps()) {
                Ok(file) => {
                    tracing::info!(track = %track.display(), "using background music");
                    Some(file)
                }
                Err(e) => {
                    tracing::warn!(track = %track.display(), error = %e, "music track unusable; rendering without audio");
                    None
                }
            }
        });

        let canvas = clip.canvas();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: clip.fps(),
            audio: audio_file.as_ref().map(|f| AudioInputConfig {
                path: f.path().to_path_buf(),
                sample_rate: self.cfg.audio_sample_rate,
                channels: 2,
            }),
        })?;
        clip.for_each_frame(text, |idx, frame| sink.push_frame(idx, frame))?;
        sink.end()?;

        // The scratch PCM file must outlive the encoder.
        drop(audio_file);
        Ok(Some(clip.len_frames()))
    }

    /// Render `job` to `<output_dir>/<video_name>.<ext>`.
    ///
    /// Returns `None` without touching the filesystem when the job has no steps.
    #[tracing::instrument(skip_all, fields(video = %job.video_name))]
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        job: &VideoJob,
        image_dir: &Path,
        music_dir: &Path,
        output_dir: &Path,
        text: &mut TextFrameRenderer,
        rng: &mut R,
    ) -> ReelResult<Option<PathBuf>> {
        if job.is_empty() {
            tracing::info!("job has no steps; nothing to render");
            return Ok(None);
        }
        let out = output_path_for(output_dir, &job.video_name, &self.cfg.output.extension)?;
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("create output directory '{}'", output_dir.display()))?;

        let existed = out.exists();
        let mut sink = self.sinks.create(&out)?;
        match self.assemble_into(job, image_dir, music_dir, text, sink.as_mut(), rng) {
            Ok(Some(frames)) => {
                tracing::info!(frames, out = %out.display(), "video written");
                Ok(Some(out))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                drop(sink);
                if !existed && out.exists() {
                    let _ = std::fs::remove_file(&out);
                }
                Err(e)
            }
        }
    }
}

/// `<output_dir>/<video_name>.<extension>`, refusing names that are not plain file names.
pub fn output_path_for(output_dir: &Path, video_name: &str, extension: &str) -> ReelResult<PathBuf> {
    let plain = !video_name.trim().is_empty()
        && video_name != "."
        && video_name != ".."
        && !video_name.contains(['/', '\\', '\0']);
    if !plain {
        return Err(ReelError::validation(format!(
            "video name {video_name:?} is not a plain file name"
        )));
    }
    Ok(output_dir.join(format!("{video_name}.{extension}")))
}

#[cfg(test)]
#[path = "../tests/unit/assemble.rs"]
mod tests;
