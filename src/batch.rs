//! Batch entry point: validate a table, group it into jobs and render every job.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng as _;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::assemble::VideoAssembler;
use crate::assets::catalog::{FsCatalog, MediaCatalog};
use crate::assets::fonts::{FontFace, resolve_font};
use crate::config::RenderConfig;
use crate::encode::ffmpeg::FfmpegSinkFactory;
use crate::encode::sink::SinkFactory;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::fnv1a64_str;
use crate::model::{InputRow, VideoJob, group_jobs, steps_from_rows};
use crate::text::render::TextFrameRenderer;

/// What a batch does when one job fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FailurePolicy {
    /// Record the failure and keep rendering the remaining jobs.
    #[default]
    Isolate,
    /// Stop at the first failing job and return its error.
    FailFast,
}

/// Inputs and execution options of a batch.
#[derive(Clone, Debug)]
pub struct BatchOpts {
    pub image_dir: PathBuf,
    pub music_dir: PathBuf,
    pub policy: FailurePolicy,
    /// Render jobs concurrently on a dedicated rayon pool.
    pub parallel: bool,
    /// Pool size when `parallel`; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Base seed for music selection. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl BatchOpts {
    pub fn new(image_dir: impl Into<PathBuf>, music_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            music_dir: music_dir.into(),
            policy: FailurePolicy::default(),
            parallel: false,
            threads: None,
            seed: None,
        }
    }
}

/// A job that produced no video under [`FailurePolicy::Isolate`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct JobFailure {
    pub video_name: String,
    pub error: String,
}

/// Result of a batch: written videos in group order, plus isolated failures.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchReport {
    pub outputs: Vec<PathBuf>,
    pub failures: Vec<JobFailure>,
}

/// Renders one video per distinct `VideoName` in an input table.
pub struct BatchRunner {
    cfg: RenderConfig,
    opts: BatchOpts,
    catalog: Arc<dyn MediaCatalog>,
    sinks: Arc<dyn SinkFactory>,
    font: Option<FontFace>,
}

impl BatchRunner {
    /// A runner reading media from the filesystem and encoding with `ffmpeg`.
    pub fn new(cfg: RenderConfig, opts: BatchOpts) -> ReelResult<Self> {
        cfg.validate()?;
        if opts.threads == Some(0) {
            return Err(ReelError::validation("threads must be > 0"));
        }
        let sinks = Arc::new(FfmpegSinkFactory::new(cfg.output.clone()));
        Ok(Self {
            cfg,
            opts,
            catalog: Arc::new(FsCatalog),
            sinks,
            font: None,
        })
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn MediaCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_sink_factory(mut self, sinks: Arc<dyn SinkFactory>) -> Self {
        self.sinks = sinks;
        self
    }

    /// Use `font` instead of resolving the configured font at run time.
    pub fn with_font(mut self, font: FontFace) -> Self {
        self.font = Some(font);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    /// Validate `rows`, group them by video and render each group into `output_dir`.
    ///
    /// A structurally invalid table fails before anything is rendered.
    pub fn run(&self, rows: &[InputRow], output_dir: &Path) -> ReelResult<BatchReport> {
        let steps = steps_from_rows(rows)?;
        let jobs = group_jobs(steps);
        tracing::info!(rows = rows.len(), jobs = jobs.len(), "input table validated");
        self.run_jobs(&jobs, output_dir)
    }

    /// Render already grouped jobs.
    pub fn run_jobs(&self, jobs: &[VideoJob], output_dir: &Path) -> ReelResult<BatchReport> {
        let font = match &self.font {
            Some(font) => font.clone(),
            None => resolve_font(self.cfg.text.font_path.as_deref()),
        };
        let fail_fast = self.opts.policy == FailurePolicy::FailFast;
        let abort = AtomicBool::new(false);

        let run_one = |job: &VideoJob| -> Option<ReelResult<Option<PathBuf>>> {
            if fail_fast && abort.load(Ordering::Relaxed) {
                return None;
            }
            let res = self.run_job(job, output_dir, &font);
            if fail_fast && res.is_err() {
                abort.store(true, Ordering::Relaxed);
            }
            Some(res)
        };

        let results: Vec<Option<ReelResult<Option<PathBuf>>>> = if self.opts.parallel {
            let pool = build_thread_pool(self.opts.threads)?;
            pool.install(|| jobs.par_iter().map(run_one).collect())
        } else {
            jobs.iter().map(run_one).collect()
        };

        let mut report = BatchReport::default();
        for (job, res) in jobs.iter().zip(results) {
            match res {
                None => {}
                Some(Ok(Some(path))) => report.outputs.push(path),
                Some(Ok(None)) => {}
                Some(Err(e)) if fail_fast => return Err(e),
                Some(Err(e)) => {
                    tracing::error!(video = %job.video_name, error = %e, "video failed; continuing with the rest of the batch");
                    report.failures.push(JobFailure {
                        video_name: job.video_name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        tracing::info!(
            outputs = report.outputs.len(),
            failures = report.failures.len(),
            "batch finished"
        );
        Ok(report)
    }

    #[tracing::instrument(skip_all, fields(video = %job.video_name))]
    fn run_job(
        &self,
        job: &VideoJob,
        output_dir: &Path,
        font: &FontFace,
    ) -> ReelResult<Option<PathBuf>> {
        let mut text = TextFrameRenderer::with_font(&self.cfg.text, font.clone());
        let mut rng = self.job_rng(&job.video_name);
        VideoAssembler::new(&self.cfg, self.catalog.as_ref(), self.sinks.as_ref()).assemble(
            job,
            &self.opts.image_dir,
            &self.opts.music_dir,
            output_dir,
            &mut text,
            &mut rng,
        )
    }

    /// Per-job generator; seeded runs do not depend on job scheduling.
    fn job_rng(&self, video_name: &str) -> StdRng {
        match self.opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ fnv1a64_str(video_name)),
            None => StdRng::from_os_rng(),
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/batch.rs"]
mod tests;
