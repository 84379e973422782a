use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use stepreel::{MediaCatalog as _, Reveal};

#[derive(Parser, Debug)]
#[command(name = "stepreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one video per VideoName in an input table (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single caption-region frame as a PNG.
    Frame(FrameArgs),
    /// List the eligible image and music files.
    Inputs(InputsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input table: a JSON array of objects with VideoName, Step, ImageFile and Text.
    #[arg(long)]
    table: PathBuf,

    /// Directory holding the step images.
    #[arg(long)]
    images: PathBuf,

    /// Directory holding background music.
    #[arg(long)]
    music: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Render config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base seed for music selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Render videos in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads when --parallel is set.
    #[arg(long)]
    threads: Option<usize>,

    /// Abort on the first failing video instead of continuing.
    #[arg(long)]
    fail_fast: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Caption text.
    #[arg(long)]
    text: String,

    /// Number of revealed characters; the whole caption when omitted.
    #[arg(long)]
    chars: Option<usize>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Render config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InputsArgs {
    /// Directory holding the step images.
    #[arg(long)]
    images: PathBuf,

    /// Directory holding background music.
    #[arg(long)]
    music: PathBuf,

    /// Render config JSON (for the extension lists).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Inputs(args) => cmd_inputs(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<stepreel::RenderConfig> {
    match path {
        Some(p) => Ok(stepreel::RenderConfig::from_path(p)?),
        None => Ok(stepreel::RenderConfig::default()),
    }
}

fn read_table(path: &Path) -> anyhow::Result<Vec<stepreel::InputRow>> {
    let f = File::open(path).with_context(|| format!("open table '{}'", path.display()))?;
    let rows: Vec<stepreel::InputRow> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse table '{}' as a JSON array of objects", path.display()))?;
    Ok(rows)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let rows = read_table(&args.table)?;

    let mut opts = stepreel::BatchOpts::new(args.images, args.music);
    opts.seed = args.seed;
    opts.parallel = args.parallel;
    opts.threads = args.threads;
    if args.fail_fast {
        opts.policy = stepreel::FailurePolicy::FailFast;
    }

    let runner = stepreel::BatchRunner::new(cfg, opts)?;
    let report = runner.run(&rows, &args.out)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.failures.is_empty() {
        anyhow::bail!("{} video(s) failed", report.failures.len());
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let mut renderer = stepreel::TextFrameRenderer::new(&cfg.text);
    let reveal = args.chars.map_or(Reveal::All, Reveal::Chars);
    let region = cfg.bottom_canvas();
    let frame = renderer.render(&args.text, region.width, region.height, reveal)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_inputs(args: InputsArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let catalog = stepreel::FsCatalog;
    let names = |paths: Vec<PathBuf>| -> Vec<String> {
        paths
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect()
    };

    let listing = serde_json::json!({
        "images": names(catalog.list(&args.images, &cfg.image_extensions)?),
        "music": names(catalog.list(&args.music, &cfg.music_extensions)?),
    });
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}
