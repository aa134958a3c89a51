//! Voronoi interactive view, headless.
//!
//! Starts from random sites, replays scripted clicks and window resizes
//! through the same input path an interactive window would use, and renders
//! every frame. A click adds a site at the clicked point; a resize changes the
//! bounding box. See [`voronoi_cli::script`] for the script format.
//!
//! Run with: `voronoi-view -o out.gif --script clicks.yaml`
//!
//! ## Graceful interruption
//!
//! GIF frames are streamed to disk as they render. Press Ctrl+C to stop early
//! and keep the frames rendered so far.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use voronoi_cli::{frames, load_script, max_size, parse_step, FrameEncoder, OutputFormat, Session};
use voronoi_core::{engine_by_name, random_sites, ClipEngine, GeometryEngine, DEFAULT_SITE_COUNT};

const DEFAULT_WIDTH: u32 = 1000;
const DEFAULT_HEIGHT: u32 = 1000;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EngineKind {
    /// Delaunay-based construction from the voronator crate
    Voronator,
    /// Half-plane clipping
    Clip,
}

impl EngineKind {
    fn name(self) -> &'static str {
        match self {
            EngineKind::Voronator => "voronator",
            EngineKind::Clip => "clip",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "voronoi-view")]
#[command(
    about = "Replay clicks and resizes against a Voronoi diagram and render the frames",
    long_about = None
)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Output file path
    #[arg(short, long)]
    output: PathBuf,

    /// Output format (default: from the output extension, else png)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Initial window width
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height
    #[arg(long)]
    height: Option<u32>,

    /// Number of random starting sites
    #[arg(long)]
    sites: Option<usize>,

    /// Random seed for the starting sites
    #[arg(long)]
    seed: Option<u64>,

    /// Diagram engine
    #[arg(long, value_enum, default_value = "voronator")]
    engine: EngineKind,

    /// Interaction step: click=<x>,<y> | resize=<w>x<h> | hold=<frames>
    #[arg(short = 's', long = "step")]
    step: Vec<String>,

    /// YAML interaction script
    #[arg(long)]
    script: Option<PathBuf>,

    /// Frames per second (GIF frame delay)
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Half-size of the square drawn at each site, in pixels
    #[arg(long, default_value = "1")]
    point_radius: u32,
}

fn make_engine(kind: EngineKind) -> Box<dyn GeometryEngine + Send> {
    match engine_by_name(kind.name()) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::warn!("{}. Falling back to clip engine.", e);
            Box::new(ClipEngine::new())
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Set up SIGINT handler
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        ctrlc::set_handler(move || {
            interrupted.store(true, Ordering::SeqCst);
        })
        .context("failed to set Ctrl-C handler")?;
    }

    let script = args.script.as_deref().map(load_script).transpose()?;

    // CLI args take precedence over script values
    let width = args.width.or(script.as_ref().and_then(|s| s.width)).unwrap_or(DEFAULT_WIDTH);
    let height = args.height.or(script.as_ref().and_then(|s| s.height)).unwrap_or(DEFAULT_HEIGHT);
    let site_count = args
        .sites
        .or(script.as_ref().and_then(|s| s.sites))
        .unwrap_or(DEFAULT_SITE_COUNT);
    let seed = args.seed.or(script.as_ref().and_then(|s| s.seed)).unwrap_or(0);
    if width == 0 || height == 0 {
        anyhow::bail!("window size must be positive, got {}x{}", width, height);
    }

    let mut steps = match &script {
        Some(script) => script.steps()?,
        None => Vec::new(),
    };
    for spec in &args.step {
        steps.push(parse_step(spec)?);
    }

    let format = args
        .format
        .or_else(|| OutputFormat::from_path(&args.output))
        .unwrap_or(OutputFormat::Png);

    let inputs = frames((width, height), &steps);
    let (canvas_w, canvas_h) = max_size(&inputs).unwrap_or((width, height));

    let engine = make_engine(args.engine);
    println!("Using {} engine", engine.name());
    println!("Window {}x{}, {} sites (seed: {})", width, height, site_count, seed);

    let sites = random_sites(site_count, width as f64, height as f64, seed);
    let mut session =
        Session::new(width, height, sites, engine)?.with_point_radius(args.point_radius);
    if format == OutputFormat::Gif {
        // every GIF frame shares one canvas
        session = session.with_canvas(canvas_w, canvas_h);
    }

    let mut encoder = FrameEncoder::create(&args.output, format, canvas_w, canvas_h, args.fps)?;

    println!("Rendering {} frames from {} steps", inputs.len(), steps.len());
    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let render_start = Instant::now();
    let mut frames_rendered: usize = 0;
    let mut clicks_rejected: usize = 0;

    for input in &inputs {
        if interrupted.load(Ordering::Relaxed) {
            progress.abandon_with_message("Interrupted");
            eprintln!(
                "Interrupted after {} of {} frames, finalizing partial output...",
                frames_rendered,
                inputs.len()
            );
            break;
        }

        let (outcome, image) = session.frame(input)?;
        if outcome.clicked.is_some() && !outcome.added {
            tracing::debug!("click on an existing site ignored");
            clicks_rejected += 1;
        }
        encoder.write_frame(image)?;
        frames_rendered += 1;
        progress.inc(1);
    }

    if frames_rendered == 0 {
        eprintln!("No frames rendered.");
        return Ok(());
    }

    if !interrupted.load(Ordering::Relaxed) {
        progress.finish_with_message("Rendering complete");
    }
    encoder.finish()?;

    let state = session.state();
    let partial = if interrupted.load(Ordering::Relaxed) { "partial" } else { "complete" };
    println!(
        "Output saved to: {:?} ({} frames, {})",
        args.output, frames_rendered, partial
    );
    println!(
        "Final diagram: {} sites, {} edges, {}x{} ({} duplicate clicks ignored)",
        state.sites().len(),
        state.geometry().segment_count(),
        state.viewport().width,
        state.viewport().height,
        clicks_rejected
    );
    println!("Render time: {:.1}s", render_start.elapsed().as_secs_f64());
    Ok(())
}
