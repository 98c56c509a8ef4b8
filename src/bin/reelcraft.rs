use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "reelcraft", version)]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame at one timeline time as a PNG.
    Frame(FrameArgs),
    /// Record the whole timeline as a numbered PNG sequence.
    Capture(CaptureArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input job JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Timeline time in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CaptureArgs {
    /// Input job JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving `frame_NNNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Pace frames against the wall clock instead of rendering as fast as possible.
    #[arg(long)]
    realtime: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Capture(args) => cmd_capture(args),
    }
}

fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_job(path: &Path) -> anyhow::Result<reelcraft::LoadedJob> {
    let job = reelcraft::JobConfig::from_path(path)
        .with_context(|| format!("read job '{}'", path.display()))?;
    let loaded = job
        .load()
        .with_context(|| format!("load media for job '{}'", path.display()))?;
    Ok(loaded)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let job = load_job(&args.in_path)?;
    let state = job.render_state();

    let mut compositor = reelcraft::Compositor::new();
    let sample = reelcraft::RenderSample::at(args.time, job.canvas);
    let frame = compositor.render_frame(&sample, &state)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    reelcraft::encode::png::write_png(&args.out, &frame)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    println!("fingerprint={:016x}", frame.fingerprint());
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_capture(args: CaptureArgs) -> anyhow::Result<()> {
    let job = load_job(&args.in_path)?;
    let state = job.render_state();

    let interval = 1.0 / job.fps;
    let mut ticks: Box<dyn reelcraft::TickSource> = if args.realtime {
        Box::new(reelcraft::RealtimeTicks::new(interval))
    } else {
        Box::new(reelcraft::SimulatedTicks::steady(interval))
    };
    let mut sink = reelcraft::PngSequenceSink::new(&args.out_dir);
    let mut session = reelcraft::PlaybackSession::new(job.canvas);

    let report = session.run_capture(&state, job.fps, ticks.as_mut(), &mut sink)?;
    if !report.completed {
        anyhow::bail!(
            "capture stopped after {} of {} frames",
            report.frames,
            report.total_frames
        );
    }

    eprintln!(
        "wrote {} frames to {}",
        sink.written(),
        args.out_dir.display()
    );
    Ok(())
}
