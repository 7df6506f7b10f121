use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "halfgif", version)]
struct Cli {
    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a half-size copy of an animated GIF.
    Transcode(TranscodeArgs),
    /// Composite one frame and write it as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct TranscodeArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Transcode options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run the downsample pass on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    index: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Write the 2x downsampled canvas instead of the full-size one.
    #[arg(long)]
    half: bool,

    /// Transcode options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Transcode(args) => cmd_transcode(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_opts(path: Option<&Path>) -> anyhow::Result<halfgif::TranscodeOpts> {
    match path {
        Some(path) => Ok(halfgif::TranscodeOpts::from_json_file(path)?),
        None => Ok(halfgif::TranscodeOpts::default()),
    }
}

fn cmd_transcode(args: TranscodeArgs) -> anyhow::Result<()> {
    let mut opts = load_opts(args.config.as_deref())?;
    if args.parallel {
        opts.parallel = true;
    }
    if args.threads.is_some() {
        opts.parallel = true;
        opts.threads = args.threads;
    }

    let stats = halfgif::transcode(&args.in_path, &args.out, &opts)
        .with_context(|| format!("transcode '{}'", args.in_path.display()))?;

    eprintln!(
        "wrote {} ({} frames, {}x{} -> {}x{})",
        args.out.display(),
        stats.frames,
        stats.input_width,
        stats.input_height,
        stats.output_width,
        stats.output_height
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let opts = load_opts(args.config.as_deref())?;

    let mut source = halfgif::GifFileSource::open(&args.in_path)?;
    let mut canvas = halfgif::render_canvas_frame(&mut source, args.index, &opts)?;
    if args.half {
        canvas = halfgif::downsample(&canvas)?;
    }

    halfgif::codec::gif_file::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &canvas.to_rgba8(),
        canvas.width(),
        canvas.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
