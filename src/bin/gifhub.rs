use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{ArgAction, CommandFactory as _, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "gifhub",
    version,
    about = "Generate a GIF from a GitHub user's yearly activity overview"
)]
struct Cli {
    /// GitHub handle to render.
    subject: Option<String>,

    /// Years to include: `all`, or a comma separated list such as `2016,2017`.
    #[arg(short, long, default_value = "all")]
    years: String,

    /// Output directory for `<subject>.gif`.
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,

    /// Display time of each frame in milliseconds.
    #[arg(short, long, default_value_t = 1000)]
    delay: u64,

    /// Resize factor applied to every frame.
    #[arg(short, long, default_value_t = 1.0)]
    scale: f64,

    /// SVG rasterizer.
    #[arg(long, value_enum, default_value_t = RasterizerChoice::Resvg)]
    rasterizer: RasterizerChoice,

    /// GIF encoder.
    #[arg(long, value_enum, default_value_t = EncoderChoice::Gif)]
    encoder: EncoderChoice,

    /// Also write `<subject>.json` describing the run.
    #[arg(long)]
    manifest: bool,

    /// Keep temporary SVG/PNG files instead of deleting them.
    #[arg(long)]
    keep_temp: bool,

    /// More log output (`-v` debug, `-vv` trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RasterizerChoice {
    /// In-process `resvg`.
    Resvg,
    /// The `rsvg-convert` command.
    RsvgConvert,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EncoderChoice {
    /// In-process GIF encoder.
    Gif,
    /// The `ffmpeg` command with a generated palette.
    Ffmpeg,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(subject) = cli.subject.as_deref() else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };
    let subject = gifhub::Subject::new(subject)?;

    let opts = gifhub::PipelineOpts {
        periods: gifhub::PeriodSelection::parse(&cli.years)
            .with_context(|| format!("invalid --years '{}'", cli.years))?,
        out_dir: cli.out_dir.clone(),
        bundle: gifhub::BundleOpts {
            frame_duration: Duration::from_millis(cli.delay),
            scale: cli.scale,
        },
        keep_temp: cli.keep_temp,
        ..gifhub::PipelineOpts::default()
    };

    let artifacts = Arc::new(gifhub::ArtifactLog::new());
    let source = gifhub::HttpSource::new(gifhub::HttpSourceOpts::default())?;
    let rasterizer: Box<dyn gifhub::Rasterizer> = match cli.rasterizer {
        RasterizerChoice::Resvg => Box::new(gifhub::ResvgRasterizer::new()),
        RasterizerChoice::RsvgConvert => {
            Box::new(gifhub::RsvgConvertRasterizer::new(Arc::clone(&artifacts))?)
        }
    };
    let bundler: Box<dyn gifhub::FrameBundler> = match cli.encoder {
        EncoderChoice::Gif => Box::new(gifhub::GifBundler::default()),
        EncoderChoice::Ffmpeg => Box::new(gifhub::FfmpegBundler::new(Arc::clone(&artifacts))),
    };

    let services = gifhub::Services {
        source: &source,
        rasterizer: rasterizer.as_ref(),
        bundler: bundler.as_ref(),
        artifacts: &artifacts,
    };
    let manifest = gifhub::render_subject(services, &subject, &opts)
        .with_context(|| format!("failed to render activity GIF for '{subject}'"))?;

    if cli.manifest {
        let path = gifhub::write_manifest(&opts.out_dir, &manifest)?;
        tracing::info!(path = %path.display(), "wrote manifest");
    }

    println!("Created: {}", manifest.output.display());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gifhub={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
