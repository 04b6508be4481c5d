use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "storyreel", version, about = "Assemble a captioned story video")]
struct Cli {
    /// JSON pipeline config. Missing fields use defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline and write an MP4 (requires `ffmpeg`/`ffprobe` on PATH).
    Render(RenderArgs),
    /// Validate the clip pool and print the packed timeline as JSON.
    Plan(PlanArgs),
    /// Report which assets and tools are available.
    Check,
    /// Render one caption word over a transparent frame as a PNG.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct Overrides {
    /// Asset root directory.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Clip manifest path.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Narration speed-up factor.
    #[arg(long)]
    tempo: Option<f64>,

    /// Output frames per second.
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Narration audio file.
    #[arg(long)]
    narration: PathBuf,

    /// Word-level transcript JSON.
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Run seed. Drawn at random and logged when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Skip captions.
    #[arg(long, default_value_t = false)]
    no_captions: bool,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Target duration in seconds.
    #[arg(long, conflicts_with = "narration", required_unless_present = "narration")]
    duration: Option<f64>,

    /// Derive the target from this narration after tempo scaling.
    #[arg(long)]
    narration: Option<PathBuf>,

    /// Run seed.
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Word to draw.
    #[arg(long)]
    word: String,

    /// Position of the word among captions; picks its style.
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Time into the word's one-second window.
    #[arg(long, default_value_t = 1.0)]
    t: f64,

    /// Frame width.
    #[arg(long, default_value_t = 1080)]
    width: u32,

    /// Frame height.
    #[arg(long, default_value_t = 1920)]
    height: u32,

    /// Motion seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Render(args) => cmd_render(cfg, args),
        Command::Plan(args) => cmd_plan(cfg, args),
        Command::Check => cmd_check(cfg),
        Command::Preview(args) => cmd_preview(cfg, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<storyreel::PipelineConfig> {
    match path {
        Some(p) => storyreel::PipelineConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(storyreel::PipelineConfig::default()),
    }
}

fn apply_overrides(cfg: &mut storyreel::PipelineConfig, o: Overrides) -> anyhow::Result<()> {
    if let Some(a) = o.assets {
        cfg.assets_dir = a;
    }
    if let Some(m) = o.manifest {
        cfg.manifest = m;
    }
    if let Some(t) = o.tempo {
        cfg.tempo = t;
    }
    if let Some(f) = o.fps {
        cfg.fps = storyreel::Fps::new(f, 1)?;
    }
    cfg.validate()?;
    Ok(())
}

fn run_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let s = storyreel::fresh_seed();
        tracing::info!(seed = s, "no seed given, drew one");
        s
    })
}

fn cmd_render(mut cfg: storyreel::PipelineConfig, args: RenderArgs) -> anyhow::Result<()> {
    apply_overrides(&mut cfg, args.overrides)?;
    if args.no_captions {
        cfg.captions = false;
    }
    let pipeline = storyreel::Pipeline::new(cfg)?;
    let req = storyreel::RenderRequest {
        narration: args.narration,
        transcript: args.transcript,
        output: args.out,
        seed: run_seed(args.seed),
    };
    let report = pipeline
        .run(&req)
        .with_context(|| format!("render '{}'", req.output.display()))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    eprintln!("wrote {} (seed {})", report.output.display(), report.seed);
    Ok(())
}

fn cmd_plan(mut cfg: storyreel::PipelineConfig, args: PlanArgs) -> anyhow::Result<()> {
    apply_overrides(&mut cfg, args.overrides)?;
    let seed = run_seed(args.seed);
    let pipeline = storyreel::Pipeline::new(cfg)?;

    let pool = pipeline.resolve_pool()?;
    let target = match (args.duration, args.narration) {
        (Some(d), _) => d,
        (None, Some(n)) => pipeline.mix_audio(&n, seed)?.mixed.duration_secs(),
        (None, None) => anyhow::bail!("either --duration or --narration is required"),
    };
    let timeline = pipeline.plan(&pool, target, seed)?;
    println!("{}", serde_json::to_string_pretty(&timeline)?);
    Ok(())
}

fn cmd_check(cfg: storyreel::PipelineConfig) -> anyhow::Result<()> {
    let mut missing_tools = Vec::new();
    let line = |label: &str, ok: bool, detail: String| {
        println!("[{}] {label:<16} {detail}", if ok { " ok " } else { "MISS" });
    };

    let video_dir = cfg.video_dir();
    line("clip directory", video_dir.is_dir(), video_dir.display().to_string());
    let bg_dir = cfg.background_dir();
    line("music directory", bg_dir.is_dir(), bg_dir.display().to_string());
    line("manifest", cfg.manifest.is_file(), cfg.manifest.display().to_string());
    match storyreel::load_caption_font(cfg.font.as_deref(), &cfg.assets_dir) {
        Ok(f) => line("caption font", true, f.path.display().to_string()),
        Err(e) => line("caption font", false, e.to_string()),
    }
    for tool in ["ffmpeg", "ffprobe"] {
        let ok = storyreel::assets::media::is_tool_on_path(tool);
        line(tool, ok, if ok { "on PATH" } else { "not found" }.to_string());
        if !ok {
            missing_tools.push(tool);
        }
    }

    if !missing_tools.is_empty() {
        anyhow::bail!("required tools missing: {}", missing_tools.join(", "));
    }
    Ok(())
}

fn cmd_preview(cfg: storyreel::PipelineConfig, args: PreviewArgs) -> anyhow::Result<()> {
    let canvas = storyreel::Canvas::new(args.width, args.height)?;
    let font = storyreel::load_caption_font(cfg.font.as_deref(), &cfg.assets_dir)?;

    // Pad with placeholder words so the requested index picks its style.
    let words: Vec<storyreel::WordToken> = (0..=args.index)
        .map(|i| {
            let text = if i == args.index { args.word.as_str() } else { "-" };
            storyreel::WordToken::new(text, 0.0, 1.0)
        })
        .collect::<Result<_, _>>()?;
    let overlay = storyreel::animate(&words, canvas, 1.0, args.seed)
        .pop()
        .context("no overlay produced")?;

    let mut renderer = storyreel::CaptionRenderer::new(font, canvas);
    let sprite = renderer.rasterize(&overlay)?;
    let frame = storyreel::render_overlay_frame(&overlay, &sprite, args.t.min(1.0 - 1e-9), canvas);

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({:?}, {:?})",
        args.out.display(),
        overlay.style.kind,
        overlay.preset
    );
    Ok(())
}
