use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "plinth", version)]
struct Cli {
    /// Log intermediate measurements (component sizes, fit statistics).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a stage description to a PNG.
    Composite(CompositeArgs),
    /// Print the computed layout of a stage as JSON.
    Layout(LayoutArgs),
    /// Straighten a single product image.
    Deskew(DeskewArgs),
    /// Print a drop-shadow preview URL.
    ShadowUrl(ShadowUrlArgs),
}

#[derive(Parser, Debug)]
struct CompositeArgs {
    /// Input stage JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input stage JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct DeskewArgs {
    /// Image to straighten (usually the shadowed subject).
    #[arg(long)]
    image: PathBuf,

    /// Shadow-free cutout of the same product; detection runs on it when given.
    #[arg(long)]
    clean: Option<PathBuf>,

    /// Output PNG path for the rotated image.
    #[arg(long)]
    out: PathBuf,

    /// Output PNG path for the rotated clean cutout; needs `--clean`.
    #[arg(long, requires = "clean")]
    clean_out: Option<PathBuf>,

    /// Detection pipeline.
    #[arg(long, value_enum, default_value_t = VariantChoice::Morphological)]
    variant: VariantChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantChoice {
    Morphological,
    Contour,
}

#[derive(Parser, Debug)]
struct ShadowUrlArgs {
    /// Cloud name of the delivery account.
    #[arg(long)]
    cloud: String,

    /// Public id of the uploaded cutout.
    #[arg(long)]
    public_id: String,

    /// Light direction in degrees (0-360).
    #[arg(long, default_value_t = 215)]
    azimuth: u32,

    /// Light elevation in degrees (0-90).
    #[arg(long, default_value_t = 45)]
    elevation: u32,

    /// Shadow softness (0-100).
    #[arg(long, default_value_t = 50)]
    spread: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Composite(args) => cmd_composite(args),
        Command::Layout(args) => cmd_layout(args),
        Command::Deskew(args) => cmd_deskew(args),
        Command::ShadowUrl(args) => cmd_shadow_url(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "plinth=debug" } else { "plinth=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn read_stage(path: &Path) -> anyhow::Result<plinth::Stage> {
    let stage = plinth::Stage::from_path(path)
        .with_context(|| format!("load stage '{}'", path.display()))?;
    stage.validate()?;
    Ok(stage)
}

fn stage_root(in_path: &Path) -> &Path {
    in_path.parent().unwrap_or_else(|| Path::new("."))
}

fn cmd_composite(args: CompositeArgs) -> anyhow::Result<()> {
    let stage = read_stage(&args.in_path)?;
    let out = plinth::render_stage(&stage, stage_root(&args.in_path))?;

    if let Some(d) = &out.deskew {
        eprintln!("deskew: {}", d.reason);
    }
    plinth::save_png(&out.frame, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let stage = read_stage(&args.in_path)?;
    let prepared = plinth::prepare_stage(&stage, stage_root(&args.in_path))?;
    let layout = prepared.layout(&stage)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&layout).context("serialize layout")?
    );
    Ok(())
}

fn cmd_deskew(args: DeskewArgs) -> anyhow::Result<()> {
    let image = std::fs::read(&args.image)
        .with_context(|| format!("read image '{}'", args.image.display()))?;
    let clean = args
        .clean
        .as_ref()
        .map(|p| std::fs::read(p).with_context(|| format!("read image '{}'", p.display())))
        .transpose()?;

    let opts = plinth::DeskewOptions {
        variant: match args.variant {
            VariantChoice::Morphological => plinth::DeskewVariant::Morphological,
            VariantChoice::Contour => plinth::DeskewVariant::Contour,
        },
        ..plinth::DeskewOptions::default()
    };
    let result = plinth::detect_and_correct_bytes(&image, clean.as_deref(), &opts);

    println!(
        "{}",
        serde_json::json!({
            "outcome": result.outcome,
            "angle_degrees": result.angle_degrees,
            "confidence_percent": result.confidence_percent,
            "reason": result.reason,
        })
    );

    if let Some(rotated) = &result.rotated_image {
        save_prepared(rotated, &args.out)?;
    }
    if let (Some(rotated), Some(path)) = (&result.clean_rotated_image, &args.clean_out) {
        save_prepared(rotated, path)?;
    }
    Ok(())
}

fn save_prepared(img: &plinth::PreparedImage, path: &Path) -> anyhow::Result<()> {
    let frame = plinth::FrameRGBA {
        width: img.width,
        height: img.height,
        data: img.rgba8_premul.as_ref().clone(),
        premultiplied: true,
    };
    plinth::save_png(&frame, path)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_shadow_url(args: ShadowUrlArgs) -> anyhow::Result<()> {
    let params = plinth::ShadowParams {
        azimuth: args.azimuth,
        elevation: args.elevation,
        spread: args.spread,
    };
    println!(
        "{}",
        plinth::shadow_preview_url(&args.cloud, &args.public_id, params)?
    );
    Ok(())
}
