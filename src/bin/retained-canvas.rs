use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use retained_canvas::{
    BoxShadow, BoxShadowOpts, ClearBuffers, ClearColor, Color, Fbo, FboOpts, GraphicsConfig,
    GraphicsContext, Point, Rectangle, Rgba, ShadowGeometry, Size, Vec2,
};

#[derive(Parser, Debug)]
#[command(name = "retained-canvas", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a box shadow (and the box casting it) to a PNG.
    Shadow(ShadowArgs),
    /// Print the adjusted bounds of a box shadow as JSON.
    Geometry(GeometryArgs),
}

#[derive(Parser, Debug)]
struct ShapeArgs {
    /// Box position (top-left), in pixels.
    #[arg(long, num_args = 2, value_names = ["X", "Y"], default_values_t = [50.0, 50.0])]
    pos: Vec<f64>,

    /// Box size, in pixels.
    #[arg(long, num_args = 2, value_names = ["W", "H"], default_values_t = [150.0, 150.0])]
    size: Vec<f64>,

    /// Shadow offset, in pixels.
    #[arg(long, num_args = 2, value_names = ["DX", "DY"], default_values_t = [0.0, 10.0])]
    offset: Vec<f64>,

    #[arg(long, default_value_t = 80.0)]
    blur: f64,

    #[arg(long, default_value_t = 10.0)]
    spread: f64,

    /// Corner radius applied to all four corners.
    #[arg(long, default_value_t = 0.0)]
    radius: f64,
}

impl ShapeArgs {
    fn opts(&self) -> BoxShadowOpts {
        BoxShadowOpts {
            pos: Point::new(self.pos[0], self.pos[1]),
            size: Size::new(self.size[0], self.size[1]),
            offset: Vec2::new(self.offset[0], self.offset[1]),
            blur_radius: self.blur,
            spread_radius: self.spread,
            border_radius: [self.radius; 4],
        }
    }
}

#[derive(Parser, Debug)]
struct ShadowArgs {
    #[command(flatten)]
    shape: ShapeArgs,

    /// Output image size.
    #[arg(long, num_args = 2, value_names = ["W", "H"], default_values_t = [400, 400])]
    canvas: Vec<u32>,

    /// Optional graphics configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct GeometryArgs {
    #[command(flatten)]
    shape: ShapeArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Shadow(args) => cmd_shadow(args),
        Command::Geometry(args) => cmd_geometry(args),
    }
}

fn cmd_shadow(args: ShadowArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => GraphicsConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => GraphicsConfig::from_env()?,
    };
    let ctx = GraphicsContext::new(config)?;

    let opts = args.shape.opts();
    let fbo = Fbo::new(
        &ctx,
        FboOpts {
            size: (args.canvas[0], args.canvas[1]),
            clear_color: Rgba::WHITE,
        },
    )?;
    {
        let _rec = fbo.record();
        ClearColor::new(1.0, 1.0, 1.0, 1.0)?;
        ClearBuffers::new()?;
        Color::new(0.0, 0.0, 0.0, 0.6)?;
        BoxShadow::with_opts(opts)?;
        Color::new(0.3, 0.5, 0.9, 1.0)?;
        Rectangle::new(opts.pos, opts.size)?;
    }
    fbo.draw()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    fbo.texture()
        .save(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_geometry(args: GeometryArgs) -> anyhow::Result<()> {
    let opts = args.shape.opts();
    let geometry: ShadowGeometry = opts.geometry();
    println!("{}", serde_json::to_string_pretty(&geometry)?);
    Ok(())
}
