// The command-line runner for the `glyph_graph` library: load a picture (or an
// ASCII grid), run the pipeline, and write or print the results.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glyph_graph::core_modules::grid_sampler::{GridSampler, estimate_square_size};
use glyph_graph::export::{
    CONNECTED_SQUARES_FILE_NAME, GRAPH_FILE_NAME, write_graph_json, write_points_json,
};
use glyph_graph::{AnalysisConfig, GlyphPipeline, Grid};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "glyph_graph")]
#[command(about = "Find connected green glyphs and the red paths between them")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full analysis and write graph.json and connected_squares.json.
    #[command(name = "analyze")]
    Analyze(AnalyzeArgs),
    /// Print the sampled grid as ASCII (G, R, .).
    #[command(name = "grid")]
    Grid(InputArgs),
    /// Estimate the square size of a picture.
    #[command(name = "estimate")]
    Estimate(EstimateArgs),
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// A picture, or a `.txt` file in the ASCII grid form.
    #[arg(long, required = true)]
    input: PathBuf,
    /// Square size in pixels. Overrides GLYPH_SQUARE_SIZE.
    #[arg(long)]
    square_size: Option<u32>,
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output directory. Defaults to the input's directory.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Reachability workers. Overrides GLYPH_WORKERS.
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Args, Debug, Clone)]
struct EstimateArgs {
    #[arg(long, required = true)]
    input: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Analyze(args) => run_analyze(args).await,
        Command::Grid(args) => run_grid(args),
        Command::Estimate(args) => run_estimate(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("glyph_graph=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(input: &InputArgs, workers: Option<usize>) -> Result<AnalysisConfig> {
    let mut config = AnalysisConfig::from_env().context("reading GLYPH_* environment")?;
    if let Some(square_size) = input.square_size {
        config.square_size = square_size;
    }
    if let Some(workers) = workers {
        config.workers = workers.max(1);
    }
    Ok(config)
}

fn is_ascii_grid(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

fn load_grid(path: &Path, square_size: u32) -> Result<Grid> {
    if is_ascii_grid(path) {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        return Grid::from_ascii(&text).with_context(|| format!("parsing {}", path.display()));
    }

    info!(path = %path.display(), "loading image");
    let grid = GridSampler::new(square_size)?
        .load(path)
        .with_context(|| format!("loading {}", path.display()))?;
    info!(width = grid.width(), height = grid.height(), "grid sampled");
    Ok(grid)
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = load_config(&args.input, args.workers)?;
    let grid = load_grid(&args.input.input, config.square_size)?;

    let pipeline = GlyphPipeline::new(config);
    let report = pipeline.analyze_parallel(Arc::new(grid)).await?;

    let out_dir = match args.out {
        Some(dir) => dir,
        None => args
            .input
            .input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    if !out_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("creating {}", out_dir.display()))?;
    }

    let squares_path = out_dir.join(CONNECTED_SQUARES_FILE_NAME);
    write_points_json(&report.connected_greens, &squares_path)
        .with_context(|| format!("writing {}", squares_path.display()))?;
    info!(
        count = report.connected_greens.len(),
        path = %squares_path.display(),
        "saved connected squares"
    );

    let graph_path = out_dir.join(GRAPH_FILE_NAME);
    write_graph_json(&report.graph, &graph_path)
        .with_context(|| format!("writing {}", graph_path.display()))?;
    info!(
        blocks = report.graph.len(),
        edges = report.graph.edge_count(),
        path = %graph_path.display(),
        "saved connectivity graph"
    );

    Ok(())
}

fn run_grid(args: InputArgs) -> Result<()> {
    let config = load_config(&args, None)?;
    let grid = load_grid(&args.input, config.square_size)?;
    print!("{grid}");
    Ok(())
}

fn run_estimate(args: EstimateArgs) -> Result<()> {
    let image = image::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?
        .to_rgb8();
    let (width, height) = image.dimensions();
    let estimate = estimate_square_size(&image);

    println!("Image dimensions: {width}x{height}");
    println!("Estimated square size: {}x{}", estimate.width, estimate.height);
    println!(
        "Estimated grid: {}x{}",
        width / estimate.width,
        height / estimate.height
    );
    Ok(())
}
