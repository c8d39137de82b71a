use std::path::PathBuf;

use clap::{Parser, Subcommand};
use peakbars_assets::{DEFAULT_DATA_PATH, DatasetSource, ViewerConfig, load_dataset};
use peakbars_render::{DebugTextRenderer, Renderer};
use peakbars_scene::ChartScene;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "peakbars-cli", about = "CLI tool for population peak charts")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Viewer config (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Load and validate a dataset
    Validate {
        /// Dataset path or http(s) URL
        #[arg(default_value = DEFAULT_DATA_PATH)]
        source: DatasetSource,
    },
    /// Build the chart scene and print the first frame as text
    Describe {
        #[arg(default_value = DEFAULT_DATA_PATH)]
        source: DatasetSource,
    },
    /// Hover a pixel and report what the chart shows
    Pick {
        #[arg(default_value = DEFAULT_DATA_PATH)]
        source: DatasetSource,
        /// Pointer x in pixels
        #[arg(long)]
        x: f32,
        /// Pointer y in pixels
        #[arg(long)]
        y: f32,
        #[arg(long, default_value = "1280")]
        width: u32,
        #[arg(long, default_value = "720")]
        height: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let result = run(cli.command, cli.config);
    if let Err(e) = &result {
        tracing::error!("{e:#}");
    }
    result
}

fn run(command: Commands, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = match &config_path {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    match command {
        Commands::Info => {
            println!("peakbars-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", peakbars_common::crate_info());
            println!("geometry: {}", peakbars_geometry::crate_info());
            println!("render: {}", peakbars_render::crate_info());
            println!("chart: {}", peakbars_chart::crate_info());
            println!("input: {}", peakbars_input::crate_info());
            println!("assets: {}", peakbars_assets::crate_info());
            println!("scene: {}", peakbars_scene::crate_info());
        }
        Commands::Validate { source } => {
            let records = load_dataset(&source)?;
            println!("{source}: {} countries", records.len());
            for record in &records {
                let latest = record.latest().unwrap_or_default();
                println!(
                    "  {} peaks={} latest={latest:.2}",
                    record.country_name,
                    record.peaks.len()
                );
            }
        }
        Commands::Describe { source } => {
            let mut scene = ChartScene::load(&source, &config)?;
            scene.frame()?;
            print!("{}", DebugTextRenderer::new().render(&scene.render_frame()));
        }
        Commands::Pick {
            source,
            x,
            y,
            width,
            height,
        } => {
            let mut scene = ChartScene::load(&source, &config)?;
            scene.resize(width, height);
            scene.pointer_moved(x, y);
            let state = scene.frame()?;
            let ndc = scene.pointer().ndc();
            println!("pointer ({x}, {y}) -> ndc ({:.3}, {:.3})", ndc.x, ndc.y);
            match state.bar() {
                Some(index) => {
                    let widget = scene.widget();
                    println!("hovering bar {index}: {}", widget.bar(index)?.country_name);
                    for tooltip in widget.tooltips() {
                        println!(
                            "  tooltip \"{}\" at ({:.1}, {:.1})",
                            tooltip.text, tooltip.position.x, tooltip.position.y
                        );
                    }
                }
                None => println!("nothing hovered"),
            }
        }
    }

    Ok(())
}
