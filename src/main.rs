mod app;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vc_atlas::layout::LayoutConfig;
use vc_atlas::summary::summarize;
use vc_atlas::vc::IngestOptions;

use app::DataSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// CSV export with one person per row.
    csv: PathBuf,

    /// JSON array of connections between people.
    #[arg(long)]
    connections: Option<PathBuf>,

    /// JSON object overriding any layout parameters.
    #[arg(long)]
    layout_config: Option<PathBuf>,

    /// Number of layout steps before the simulation settles.
    #[arg(long)]
    steps: Option<u32>,

    /// Year used for open-ended roles and tenure. Defaults to the local clock.
    #[arg(long)]
    current_year: Option<i32>,

    /// Print a JSON summary of the settled layout instead of opening a window.
    #[arg(long)]
    summary: bool,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn read_layout_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout config {}", path.display()))?;
    LayoutConfig::from_json(&raw)
        .with_context(|| format!("invalid layout config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut layout_config = read_layout_config(args.layout_config.as_deref())?;
    if let Some(steps) = args.steps {
        layout_config.step_bound = steps;
    }
    layout_config
        .validate()
        .context("invalid layout parameters")?;

    let options = args
        .current_year
        .map(|current_year| IngestOptions { current_year })
        .unwrap_or_default();
    let source = DataSource {
        csv: args.csv,
        connections: args.connections,
        options,
    };

    if args.summary {
        let loaded = source.load()?;
        let summary = summarize(&loaded, layout_config)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    info!(csv = %source.csv.display(), "opening viewer");
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "vc-atlas",
        options,
        Box::new(move |cc| Ok(Box::new(app::AtlasApp::new(cc, source, layout_config)))),
    )
    .map_err(|error| anyhow::anyhow!("viewer exited with an error: {error}"))
}
