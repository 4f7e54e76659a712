//! Explore a dialogue tree interactively using egui (requires `--features egui`).
//!
//! Usage:
//!   cargo run --features egui --example timeline_viewer -- demos/garden.json [-c CONFIG.json]
//!
//! Drag the canvas (or hold space) to pan, scroll to zoom, ctrl+0 to reset.
//! Click a card to make it current; drag a card to move it.

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use eframe::egui;
use tracing_subscriber::{EnvFilter, fmt};

use forking_paths::config::TimelineConfig;
use forking_paths::egui_app::TimelineApp;
use forking_paths::store::DialogueTree;

#[derive(Parser, Debug)]
#[command(author, version, about = "Explore a dialogue tree as a timeline using egui", long_about = None)]
struct Args {
    /// Dialogue tree JSON file. Starts with an empty tree when omitted.
    #[arg(value_name = "TREE_FILE")]
    file: Option<String>,

    /// JSON config file with layout/viewport overrides
    #[arg(short = 'c', long = "config")]
    config: Option<String>,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = match &args.config {
        Some(p) => TimelineConfig::load(Utf8PathBuf::from(p))?,
        None => TimelineConfig::default(),
    };
    let tree = match &args.file {
        Some(p) => DialogueTree::load_json(Utf8PathBuf::from(p))?,
        None => DialogueTree::new("You are a helpful assistant."),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_maximized(true),
        ..Default::default()
    };
    eframe::run_native(
        "forking-paths timeline viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(TimelineApp::new(tree, cfg)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
