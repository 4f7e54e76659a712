use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use forking_paths::config::TimelineConfig;
use forking_paths::geometry::Point;
use forking_paths::gesture::{Command, ZoomDirection};
use forking_paths::store::{DialogueTree, NodeStore};
use forking_paths::timeline::TimelineView;

#[derive(Parser, Debug)]
#[command(author, version, about = "Lay out a dialogue tree and print the timeline scene as JSON", long_about = None)]
struct Cli {
    /// Dialogue tree JSON file
    #[arg(value_name = "TREE_FILE")]
    tree_file: String,

    /// Node to treat as current (overrides the file)
    #[arg(short, long)]
    current: Option<String>,

    /// JSON config file with layout/viewport overrides
    #[arg(long, value_name = "CONFIG_FILE")]
    config: Option<String>,

    /// Wheel-zoom at a screen point before printing: X Y DELTA
    #[arg(long, num_args = 3, value_names = ["X", "Y", "DELTA"], allow_negative_numbers = true)]
    zoom_at: Option<Vec<f32>>,

    /// Zoom in (positive) or out (negative) by this many button steps around the origin
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    zoom_steps: i32,

    /// Pan the view before printing: DX DY
    #[arg(long, num_args = 2, value_names = ["DX", "DY"], allow_negative_numbers = true)]
    pan: Option<Vec<f32>>,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(p) => TimelineConfig::load(Utf8PathBuf::from(p))?,
        None => TimelineConfig::default(),
    };

    let path = Utf8PathBuf::from(&cli.tree_file);
    let mut tree = DialogueTree::load_json(&path)?;
    if let Some(cur) = &cli.current {
        tree.navigate(cur)
            .with_context(|| format!("Cannot select node '{}'", cur))?;
    }

    let mut view = TimelineView::new(cfg);
    let report = view.sync(&tree);
    info!(
        nodes = tree.len(),
        placed = report.placed.len(),
        deferred = report.deferred.len(),
        "layout done"
    );

    if let Some(v) = &cli.zoom_at {
        view.apply(
            Command::Zoom {
                cursor: Point::new(v[0], v[1]),
                wheel_delta: v[2],
            },
            &mut tree,
        );
    }
    let direction = if cli.zoom_steps >= 0 {
        ZoomDirection::In
    } else {
        ZoomDirection::Out
    };
    for _ in 0..cli.zoom_steps.unsigned_abs() {
        view.apply(
            Command::ZoomStep {
                direction,
                anchor: Point::ORIGIN,
            },
            &mut tree,
        );
    }
    if let Some(v) = &cli.pan {
        view.apply(Command::PanBy { dx: v[0], dy: v[1] }, &mut tree);
    }

    let scene = view.scene(&tree);
    let json = if cli.compact {
        serde_json::to_string(&scene)?
    } else {
        serde_json::to_string_pretty(&scene)?
    };
    println!("{}", json);
    Ok(())
}
