use anyhow::{Context, Result};
use blobworld_core::init_logging;
use blobworld_lib::app::App;
use blobworld_lib::model::SimConfig;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// What to print while running
    #[arg(short, long, value_enum, default_value = "summary")]
    mode: Mode,

    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Override the RNG seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Viewport aspect ratio (width / depth)
    #[arg(long)]
    aspect: Option<f32>,

    /// Write the final world snapshot as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Mode {
    /// Only the end-of-run summary
    Summary,
    /// Every event as a JSON line, then the summary
    Events,
}

fn load_config(path: &Path) -> Result<SimConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No config file, using defaults");
        return Ok(SimConfig::default());
    }
    SimConfig::load(path).with_context(|| format!("loading {}", path.display()))
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    if let Some(aspect) = args.aspect {
        config.arena.aspect = aspect;
    }

    let mut app = App::new(config)?;
    let summary = match args.mode {
        Mode::Summary => app.run(args.frames, |_| {}),
        Mode::Events => app.run(args.frames, |event| match event.to_json() {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "Failed to encode event"),
        }),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(path) = args.snapshot {
        let json = app.snapshot().to_json_pretty()?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Snapshot written");
    }

    Ok(())
}
