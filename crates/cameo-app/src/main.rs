//! Cameo: a webcam preview with screenshots and screen recording.
//!
//! Keys: space takes a screenshot, tab starts or stops recording,
//! escape quits.

mod app;
mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::Cameo;
use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Camera index (overrides the config file)
    #[arg(long)]
    camera: Option<i32>,

    /// Show the preview unmirrored
    #[arg(long)]
    no_mirror: bool,
}

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "info";

fn log_filter(env: Option<&str>) -> EnvFilter {
    env.filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(env.as_deref()))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(camera) = args.camera {
        config.camera_index = camera;
    }
    if args.no_mirror {
        config.mirror_preview = false;
    }

    info!(camera = config.camera_index, "Starting Cameo");

    let device = cameo_capture::open_camera(config.camera_index)
        .with_context(|| format!("Failed to open camera {}", config.camera_index))?;
    let writer_factory = cameo_capture::default_writer_factory()?;
    let surface = cameo_window::default_surface()?;

    let mut app = Cameo::new(config, device, writer_factory, surface)?;
    app.run()
}
