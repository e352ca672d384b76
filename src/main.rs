mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::DashboardApp;
use clap::Parser;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

#[derive(Parser)]
#[command(name = "gapminder-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive line charts of Gapminder metrics by continent")]
struct Args {
    /// Dataset to open (.csv, .json or .parquet). Overrides the config file.
    data: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::load_default()?,
    };
    config.apply_env_overrides();
    if let Some(path) = args.data {
        config.data.path = path;
    }

    let dataset = crate::data::loader::load_file(&config.data.path)
        .inspect_err(|e| log::error!("Failed to load dataset: {e:#}"))
        .context("the dashboard needs a readable dataset to start")?;

    let mut state = AppState::new(config.data.show_data);
    state.set_dataset(dataset, Some(config.data.path.clone()));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        app::APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
