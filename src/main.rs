mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod svg;
mod ui;
mod view;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use app::ThermoScrubApp;
use config::ChartConfig;
use eframe::egui;
use state::AppState;

const DEFAULT_DATA_PATH: &str = "data/annual_temp.json";

fn main() -> Result<()> {
    env_logger::init();

    let config = ChartConfig::default();
    let mut state = AppState::new(config.clone());

    // An explicitly named file must load; the default one is optional.
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            state
                .load_path(&path, 0.0)
                .with_context(|| format!("loading {}", path.display()))?;
            log::info!("Loaded {} records from {}", dataset_len(&state), path.display());
        }
        None => {
            let path = PathBuf::from(DEFAULT_DATA_PATH);
            match state.load_path(&path, 0.0) {
                Ok(()) => log::info!(
                    "Loaded {} records from {}",
                    dataset_len(&state),
                    path.display()
                ),
                Err(e) => log::warn!("No dataset at {}: {e}", path.display()),
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width + 40.0, config.height + 160.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ThermoScrub – Annual Temperature",
        options,
        Box::new(|_cc| Ok(Box::new(ThermoScrubApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}

fn dataset_len(state: &AppState) -> usize {
    state.dataset.as_ref().map_or(0, |d| d.len())
}
