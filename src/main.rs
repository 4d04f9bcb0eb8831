mod app;
mod color;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use eframe::egui;

use solar_dashboard::data::cache;
use solar_dashboard::DashboardConfig;

use app::SolarDashboardApp;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env().context("reading configuration")?;
    config.log_config();

    // A missing or malformed source aborts startup; there is no partial dashboard.
    let dataset = cache::load(&config)
        .inspect_err(|e| log::error!("Failed to load solar data: {e}"))
        .with_context(|| format!("loading country files from {}", config.data_dir.display()))?;

    let state = AppState::new(dataset, config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Solar Irradiance Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SolarDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
