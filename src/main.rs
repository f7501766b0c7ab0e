mod app;
mod board;
mod canvas;
mod config;
mod interaction;
mod marker;
mod persistence;
mod store;
mod view;

use app::MarkerBoardApp;
use config::BoardConfig;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("marker_board=info")),
        )
        .init();

    let config = BoardConfig::from_env();
    tracing::info!(radius = config.radius, key = %config.storage_key, "starting marker board");

    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(1340.0, 720.0)),
        min_window_size: Some(egui::vec2(800.0, 600.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Marker Board",
        native_options,
        Box::new(move |cc| Box::new(MarkerBoardApp::new(cc, config))),
    )
}
