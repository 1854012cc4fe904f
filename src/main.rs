mod analysis;
mod app;
mod color;
mod config;
mod data;
mod error;
mod export;
mod state;
mod ui;

use app::StudentDashboardApp;
use clap::Parser;
use config::{Cli, Config};
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    log::info!("Using workbook {}", config.workbook.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Panel de Análisis de Estudiantes",
        options,
        Box::new(move |_cc| Ok(Box::new(StudentDashboardApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the UI: {e}"))
}
