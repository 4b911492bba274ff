mod app;
mod state;
mod ui;

use std::path::Path;

use app::LisCurvesApp;
use eframe::egui;
use lis_curves::config::CONFIG_FILE_NAME;
use lis_curves::ViewerConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::load_or_default(Path::new(CONFIG_FILE_NAME)).unwrap_or_else(|e| {
        log::error!("Ignoring {CONFIG_FILE_NAME}: {e}");
        ViewerConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Li-S Charge–Discharge Visualizer",
        options,
        Box::new(|_cc| Ok(Box::new(LisCurvesApp::new(config)))),
    )
}
