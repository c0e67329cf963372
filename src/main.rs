#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use log::warn;
use pinguin::{AppConfig, PinguinApp};

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();
    for error in config.validate() {
        warn!("{error}");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("pinguin-probe")
        .build()
        .expect("Failed to start the probe runtime");

    let app = PinguinApp::new(config, runtime);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 600.0])
            .with_min_inner_size([320.0, 200.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Pinguin",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(app))
        }),
    )
}
