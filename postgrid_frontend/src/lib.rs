//! Desktop front end for a posts collection held in a keyed-map JSON store.

pub mod api;
pub mod app;
pub mod compare;
pub mod config;
pub mod controller;
pub mod models;
pub mod normalize;

use eframe::{self, egui};

pub use app::PostGridApp;
pub use config::FrontendConfig;

/// Launches the egui application with default window options.
pub fn run_frontend() -> Result<(), eframe::Error> {
    run_frontend_with_options(default_native_options())
}

/// Launches the egui app with caller-provided options.
pub fn run_frontend_with_options(options: eframe::NativeOptions) -> Result<(), eframe::Error> {
    let _ = env_logger::builder().is_test(false).try_init();
    let config = FrontendConfig::load();
    eframe::run_native(
        "PostGrid",
        options,
        Box::new(move |cc| Ok(Box::new(PostGridApp::new(cc, config)?))),
    )
}

fn default_native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    }
}
