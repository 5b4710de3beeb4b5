//! Student Marks Analyzer - CSV upload, grading and performance dashboard
//!
//! Desktop front end over the `marks_dashboard` library.

mod gui;

use eframe::egui;
use env_logger::Env;
use gui::DashboardApp;
use marks_dashboard::DashboardConfig;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load_or_default();
    log::info!("Starting Student Marks Analyzer");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("Student Marks Analyzer"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Student Marks Analyzer",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
}
