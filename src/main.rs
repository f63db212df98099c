//! GameIcons
//!
//! A desktop library of game cover icons to replace default desktop shortcuts.

use eframe::egui;
use gameicons::gui;
use gameicons::logging::UiLogger;

fn main() -> eframe::Result<()> {
    let log_receiver = match UiLogger::init() {
        Ok(receiver) => Some(receiver),
        Err(e) => {
            eprintln!("Failed to install logger: {}", e);
            None
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "GameIcons",
        options,
        Box::new(move |cc| Ok(Box::new(gui::App::new(cc, log_receiver)))),
    )
}
