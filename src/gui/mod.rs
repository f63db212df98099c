//! GUI module using egui/eframe
//!
//! Renders the catalog session and forwards user intents to it.

mod app;
mod images;

pub use app::App;
