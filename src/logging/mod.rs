//! Logging backend for the desktop app

mod ui_logger;

pub use ui_logger::UiLogger;
