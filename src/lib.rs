//! GameIcons Library
//!
//! Catalog of game cover icons: search, genre filtering, uploads and downloads.

pub mod catalog;
pub mod config;
pub mod export;
pub mod gui;
pub mod ingest;
pub mod logging;
pub mod search;
pub mod session;
