//! Application configuration
//!
//! Handles loading configuration from config.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use crate::export::{ExportSettings, FETCH_TIMEOUT_SECS};

/// Global application config
static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Get the global application config
pub fn get_config() -> &'static AppConfig {
    APP_CONFIG.get_or_init(AppConfig::load)
}

/// Root application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Catalog configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogConfig {
    /// Start with the built-in starter icons
    #[serde(default = "default_load_starter_items")]
    pub load_starter_items: bool,
}

fn default_load_starter_items() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            load_starter_items: default_load_starter_items(),
        }
    }
}

/// Download configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExportConfig {
    /// Where downloaded icons go. Defaults to the user's download directory.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_fetch_timeout_secs() -> u64 {
    FETCH_TIMEOUT_SECS
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl ExportConfig {
    /// Directory downloads are written to
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn settings(&self) -> ExportSettings {
        ExportSettings {
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }
}

impl AppConfig {
    /// Load configuration from config.json
    pub fn load() -> Self {
        // Try to load from current directory first
        if let Ok(config) = Self::load_from_path("config.json") {
            log::info!("Loaded config from ./config.json");
            return config;
        }

        // Try to load from executable directory
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let config_path = exe_dir.join("config.json");
                if let Ok(config) = Self::load_from_path(&config_path) {
                    log::info!("Loaded config from {}", config_path.display());
                    return config;
                }
            }
        }

        log::info!("No config.json found, using defaults");
        Self::default()
    }

    pub fn load_from_path(path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.into();
        let content = fs::read_to_string(&path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}
