use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::paging::TRACKS_PER_PAGE;

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults — the config file is optional.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog CSV path (overrides the bundled default).
    pub catalog_path: Option<PathBuf>,
    /// Tracks shown per page.
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            page_size: TRACKS_PER_PAGE,
        }
    }
}

impl AppConfig {
    /// Load config from `~/.config/needledrop/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match config_path {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Default catalog location relative to the working directory.
pub fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/filtered_track_df.csv")
}
