//! Window and layout settings
//!
//! Stored as JSON next to the platform config directory. A missing file is
//! created with defaults on first start.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::paths::{APP_DIR, CONFIG_FILENAME};
use crate::constants::validation::{MAX_RATIO_PERCENT, MIN_WINDOW_DIMENSION};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Share of the body width given to the sub-group list, in percent
    #[serde(default = "default_sub_group_ratio")]
    pub sub_group_ratio: u32,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

fn default_sub_group_ratio() -> u32 {
    20
}

fn default_window_width() -> u32 {
    700
}

fn default_window_height() -> u32 {
    700
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sub_group_ratio: default_sub_group_ratio(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl AppConfig {
    /// `<config_dir>/kuusoo/config.json`, falling back to the working directory
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(CONFIG_FILENAME);
        path
    }

    /// Load from `path`, writing the defaults there if the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, creating default config at {:?}", path);
            let config = AppConfig::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let mut config: AppConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
        config.validate_and_clamp();

        info!(?config, "Loaded config");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json).with_context(|| format!("Failed to write config to {:?}", path))?;

        info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Clamp hand-edited values into the ranges the window accepts
    pub fn validate_and_clamp(&mut self) {
        let max_ratio = u32::from(MAX_RATIO_PERCENT);
        if self.sub_group_ratio > max_ratio {
            warn!(sub_group_ratio = self.sub_group_ratio, "sub_group_ratio exceeds 100, clamping to 100");
            self.sub_group_ratio = max_ratio;
        }

        if self.window_width < MIN_WINDOW_DIMENSION {
            warn!(window_width = self.window_width, min = MIN_WINDOW_DIMENSION, "window_width below minimum, clamping");
            self.window_width = MIN_WINDOW_DIMENSION;
        }

        if self.window_height < MIN_WINDOW_DIMENSION {
            warn!(window_height = self.window_height, min = MIN_WINDOW_DIMENSION, "window_height below minimum, clamping");
            self.window_height = MIN_WINDOW_DIMENSION;
        }
    }

    /// Split `total` width into (sub-group pane, file pane)
    pub fn pane_widths(&self, total: f32) -> (f32, f32) {
        let sub = total * self.sub_group_ratio as f32 / 100.0;
        (sub, total - sub)
    }
}
