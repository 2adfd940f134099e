// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of ChargION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Main application configuration - ChargION assistant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Dataset locations
    #[serde(default)]
    pub data: DataConfig,
}

/// Dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the hourly load CSV (columns: timestamp, energy_kwh)
    #[serde(default = "default_hourly_csv")]
    pub hourly_csv: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            hourly_csv: default_hourly_csv(),
        }
    }
}

fn default_hourly_csv() -> PathBuf {
    PathBuf::from("hourly_ev_load.csv")
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file does not exist. A present-but-malformed file is an error, not a
/// silent fallback.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        warn!(
            "Config file {} not found, using defaults",
            path.display()
        );
        return Ok(AppConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse config file {}", path.display()))
}
