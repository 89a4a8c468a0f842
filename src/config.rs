use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::pip::LoadOptions;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub regions: LoadOptions,
    pub columns: ColumnConfig,
}

/// CSV header names for the fields the backfill reads and writes.
/// Matched case-insensitively.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ColumnConfig {
    pub id: String,
    pub region: String,
    pub postal: String,
    pub latitude: String,
    pub longitude: String,
    pub flag: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            id: "COLLISION_ID".to_string(),
            region: "BOROUGH".to_string(),
            postal: "ZIP CODE".to_string(),
            latitude: "LATITUDE".to_string(),
            longitude: "LONGITUDE".to_string(),
            flag: "BOROUGH_UPDATED_MANUALLY".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }
}
