use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{provider::openmeteo::DEFAULT_BASE_URL, report::Selection};

/// File name of the city dataset inside the data directory.
pub const DATASET_FILE_NAME: &str = "worldcities.csv";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Path to the world cities CSV; defaults to the platform data directory.
    pub cities_path: Option<PathBuf>,

    /// Forecast endpoint, e.g. a self-hosted Open-Meteo.
    pub api_base_url: Option<String>,

    /// Example TOML:
    /// [default_location]
    /// country = "United States"
    /// city = "New York"
    pub default_location: Option<Selection>,
}

impl Config {
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Dataset path: explicit override, then config, then the platform data directory.
    pub fn resolve_cities_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_override {
            return Ok(path.to_path_buf());
        }

        if let Some(path) = &self.cities_path {
            return Ok(path.clone());
        }

        Ok(project_dirs()?.data_dir().join(DATASET_FILE_NAME))
    }

    pub fn set_default_location(&mut self, selection: Selection) {
        self.default_location = Some(selection);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weathernow", "weathernow")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
