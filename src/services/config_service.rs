use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Environment override for the API root.
pub const API_URL_ENV: &str = "SCHOOLDESK_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Log every request at info level instead of debug.
    #[serde(default)]
    pub request_log: bool,
}

impl Config {
    /// Env var, then the stored value, then the local development default.
    pub fn effective_api_base_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }
}

/// `<data_dir>/SchoolDesk`, created on first use.
pub fn get_app_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| DashboardError::Config("Could not find data directory".to_string()))?
        .join("SchoolDesk");

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::at(get_app_data_dir()?.join("config.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| DashboardError::Config(format!("Failed to read config: {e}")))?;
        serde_json::from_str(&content)
            .map_err(|e| DashboardError::Config(format!("Failed to parse config: {e}")))
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)
            .map_err(|e| DashboardError::Config(format!("Failed to write config: {e}")))?;
        Ok(())
    }

    pub fn set_api_base_url(&self, url: &str) -> Result<()> {
        url::Url::parse(url)?;
        let mut config = self.load().unwrap_or_default();
        config.api_base_url = Some(url.trim_end_matches('/').to_string());
        self.save(&config)
    }

    pub fn set_request_log(&self, enabled: bool) -> Result<()> {
        let mut config = self.load().unwrap_or_default();
        config.request_log = enabled;
        self.save(&config)
    }
}
