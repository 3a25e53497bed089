//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL override and the last used username.
//!
//! Configuration is stored at `~/.config/jotter/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config directory paths
const APP_NAME: &str = "jotter";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default notes service endpoint
const DEFAULT_API_BASE_URL: &str = "https://notes-app-m8l9.onrender.com";

/// Environment variable overriding the API base URL
const API_URL_ENV: &str = "JOTTER_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve the API base URL: environment variable, then config file,
    /// then the default endpoint.
    pub fn resolved_api_base_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }
}
