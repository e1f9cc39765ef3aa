use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::{ApiConfig, DEFAULT_API_URL};

/// Environment variable naming the backend base URL.
pub const API_URL_ENV: &str = "VORTEX_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    #[error("failed to read config: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),
}

/// Optional `config.toml` contents. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// The environment wins over the file, the file over the default.
    /// Blank values count as unset.
    pub fn resolve(env_api_url: Option<String>, file: Option<FileConfig>) -> Self {
        let non_blank = |s: &String| !s.trim().is_empty();
        let api_url = env_api_url
            .filter(non_blank)
            .or_else(|| file.and_then(|f| f.api_url).filter(non_blank))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self { api_url }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.api_url.as_str())
    }
}

/// Platform directories shared by config, storage and logs.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "vortex", "vortex")
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dirs = project_dirs().ok_or(ConfigError::DirectoriesNotFound)?;
    Ok(dirs.config_dir().join("config.toml"))
}

/// Reads `config.toml` if it exists. A missing file is not an error.
pub fn load_file_config() -> Result<Option<FileConfig>, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&path)?;
    let config: FileConfig = toml::from_str(&contents)?;
    tracing::info!("loaded configuration from {}", path.display());
    Ok(Some(config))
}

/// Builds the configuration from the process environment and the config file.
pub fn load() -> AppConfig {
    let file = match load_file_config() {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!("ignoring config file: {}", e);
            None
        }
    };
    let config = AppConfig::resolve(std::env::var(API_URL_ENV).ok(), file);
    tracing::info!(api_url = %config.api_url, "using backend");
    config
}
