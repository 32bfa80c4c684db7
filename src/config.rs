use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Environment variables that override file and default settings
const ENV_KEYS: &[&str] = &[
    "HOST",
    "PORT",
    "WORKERS",
    "ALLOWED_ORIGINS",
    "MAX_UPLOAD_BYTES",
    "EXTRACT_TIMEOUT_SECS",
    "OCR_LANGUAGE",
];

/// Configuration for the extraction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interface to bind
    pub host: String,
    /// Listening port
    pub port: u16,
    /// Number of runtime worker threads
    pub workers: usize,
    /// Comma-separated list of CORS origins, `*` for any
    pub allowed_origins: String,
    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,
    /// How long a request waits for its extraction before answering 500; unset waits indefinitely.
    /// The response is bounded, the extractor is not: a blocking parse keeps its thread and
    /// payload until it finishes on its own.
    pub extract_timeout_secs: Option<u64>,
    /// Tesseract language used when OCR-ing images
    pub ocr_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: 4,
            allowed_origins: "*".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
            extract_timeout_secs: None,
            ocr_language: "eng".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the optional config file, then the environment
    pub fn load() -> Result<Config> {
        let config_path = get_config_path()?;
        let config: Config = Self::figment(&config_path)
            .extract()
            .with_context(|| format!("Failed to load configuration (file: {})", config_path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Layered configuration sources; a missing file contributes nothing
    pub fn figment(config_path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Json::file(config_path))
            .merge(Env::raw().only(ENV_KEYS))
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            anyhow::bail!("Config validation: workers must be at least 1");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("Config validation: max_upload_bytes must be at least 1");
        }
        if self.origins().is_empty() {
            anyhow::bail!("Config validation: allowed_origins cannot be empty. Use \"*\" to allow any origin.");
        }
        Ok(())
    }

    /// Individual CORS origins, trimmed, with empty entries dropped
    pub fn origins(&self) -> Vec<&str> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect()
    }

    pub fn allows_any_origin(&self) -> bool {
        self.origins().contains(&"*")
    }

    pub fn extract_timeout(&self) -> Option<Duration> {
        self.extract_timeout_secs.map(Duration::from_secs)
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        let ip = self
            .host
            .parse::<IpAddr>()
            .with_context(|| format!("Invalid bind host: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Get the platform-specific configuration file path
///
/// # Returns
/// * Unix: `~/.config/docu-extract/config.json`
/// * macOS: `~/Library/Application Support/docu-extract/config.json`
/// * Windows: `%APPDATA%\docu-extract\config.json`
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Failed to get config directory"))?;

    let mut config_path = config_dir;
    config_path.push("docu-extract");
    config_path.push("config.json");

    Ok(config_path)
}
