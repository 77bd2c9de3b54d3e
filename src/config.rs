use std::path::PathBuf;
use std::time::Duration;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::ratelimit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW, RateLimiter};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_YT_DLP: &str = "yt-dlp";
pub const DEFAULT_SUBTITLE_LANGS: &str = "en.*,en";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// The single origin allowed to call the API from a browser
    pub allowed_origin: Option<String>,
    /// Path or name of the yt-dlp executable
    pub yt_dlp: Option<PathBuf>,
    pub subtitle_langs: Option<String>,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: Option<usize>,
    pub window_secs: Option<u64>,
}

impl Config {
    /// Load config from ~/.config/ytscribe/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn host(&self) -> String {
        self.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn allowed_origin(&self) -> String {
        self.allowed_origin
            .clone()
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string())
    }

    pub fn yt_dlp(&self) -> PathBuf {
        self.yt_dlp.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_YT_DLP))
    }

    pub fn subtitle_langs(&self) -> String {
        self.subtitle_langs
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBTITLE_LANGS.to_string())
    }
}

impl RateLimitConfig {
    pub fn limiter(&self) -> RateLimiter {
        let window = self.window_secs.map(Duration::from_secs).unwrap_or(DEFAULT_WINDOW);
        RateLimiter::new(self.max_requests.unwrap_or(DEFAULT_MAX_REQUESTS), window)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytscribe")
        .join("config.toml")
}
