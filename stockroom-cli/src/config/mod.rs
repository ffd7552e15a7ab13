//! Client configuration
//!
//! Loaded from `<config_dir>/stockroom/config.toml` when present, with
//! `STOCKROOM_API_URL` (from the environment or a `.env` file) overriding the
//! API base URL. Every section falls back to sane defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::resilience::RetryConfig;
use crate::guard::GuardConfig;

const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = "stockroom";
pub const API_URL_ENV: &str = "STOCKROOM_API_URL";

/// Directory holding the config and session files
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine the user config directory")?;
    Ok(base.join(APP_DIR))
}

/// HTTP API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the inventory API, without a trailing slash
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Send an `X-Request-Id` header with every request
    pub correlation_ids: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout_secs: 30,
            correlation_ids: true,
        }
    }
}

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub retry: RetryConfig,
    pub guard: GuardConfig,
}

impl Config {
    /// Create a new builder for Config
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Load `.env`, the config file in the default location and env overrides
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }

        let path = config_dir()?.join(CONFIG_FILE);
        let mut config = Self::load_from(&path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load the config file at `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse TOML config text
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.api.base_url = normalize_base_url(&config.api.base_url);
        Ok(config)
    }

    /// Point the client at another API, e.g. from `--api-url`
    pub fn set_base_url(&mut self, url: &str) {
        self.api.base_url = normalize_base_url(url);
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                log::debug!("Using API URL from {}", API_URL_ENV);
                self.set_base_url(&url);
            }
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Builder for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL
    pub fn base_url(mut self, url: &str) -> Self {
        self.config.api.base_url = normalize_base_url(url);
        self
    }

    /// Set the request timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.api.timeout_secs = secs;
        self
    }

    /// Configure retry behavior for catalog reads
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set max retry attempts
    pub fn max_retries(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    /// Delay before an unauthenticated user is sent to the landing route
    pub fn redirect_delay_ms(mut self, ms: u64) -> Self {
        self.config.guard.redirect_delay_ms = ms;
        self
    }

    pub fn landing_route(mut self, route: &str) -> Self {
        self.config.guard.landing_route = route.to_string();
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}
