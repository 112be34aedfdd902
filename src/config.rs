//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::pricing::WordTiers;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the marketplace serving the pricing endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the pricing endpoint under the base URL
    #[serde(default = "default_price_path")]
    pub price_path: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Marker appended to express-tier prices
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Extra-word tiers offered when no modal HTML is supplied
    #[serde(default = "default_word_tiers")]
    pub word_tiers: WordTiers,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_price_path() -> String {
    "/additional_price".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_word_tiers() -> WordTiers {
    WordTiers::new([100, 200, 300, 500, 1000])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            price_path: default_price_path(),
            proxy: None,
            timeout_secs: default_timeout_secs(),
            currency: default_currency(),
            word_tiers: default_word_tiers(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("exchange-quote").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var("EXQ_BASE_URL") {
            if !base_url.is_empty() {
                self.base_url = base_url;
            }
        }

        if let Ok(proxy) = std::env::var("EXQ_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(currency) = std::env::var("EXQ_CURRENCY") {
            self.currency = currency;
        }

        if let Ok(timeout) = std::env::var("EXQ_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }

        self
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
