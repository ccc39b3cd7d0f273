//! TOML configuration.
//!
//! ```toml
//! [source]
//! url = "https://example.org/corpus.cex"   # or: path = "./cex/corpus.cex"
//! timeout_secs = 30
//!
//! [server]
//! bind = "127.0.0.1:8000"
//! load_on_start = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the corpus comes from. Exactly one of `url` or `path` is set.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_load_on_start")]
    pub load_on_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            load_on_start: default_load_on_start(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}
fn default_load_on_start() -> bool {
    true
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content)?;
    Ok(config)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    match (&config.source.url, &config.source.path) {
        (Some(_), Some(_)) => anyhow::bail!("source.url and source.path are mutually exclusive"),
        (None, None) => anyhow::bail!("one of source.url or source.path must be set"),
        (Some(url), None) => {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("source.url must be an http:// or https:// URL, got '{}'", url);
            }
        }
        (None, Some(_)) => {}
    }

    if config.source.timeout_secs == 0 {
        anyhow::bail!("source.timeout_secs must be > 0");
    }

    Ok(config)
}
