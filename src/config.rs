use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
///
/// Loaded once at startup and treated as read-only for the lifetime of the
/// process; tools hold their own copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the SearXNG instance
    #[serde(default = "default_searxng_url")]
    pub searxng_url: String,

    /// Default timeout for HTTP requests in seconds
    #[serde(default = "default_timeout")]
    pub default_timeout: u64,

    /// Maximum number of search results to return
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Maximum content length in characters when fetching pages
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,

    /// Enable debug logging to a file
    #[serde(default)]
    pub debug: bool,

    /// Override for the debug log file location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_log_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            searxng_url: default_searxng_url(),
            default_timeout: default_timeout(),
            max_results: default_max_results(),
            max_content_length: default_max_content_length(),
            debug: false,
            debug_log_path: None,
        }
    }
}

fn default_searxng_url() -> String {
    "http://localhost:8888".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_results() -> usize {
    10
}

fn default_max_content_length() -> usize {
    50000
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Failed to get config directory")?
        .join("websearch");

    // Create config directory if it doesn't exist
    fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

    Ok(config_dir.join("config.toml"))
}

/// Load configuration from file, or create default if not exists
pub fn load_or_create_config() -> Result<Config> {
    let path = config_path()?;

    if path.exists() {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    } else {
        let config = Config::default();
        save_config(&config)?;

        println!("Created default config at: {}", path.display());
        println!("Point searxng_url at your SearXNG instance to enable search.");

        Ok(config)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&path, content).context("Failed to write config file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.searxng_url, "http://localhost:8888");
        assert_eq!(config.default_timeout, 30);
        assert_eq!(config.max_results, 10);
        assert_eq!(config.max_content_length, 50000);
        assert!(!config.debug);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str("searxng_url = \"http://search.local\"").unwrap();
        assert_eq!(config.searxng_url, "http://search.local");
        assert_eq!(config.default_timeout, 30);
        assert_eq!(config.max_results, 10);
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            searxng_url: "http://10.0.0.5:8080/".to_string(),
            default_timeout: 5,
            max_results: 3,
            max_content_length: 1000,
            debug: true,
            debug_log_path: Some("/tmp/websearch.log".to_string()),
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.searxng_url, config.searxng_url);
        assert_eq!(parsed.default_timeout, 5);
        assert_eq!(parsed.debug_log_path, config.debug_log_path);
    }
}
