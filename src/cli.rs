//! Command-line and environment configuration
//!
//! Every option can be given as a flag or through the environment, so the
//! upstream origin and the selector set can be overridden per deployment.

use std::net::IpAddr;
use std::path::PathBuf;

use chrono::Duration;
use clap::Parser;
use thiserror::Error;
use url::Url;

use crate::cache::DEFAULT_TTL_SECS;
use crate::data::fetcher::DEFAULT_BASE_URL;
use crate::data::{SelectorConfig, SelectorError, Selectors};

/// Error types for startup configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The upstream origin is not an absolute http(s) URL
    #[error("Invalid base URL '{0}': expected an absolute http or https URL")]
    InvalidBaseUrl(String),

    /// The cache lifetime does not fit a duration
    #[error("Invalid cache TTL: {0} seconds")]
    InvalidCacheTtl(u64),

    #[error(transparent)]
    Selectors(#[from] SelectorError),
}

/// Restaurant Menu API - serve a restaurant website's menu as JSON
#[derive(Parser, Debug)]
#[command(name = "menu-proxy")]
#[command(about = "Scrapes a restaurant website and serves its menu as JSON")]
#[command(version)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Origin of the restaurant website
    #[arg(long, env = "RESTAURANT_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Response cache lifetime in seconds, 0 disables caching
    #[arg(long = "cache-ttl", env = "CACHE_TTL_SECS", default_value_t = DEFAULT_TTL_SECS as u64)]
    pub cache_ttl_secs: u64,

    /// JSON file overriding the CSS selectors used for scraping
    ///
    /// Only the fields present in the file are replaced, for example:
    ///   { "items": { "container": "li.dish" } }
    #[arg(long, env = "MENU_SELECTORS", value_name = "FILE")]
    pub selectors: Option<PathBuf>,
}

/// Validated configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub base_url: Url,
    /// `None` when caching is disabled
    pub cache_ttl: Option<Duration>,
    pub selectors: Selectors,
}

/// Parses and checks the upstream origin
pub fn parse_base_url(s: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(s).map_err(|_| ConfigError::InvalidBaseUrl(s.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl(s.to_string()));
    }
    Ok(url)
}

impl ServerConfig {
    /// Creates a ServerConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(ServerConfig)` with the selector set compiled
    /// * `Err(ConfigError)` if the URL, the selector file or a selector is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&cli.base_url)?;

        let selector_config = match &cli.selectors {
            Some(path) => SelectorConfig::load(path)?,
            None => SelectorConfig::default(),
        };
        let selectors = selector_config.compile()?;

        let cache_ttl = match cli.cache_ttl_secs {
            0 => None,
            secs => Some(
                i64::try_from(secs)
                    .ok()
                    .and_then(Duration::try_seconds)
                    .ok_or(ConfigError::InvalidCacheTtl(secs))?,
            ),
        };

        Ok(ServerConfig {
            host: cli.host,
            port: cli.port,
            base_url,
            cache_ttl,
            selectors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_parse_no_args_uses_defaults() {
        let cli = Cli::try_parse_from(["menu-proxy"]).unwrap();
        if std::env::var_os("PORT").is_none() {
            assert_eq!(cli.port, 3000);
        }
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
        assert_eq!(cli.cache_ttl_secs, 600);
        assert!(cli.selectors.is_none());
    }

    #[test]
    fn test_cli_parse_overrides() {
        let cli = Cli::try_parse_from([
            "menu-proxy",
            "--port",
            "8080",
            "--base-url",
            "http://localhost:9000/",
            "--cache-ttl",
            "0",
        ])
        .unwrap();

        assert_eq!(cli.port, 8080);
        assert_eq!(cli.base_url, "http://localhost:9000/");
        assert_eq!(cli.cache_ttl_secs, 0);
    }

    #[test]
    fn test_server_config_from_defaults() {
        let cli = Cli::try_parse_from(["menu-proxy", "--port", "3000"]).unwrap();
        let config = ServerConfig::from_cli(&cli).unwrap();

        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.cache_ttl, Some(Duration::seconds(600)));
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cli = Cli::try_parse_from(["menu-proxy", "--cache-ttl", "0"]).unwrap();
        let config = ServerConfig::from_cli(&cli).unwrap();

        assert!(config.cache_ttl.is_none());
    }

    #[test]
    fn test_huge_ttl_is_rejected() {
        let cli = Cli::try_parse_from(["menu-proxy", "--cache-ttl", &u64::MAX.to_string()]).unwrap();
        let err = ServerConfig::from_cli(&cli).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidCacheTtl(_)));
    }

    #[test]
    fn test_parse_base_url_rejects_non_http() {
        assert!(parse_base_url("https://example.com").is_ok());
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("mailto:chef@example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_invalid_base_url_fails_config() {
        let cli = Cli::try_parse_from(["menu-proxy", "--base-url", "nope"]).unwrap();
        let err = ServerConfig::from_cli(&cli).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_selector_file_is_applied() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "paths": {{ "category": "menu" }} }}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["menu-proxy", "--selectors", &path]).unwrap();
        let config = ServerConfig::from_cli(&cli).unwrap();

        assert_eq!(config.selectors.paths.category, "menu");
    }

    #[test]
    fn test_invalid_selector_in_file_fails_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "specials": {{ "name": "::::" }} }}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["menu-proxy", "--selectors", &path]).unwrap();
        let err = ServerConfig::from_cli(&cli).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Selectors(SelectorError::InvalidSelector { field: "specials.name", .. })
        ));
    }
}
