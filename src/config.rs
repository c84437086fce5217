use anyhow::{Context, Result};
use std::env;
use url::Url;

/// Default streaming feed endpoint (blockchain.info inventory socket).
pub const DEFAULT_FEED_URL: &str = "wss://ws.blockchain.info/inv";

/// Default transaction lookup API base (BlockCypher BTC mainnet).
pub const DEFAULT_API_BASE: &str = "https://api.blockcypher.com/v1/btc/main";

/// Runtime configuration for the application.
///
/// Compiled defaults point at the public endpoints; both can be overridden
/// through the environment (`TXWATCH_FEED_URL`, `TXWATCH_API_URL`), typically
/// via a `.env` file loaded in `main`.
#[derive(Clone, Debug)]
pub struct Config {
    /// WebSocket endpoint for the unconfirmed transaction feed.
    pub feed_url: String,
    /// Base URL of the transaction lookup REST API.
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Config {
    /// Build a config from the environment, falling back to the defaults.
    ///
    /// An override that is present but not a valid URL is a startup error
    /// rather than a silent fallback.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(feed_url) = env::var("TXWATCH_FEED_URL") {
            let feed_url = feed_url.trim().to_string();
            if !feed_url.is_empty() {
                validate_ws_url(&feed_url)?;
                config.feed_url = feed_url;
            }
        }

        if let Ok(api_base) = env::var("TXWATCH_API_URL") {
            let api_base = api_base.trim().trim_end_matches('/').to_string();
            if !api_base.is_empty() {
                validate_http_url(&api_base)?;
                config.api_base = api_base;
            }
        }

        Ok(config)
    }
}

fn validate_ws_url(s: &str) -> Result<()> {
    let url = Url::parse(s).with_context(|| format!("Invalid feed URL: {}", s))?;
    match url.scheme() {
        "ws" | "wss" => Ok(()),
        other => anyhow::bail!("Feed URL must use ws:// or wss://, got {}://", other),
    }
}

fn validate_http_url(s: &str) -> Result<()> {
    let url = Url::parse(s).with_context(|| format!("Invalid API URL: {}", s))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!("API URL must use http:// or https://, got {}://", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let config = Config::default();
        assert_eq!(config.feed_url, "wss://ws.blockchain.info/inv");
        assert_eq!(config.api_base, "https://api.blockcypher.com/v1/btc/main");
    }

    #[test]
    fn test_validate_ws_url_accepts_ws_schemes() {
        assert!(validate_ws_url("wss://ws.blockchain.info/inv").is_ok());
        assert!(validate_ws_url("ws://localhost:8080/inv").is_ok());
    }

    #[test]
    fn test_validate_ws_url_rejects_other_schemes() {
        assert!(validate_ws_url("https://ws.blockchain.info/inv").is_err());
        assert!(validate_ws_url("not a url").is_err());
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("https://api.blockcypher.com/v1/btc/main").is_ok());
        assert!(validate_http_url("wss://api.blockcypher.com").is_err());
    }
}
