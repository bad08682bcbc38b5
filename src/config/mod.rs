use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{MAX_TITLE_CACHE, MAX_TRANSCRIPT_CACHE};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Egress proxy for the transcript provider
    pub proxy: ProxyConfig,

    /// Transcript fetching and caching
    pub transcript: TranscriptConfig,

    /// Title lookup settings
    pub title: TitleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Proxy username (`WEBSHARE_USER`)
    pub username: Option<String>,

    /// Proxy password (`WEBSHARE_PASS`)
    pub password: Option<String>,

    /// Country codes the proxy egress is restricted to (`WEBSHARE_LOCATIONS`)
    pub filter_ip_locations: Vec<String>,

    /// Proxy host
    pub domain: String,

    /// Proxy port
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Language codes tried in order before falling back to the first track
    pub preferred_languages: Vec<String>,

    /// Maximum number of cached transcripts
    pub cache_capacity: usize,

    /// Retries after the initial attempt
    pub max_retries: u32,

    /// Linear backoff step in milliseconds
    pub backoff_step_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    /// oEmbed endpoint queried for titles
    pub oembed_url: String,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Maximum number of cached titles
    pub cache_capacity: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            filter_ip_locations: vec!["us".to_string()],
            domain: "p.webshare.io".to_string(),
            port: 80,
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            preferred_languages: vec!["en".to_string(), "en-US".to_string(), "en-GB".to_string()],
            cache_capacity: MAX_TRANSCRIPT_CACHE,
            max_retries: 3,
            backoff_step_ms: 500,
        }
    }
}

impl TitleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            oembed_url: "https://www.youtube.com/oembed".to_string(),
            timeout_secs: 10,
            cache_capacity: MAX_TITLE_CACHE,
        }
    }
}

impl Config {
    /// Load configuration from file (if any), then apply environment overrides
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::config_path() {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from {}", path.display());

        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        serde_yaml::from_str(&content).context("Failed to parse config file")
    }

    /// Get configuration file path, if one exists
    fn config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("yt-transcript").join("config.yaml"))
            .filter(|path| path.exists())
    }

    /// Overlay proxy settings from the environment
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(user) = non_empty("WEBSHARE_USER") {
            self.proxy.username = Some(user);
        }
        if let Some(pass) = non_empty("WEBSHARE_PASS") {
            self.proxy.password = Some(pass);
        }
        if let Some(locations) = non_empty("WEBSHARE_LOCATIONS") {
            self.proxy.filter_ip_locations = locations
                .split(',')
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.proxy.username.is_some() != self.proxy.password.is_some() {
            anyhow::bail!("Proxy username and password must be configured together");
        }

        if self.transcript.cache_capacity == 0 {
            anyhow::bail!("Transcript cache capacity must be greater than zero");
        }

        if self.title.cache_capacity == 0 {
            anyhow::bail!("Title cache capacity must be greater than zero");
        }

        if self.title.oembed_url.trim().is_empty() {
            anyhow::bail!("Title oEmbed URL must be configured");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.transcript.preferred_languages, ["en", "en-US", "en-GB"]);
        assert_eq!(config.transcript.cache_capacity, 50);
        assert_eq!(config.transcript.max_retries, 3);
        assert_eq!(config.title.cache_capacity, 128);
        assert_eq!(config.title.timeout(), Duration::from_secs(10));
        assert_eq!(config.proxy.filter_ip_locations, ["us"]);
        assert!(config.proxy.username.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str(
            "transcript:\n  preferred_languages: [de]\n  max_retries: 1\n",
        )
        .unwrap();

        assert_eq!(config.transcript.preferred_languages, ["de"]);
        assert_eq!(config.transcript.max_retries, 1);
        assert_eq!(config.transcript.backoff_step_ms, 500);
        assert_eq!(config.title.oembed_url, "https://www.youtube.com/oembed");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[
            ("WEBSHARE_USER", "alice"),
            ("WEBSHARE_PASS", "hunter2"),
            ("WEBSHARE_LOCATIONS", "us, ca,"),
        ]));

        assert_eq!(config.proxy.username.as_deref(), Some("alice"));
        assert_eq!(config.proxy.password.as_deref(), Some("hunter2"));
        assert_eq!(config.proxy.filter_ip_locations, ["us", "ca"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("WEBSHARE_USER", "  ")]));
        assert!(config.proxy.username.is_none());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("WEBSHARE_USER", "alice")]));
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.transcript.cache_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.title.oembed_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/yt-transcript.yaml"))).is_err());
    }
}
