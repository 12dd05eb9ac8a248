use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_LANGUAGES: &[&str] = &["en", "en-US", "en-GB", "en-AU", "en-CA"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transcript provider settings
    pub provider: ProviderConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Scheme and host of the YouTube frontend
    pub base_url: String,

    pub user_agent: String,

    /// Sent as Accept-Language on every request
    pub accept_language: String,

    /// Track language the provider fetches
    pub transcript_language: String,

    /// Innertube client identity
    pub innertube_client_name: String,
    pub innertube_client_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language preferences used when none are given on the command line
    pub default_languages: Vec<String>,

    /// Pretty-print the JSON output
    pub pretty: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            user_agent: concat!("yt-transcript/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_language: "en-US".to_string(),
            transcript_language: "en".to_string(),
            innertube_client_name: "ANDROID".to_string(),
            innertube_client_version: "20.10.38".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            pretty: false,
        }
    }
}

impl Config {
    /// Load configuration from an explicit file, the usual locations, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::config_path(),
        };

        let config = match config_path {
            Some(path) if explicit.is_some() || path.exists() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            _ => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        serde_yaml::from_str(&content).context("Failed to parse config file")
    }

    /// Get configuration file path
    fn config_path() -> Option<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir().map(|dir| dir.join("yt-transcript").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.provider.base_url)
            .with_context(|| format!("Invalid provider base URL: {}", self.provider.base_url))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("Provider base URL must use HTTP or HTTPS protocol");
        }

        if self.provider.transcript_language.trim().is_empty() {
            anyhow::bail!("Provider transcript language must not be empty");
        }

        Ok(())
    }

    /// Override the provider base URL
    pub fn with_base_url(mut self, base_url: Option<String>) -> Result<Self> {
        if let Some(base_url) = base_url {
            self.provider.base_url = base_url;
            self.validate()?;
        }
        Ok(self)
    }
}
