use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use crate::llm::{LLMConfig, LLMProvider, PartialLLMConfig};

/// Configuration for the episode summarizer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Channel page location and fallback statistics
    pub channel: ChannelConfig,

    /// Page and caption scraping settings
    pub scraper: ScraperConfig,

    /// Summary providers
    pub llm: SummarizerConfig,

    /// Summary cache settings
    pub cache: CacheConfig,

    /// Channel upload feed settings
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Default log filter when RUST_LOG is not set
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Public channel page scraped for statistics
    pub channel_url: String,

    /// Last known values, served when live extraction fails
    pub default_subscribers: u64,
    pub default_total_views: u64,
    pub default_video_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Browser identity sent with every page request
    pub user_agent: String,

    /// Accept-Language header so counts come back in English notation
    pub accept_language: String,

    /// Deadline for each outbound page request (seconds)
    pub request_timeout_seconds: u64,

    /// Watch page URL; the video id is appended
    pub watch_url_base: String,

    /// Transcript length limit in characters
    pub max_transcript_chars: usize,
}

/// Primary and fallback summary providers
///
/// A provider table that omits `provider` keeps its slot's provider: Perplexity for the primary
/// and Gemini for the fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    #[serde(deserialize_with = "primary_provider")]
    pub primary: LLMConfig,
    #[serde(deserialize_with = "fallback_provider")]
    pub fallback: LLMConfig,
}

fn primary_provider<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LLMConfig, D::Error> {
    Ok(PartialLLMConfig::deserialize(deserializer)?.resolve(LLMProvider::Perplexity))
}

fn fallback_provider<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LLMConfig, D::Error> {
    Ok(PartialLLMConfig::deserialize(deserializer)?.resolve(LLMProvider::Gemini))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// One JSON file per video id lives here
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Feed URL; the channel id is appended
    pub feed_url_base: String,

    /// Channel id (not the @handle)
    pub channel_id: String,

    /// Number of feed entries considered
    pub max_results: usize,

    /// Episode description length limit in characters
    pub description_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            log_level: "episode_summarizer=info,tower_http=info,warn".to_string(),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            channel_url: "https://www.youtube.com/@notinvestmentadviceVC".to_string(),
            default_subscribers: 63,
            default_total_views: 520,
            default_video_count: 20,
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            request_timeout_seconds: 20,
            watch_url_base: "https://www.youtube.com/watch?v=".to_string(),
            max_transcript_chars: 30_000,
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            primary: LLMConfig::perplexity(),
            fallback: LLMConfig::gemini(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./cache"),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            feed_url_base: "https://www.youtube.com/feeds/videos.xml?channel_id=".to_string(),
            channel_id: "UCkrNV__eDuSmX2Y5GYU5ulQ".to_string(),
            max_results: 12,
            description_chars: 200,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the first default location that exists,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_default_locations(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    fn from_default_locations() -> Self {
        let config_paths = ["episode-summarizer.toml", "config/episode-summarizer.toml"];

        for path in &config_paths {
            let path = Path::new(path);
            if !path.exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("{:#}", e),
            }
        }

        Self::default()
    }

    /// Override credentials and deployment settings from the environment
    pub fn apply_env(&mut self) {
        let env = |key: &str| std::env::var(key).ok().filter(|value| !value.trim().is_empty());

        for provider in [&mut self.llm.primary, &mut self.llm.fallback] {
            let key = match provider.provider {
                LLMProvider::Perplexity => env("PERPLEXITY_API_KEY"),
                LLMProvider::Gemini => env("GEMINI_API_KEY"),
            };
            if key.is_some() {
                provider.api_key = key;
            }
        }

        if let Some(port) = env("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }

        if let Some(cache_dir) = env("SUMMARY_CACHE_DIR") {
            self.cache.cache_dir = PathBuf::from(cache_dir);
        }

        if let Some(log_level) = env("EPISODE_SUMMARIZER_LOG_LEVEL") {
            self.server.log_level = log_level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.channel.channel_url.trim().is_empty() {
            return Err(anyhow!("channel_url must not be empty"));
        }

        if self.scraper.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }

        if self.scraper.max_transcript_chars == 0 {
            return Err(anyhow!("max_transcript_chars must be greater than 0"));
        }

        for provider in [&self.llm.primary, &self.llm.fallback] {
            if provider.timeout_seconds == 0 {
                return Err(anyhow!("{} timeout_seconds must be greater than 0", provider.provider));
            }
        }

        if self.llm.primary.api_key.is_none() && self.llm.fallback.api_key.is_none() {
            tracing::warn!("⚠️ No summary provider has an API key; summary generation will fail");
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Episode Summarizer Configuration:\n\
            - Listen: {}:{}\n\
            - Channel: {}\n\
            - Cache Directory: {}\n\
            - Primary Provider: {} ({}) {}\n\
            - Fallback Provider: {} ({}) {}",
            self.server.host,
            self.server.port,
            self.channel.channel_url,
            self.cache.cache_dir.display(),
            self.llm.primary.provider,
            self.llm.primary.model,
            if self.llm.primary.api_key.is_some() { "✓ configured" } else { "✗ not set" },
            self.llm.fallback.provider,
            self.llm.fallback.model,
            if self.llm.fallback.api_key.is_some() { "✓ configured" } else { "✗ not set" },
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.config.cache.cache_dir = dir;
        self
    }

    pub fn with_primary_api_key(mut self, api_key: String) -> Self {
        self.config.llm.primary.api_key = Some(api_key);
        self
    }

    pub fn with_fallback_api_key(mut self, api_key: String) -> Self {
        self.config.llm.fallback.api_key = Some(api_key);
        self
    }

    pub fn with_request_timeout(mut self, seconds: u64) -> Self {
        self.config.scraper.request_timeout_seconds = seconds;
        self
    }

    pub fn with_max_transcript_chars(mut self, max_chars: usize) -> Self {
        self.config.scraper.max_transcript_chars = max_chars;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
