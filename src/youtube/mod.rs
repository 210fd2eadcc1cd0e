/// YouTube page scraping
///
/// Channel statistics, watch-page metadata, caption transcripts and the channel's upload feed,
/// all pulled from public pages without the Data API.

pub mod counts;
pub mod rules;
pub mod scraper;
pub mod captions;
pub mod feed;
pub mod text;

pub use captions::CaptionFetcher;
pub use counts::parse_count;
pub use feed::{Episode, FeedReader};
pub use rules::{ChannelCounts, ExtractionRules, VideoPage};
pub use scraper::YouTubeScraper;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::ScraperConfig;

/// Channel statistics as served to the site; counts are already defaulted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub subscribers: u64,
    pub total_views: u64,
    pub video_count: u64,
    pub fetched_at: DateTime<Utc>,
    /// Why live values could not be fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Metadata and transcript scraped for one video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoData {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub transcript: String,
    pub has_transcript: bool,
}

/// Raw response from an upstream page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can GET a page as a browser would
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// `PageFetcher` backed by reqwest with a browser identity and a request deadline
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&config.accept_language)?);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedPage { status, body })
    }
}

/// Video identifiers are used as file names and URL parameters
pub fn is_valid_video_id(video_id: &str) -> bool {
    !video_id.is_empty()
        && video_id.len() <= 64
        && video_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
