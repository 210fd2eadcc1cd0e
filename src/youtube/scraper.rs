/// Channel and watch page scraping
use super::captions::CaptionFetcher;
use super::rules::{ChannelCounts, ExtractionRules};
use super::{ChannelStats, PageFetcher, VideoData};
use crate::config::{ChannelConfig, Config};
use anyhow::{anyhow, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Scrapes the channel page and individual watch pages
#[derive(Clone)]
pub struct YouTubeScraper {
    fetcher: Arc<dyn PageFetcher>,
    rules: ExtractionRules,
    captions: CaptionFetcher,
    channel: ChannelConfig,
    watch_url_base: String,
}

impl YouTubeScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Result<Self> {
        Ok(Self {
            captions: CaptionFetcher::new(fetcher.clone(), config.scraper.max_transcript_chars)?,
            rules: ExtractionRules::new()?,
            channel: config.channel.clone(),
            watch_url_base: config.scraper.watch_url_base.clone(),
            fetcher,
        })
    }

    /// Current channel statistics.
    ///
    /// Never fails: missing counts take the configured defaults and fetch errors are reported
    /// through `ChannelStats::error`.
    pub async fn channel_stats(&self) -> ChannelStats {
        let defaults = &self.channel;
        match self.fetch_channel_counts().await {
            Ok(counts) => {
                info!(
                    "📊 Channel stats - subscribers: {:?}, views: {:?}, videos: {:?}",
                    counts.subscribers, counts.total_views, counts.video_count
                );
                ChannelStats {
                    subscribers: counts.subscribers.unwrap_or(defaults.default_subscribers),
                    total_views: counts.total_views.unwrap_or(defaults.default_total_views),
                    video_count: counts.video_count.unwrap_or(defaults.default_video_count),
                    fetched_at: Utc::now(),
                    error: None,
                }
            }
            Err(e) => {
                warn!("Channel stats unavailable, using defaults: {}", e);
                ChannelStats {
                    subscribers: defaults.default_subscribers,
                    total_views: defaults.default_total_views,
                    video_count: defaults.default_video_count,
                    fetched_at: Utc::now(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn fetch_channel_counts(&self) -> Result<ChannelCounts> {
        let page = self.fetcher.fetch(&self.channel.channel_url).await?;
        if !page.is_success() {
            return Err(anyhow!("Failed to fetch channel page (status {})", page.status));
        }
        Ok(self.rules.channel_counts(&page.body))
    }

    /// Scrape metadata and transcript for one video.
    ///
    /// `None` means the video is unavailable: the page could not be fetched, returned a
    /// non-success status, or contained neither player data nor a title.
    pub async fn video_data(&self, video_id: &str) -> Option<VideoData> {
        let url = format!("{}{}", self.watch_url_base, urlencoding::encode(video_id));

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Video page fetch failed for {}: {}", video_id, e);
                return None;
            }
        };

        if !page.is_success() {
            warn!("Video page for {} returned status {}", video_id, page.status);
            return None;
        }

        let Some(video_page) = self.rules.video_page(&page.body) else {
            warn!("No player data or title found for {}", video_id);
            return None;
        };

        let transcript = match &video_page.caption_url {
            Some(caption_url) => self.captions.fetch_transcript(caption_url).await.unwrap_or_default(),
            None => String::new(),
        };

        info!("🎬 Video {}: {}", video_id, video_page.title);
        if transcript.is_empty() {
            info!("📝 Transcript not available for {}", video_id);
        } else {
            info!("📝 Transcript for {}: {} chars", video_id, transcript.chars().count());
        }

        Some(VideoData {
            video_id: video_id.to_string(),
            title: video_page.title,
            description: video_page.description,
            has_transcript: !transcript.is_empty(),
            transcript,
        })
    }
}
