//! API request handlers

use anyhow::Result;
use chrono::Utc;
use tracing::{error, warn};

use super::models::{EpisodeFeed, HealthResponse};
use crate::error::SummaryError;
use crate::summary::{CachedSummaryInfo, SummaryCache, SummaryGenerator, SummaryService, TaggedSummary};
use crate::youtube::{ChannelStats, FeedReader, VideoData, YouTubeScraper};

/// Handle health check requests
pub fn health_check(generator: &SummaryGenerator) -> HealthResponse {
    HealthResponse {
        status: "ok".to_string(),
        message: "Episode summarizer API is running".to_string(),
        timestamp: Utc::now(),
        providers: generator.provider_status(),
    }
}

/// Handle channel statistics requests; never fails
pub async fn channel_stats(scraper: &YouTubeScraper) -> ChannelStats {
    scraper.channel_stats().await
}

/// Handle summary requests
pub async fn get_summary(
    service: &SummaryService,
    video_id: &str,
    refresh: bool,
) -> Result<TaggedSummary, SummaryError> {
    let result = service.summary(video_id, refresh).await;
    if let Err(e) = &result {
        match e {
            SummaryError::InvalidVideoId(_) | SummaryError::VideoUnavailable(_) => {
                warn!("Summary request for {} rejected: {}", video_id, e)
            }
            _ => error!("❌ Summary generation failed for {}: {}", video_id, e),
        }
    }
    result
}

/// Handle video metadata requests
pub async fn get_video(service: &SummaryService, video_id: &str) -> Result<VideoData, SummaryError> {
    service.video(video_id).await
}

/// Handle cache listing requests
pub async fn list_cached_summaries(cache: &SummaryCache) -> Result<Vec<CachedSummaryInfo>> {
    cache.list().await.map_err(|e| {
        error!("❌ Failed to list cached summaries: {}", e);
        e
    })
}

/// Handle episode feed requests; fetch failures degrade to an empty list
pub async fn latest_episodes(feed: &FeedReader) -> EpisodeFeed {
    match feed.latest_episodes().await {
        Ok(episodes) => EpisodeFeed {
            episodes,
            fetched_at: Utc::now(),
            error: None,
        },
        Err(e) => {
            warn!("Episode feed unavailable: {}", e);
            EpisodeFeed {
                episodes: Vec::new(),
                fetched_at: Utc::now(),
                error: Some(e.to_string()),
            }
        }
    }
}
