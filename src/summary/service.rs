/// Cache-first summary retrieval
use super::{SummaryCache, SummaryGenerator, TaggedSummary};
use crate::error::SummaryError;
use crate::youtube::{is_valid_video_id, VideoData, YouTubeScraper};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Serves summaries from the cache and generates them on a miss or forced refresh.
///
/// Concurrent requests for the same video share one generation: later callers wait on a
/// per-video slot and then find the fresh cache entry.
pub struct SummaryService {
    scraper: YouTubeScraper,
    generator: SummaryGenerator,
    cache: SummaryCache,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SummaryService {
    pub fn new(scraper: YouTubeScraper, generator: SummaryGenerator, cache: SummaryCache) -> Self {
        Self {
            scraper,
            generator,
            cache,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn scraper(&self) -> &YouTubeScraper {
        &self.scraper
    }

    pub fn generator(&self) -> &SummaryGenerator {
        &self.generator
    }

    pub fn cache(&self) -> &SummaryCache {
        &self.cache
    }

    /// Scraped watch page data for one video
    pub async fn video(&self, video_id: &str) -> Result<VideoData, SummaryError> {
        ensure_valid(video_id)?;
        self.scraper
            .video_data(video_id)
            .await
            .ok_or_else(|| SummaryError::VideoUnavailable(video_id.to_string()))
    }

    /// Cached summary, or a newly generated one when missing or `refresh` is set
    pub async fn summary(&self, video_id: &str, refresh: bool) -> Result<TaggedSummary, SummaryError> {
        ensure_valid(video_id)?;

        if !refresh {
            if let Some(summary) = self.cache.get(video_id).await {
                debug!("📚 Serving cached summary for {}", video_id);
                return Ok(TaggedSummary { summary, cached: true });
            }
        }

        let slot = self.generation_slot(video_id).await;
        let result = {
            let _guard = slot.lock().await;
            self.generate_in_slot(video_id, refresh).await
        };
        self.release_slot(video_id, slot).await;

        result
    }

    async fn generate_in_slot(&self, video_id: &str, refresh: bool) -> Result<TaggedSummary, SummaryError> {
        // Another request may have finished generating while we waited
        if !refresh {
            if let Some(summary) = self.cache.get(video_id).await {
                return Ok(TaggedSummary { summary, cached: true });
            }
        }

        info!("📝 Generating summary for {}{}", video_id, if refresh { " (refresh)" } else { "" });

        let video = self
            .scraper
            .video_data(video_id)
            .await
            .ok_or_else(|| SummaryError::VideoUnavailable(video_id.to_string()))?;

        let summary = self.generator.generate(&video).await?;
        self.cache.put(video_id, &summary).await?;

        Ok(TaggedSummary { summary, cached: false })
    }

    async fn generation_slot(&self, video_id: &str) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.entry(video_id.to_string()).or_default().clone()
    }

    async fn release_slot(&self, video_id: &str, slot: Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().await;
        // The map and this handle; nobody else is waiting
        if Arc::strong_count(&slot) <= 2 {
            in_flight.remove(video_id);
        }
    }

    #[cfg(test)]
    async fn in_flight_len(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}

fn ensure_valid(video_id: &str) -> Result<(), SummaryError> {
    if is_valid_video_id(video_id) {
        Ok(())
    } else {
        Err(SummaryError::InvalidVideoId(video_id.to_string()))
    }
}
