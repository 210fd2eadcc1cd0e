/// Latest uploads from the channel's public Atom feed
use super::text::{collapse_whitespace, truncate_with_ellipsis};
use super::PageFetcher;
use crate::config::FeedConfig;
use anyhow::{anyhow, Context, Result};
use feed_rs::model::Entry;
use feed_rs::parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// One upload listed in the channel feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub published_at: String,
}

/// Reads and filters the channel feed
#[derive(Clone)]
pub struct FeedReader {
    fetcher: Arc<dyn PageFetcher>,
    config: FeedConfig,
}

impl FeedReader {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: FeedConfig) -> Self {
        Self { fetcher, config }
    }

    /// Fetch the feed and return the newest full-length episodes
    pub async fn latest_episodes(&self) -> Result<Vec<Episode>> {
        let url = format!(
            "{}{}",
            self.config.feed_url_base,
            urlencoding::encode(&self.config.channel_id)
        );
        let page = self.fetcher.fetch(&url).await?;
        if !page.is_success() {
            return Err(anyhow!("Feed fetch failed (status {})", page.status));
        }

        let episodes = self.parse_feed(&page.body)?;
        info!("📺 Feed listed {} episodes", episodes.len());
        Ok(episodes)
    }

    /// Extract episodes from a feed document.
    ///
    /// Only the first `max_results` entries are considered; shorts among them are dropped.
    pub fn parse_feed(&self, document: &str) -> Result<Vec<Episode>> {
        let feed = parser::parse(document.as_bytes()).context("Failed to parse channel feed")?;

        Ok(feed
            .entries
            .iter()
            .take(self.config.max_results)
            .filter_map(episode_from_entry)
            .filter(|episode| {
                let is_short = is_short(&episode.title) || is_short(&episode.description);
                if is_short {
                    debug!("Skipping short: {}", episode.title);
                }
                !is_short
            })
            .map(|mut episode| {
                episode.description = truncate_with_ellipsis(&episode.description, self.config.description_chars);
                episode
            })
            .collect())
    }
}

fn episode_from_entry(entry: &Entry) -> Option<Episode> {
    let video_id = entry.id.rsplit(':').next().map(str::trim).filter(|id| !id.is_empty())?.to_string();
    let media = entry.media.first();

    let title = entry
        .title
        .as_ref()
        .or_else(|| media.and_then(|m| m.title.as_ref()))
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())?;

    let thumbnail = media
        .and_then(|m| m.thumbnails.first())
        .map(|t| t.image.uri.clone())
        .unwrap_or_else(|| format!("https://i.ytimg.com/vi/{}/maxresdefault.jpg", video_id));

    let description = media
        .and_then(|m| m.description.as_ref())
        .map(|d| collapse_whitespace(&d.content))
        .unwrap_or_default();

    Some(Episode {
        title,
        description,
        published_at: entry.published.or(entry.updated).map(|d| d.to_rfc3339()).unwrap_or_default(),
        thumbnail,
        video_id,
    })
}

fn is_short(text: &str) -> bool {
    text.to_lowercase().contains("#short")
}
