//! API module for the episode summarizer
//!
//! Provides the REST endpoints the podcast site calls.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::summary::{SummaryCache, SummaryGenerator, SummaryService};
use crate::youtube::{FeedReader, HttpFetcher, PageFetcher, YouTubeScraper};

pub mod handlers;
pub mod models;
pub mod server;

pub use server::{build_router, AppState};

impl AppState {
    /// Wire the live scraper, providers and cache from configuration
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(&config.scraper)?);
        let scraper = YouTubeScraper::new(fetcher.clone(), &config)?;
        let generator = SummaryGenerator::from_config(&config.llm)?;
        let cache = SummaryCache::new(config.cache.cache_dir.clone());
        let feed = FeedReader::new(fetcher, config.feed.clone());

        Ok(Self {
            summaries: Arc::new(SummaryService::new(scraper, generator, cache)),
            feed: Arc::new(feed),
            config,
        })
    }
}

/// API Server for handling REST requests
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Prepare the cache directory and serve until shutdown
    pub async fn start(self) -> Result<()> {
        self.state.summaries.cache().initialize().await?;
        info!("🚀 Starting API server on port {}", self.state.config.server.port);
        server::start_http_server(self.state).await
    }
}
