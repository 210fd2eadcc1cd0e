/// Episode Summarizer
///
/// Backend for a podcast site: scrapes live channel statistics and video pages from YouTube,
/// generates AI episode summaries with a primary and fallback provider, and caches them on disk.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod summary;
pub mod youtube;

// Re-export main types for easy access
pub use crate::api::{build_router, AppState};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::SummaryError;
pub use crate::llm::{LLMConfig, LLMProvider, LLM};
pub use crate::summary::{Summary, SummaryCache, SummaryGenerator, SummaryService, TaggedSummary};
pub use crate::youtube::{ChannelStats, PageFetcher, VideoData, YouTubeScraper};
