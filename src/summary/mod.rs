/// Episode summary generation and caching
///
/// A summary is produced once per video by the first provider that answers, written to the
/// on-disk cache, and served from there until a client explicitly asks for a refresh.

pub mod cache;
pub mod generator;
pub mod parse;
pub mod prompt;
pub mod service;

pub use cache::{CachedSummaryInfo, SummaryCache};
pub use generator::SummaryGenerator;
pub use parse::{parse_summary_content, SummaryContent};
pub use service::SummaryService;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::youtube::VideoData;

/// Generated summary for one episode, as persisted in the cache
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub key_takeaways: Vec<String>,
    pub topics: Vec<String>,
    pub highlights: Vec<String>,
    pub has_transcript: bool,
    pub generated_at: DateTime<Utc>,
    /// Provider and model that wrote it
    pub model: String,
}

impl Summary {
    /// Stamp model output with the video it describes and its provenance
    pub fn from_content(video: &VideoData, content: SummaryContent, model: String) -> Self {
        let title = if content.title.trim().is_empty() {
            video.title.clone()
        } else {
            content.title
        };

        Self {
            video_id: video.video_id.clone(),
            title,
            description: content.description,
            key_takeaways: content.key_takeaways,
            topics: content.topics,
            highlights: content.highlights,
            has_transcript: video.has_transcript,
            generated_at: Utc::now(),
            model,
        }
    }
}

/// Summary as returned to clients, tagged with whether it came from the cache
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaggedSummary {
    #[serde(flatten)]
    pub summary: Summary,
    pub cached: bool,
}
