use thiserror::Error;

use crate::llm::LLMProvider;

/// Failures of the summary pipeline, grouped by how callers must respond
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Invalid video id: {0}")]
    InvalidVideoId(String),

    #[error("Video not found or inaccessible: {0}")]
    VideoUnavailable(String),

    #[error("All AI providers failed. {primary}: {primary_error}, {fallback}: {fallback_error}")]
    ProvidersFailed {
        primary: LLMProvider,
        primary_error: String,
        fallback: LLMProvider,
        fallback_error: String,
    },

    #[error("No valid JSON found in response: {0}")]
    InvalidResponse(String),

    #[error("Summary cache error: {0}")]
    Cache(#[from] anyhow::Error),
}
