//! API data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::youtube::Episode;

/// Error body shared by every endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), message: None }
    }

    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self { error: error.into(), message: Some(message.into()) }
    }
}

/// Liveness report
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Whether each provider has a credential configured
    pub providers: BTreeMap<String, bool>,
}

/// Latest episodes from the channel feed
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeFeed {
    pub episodes: Vec<Episode>,
    pub fetched_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query string of the summary endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub refresh: Option<String>,
}

impl SummaryQuery {
    /// Only the literal `true` forces regeneration
    pub fn force_refresh(&self) -> bool {
        self.refresh.as_deref() == Some("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_omits_missing_message() {
        let json = serde_json::to_value(ErrorBody::new("Video not found")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Video not found"}));

        let json = serde_json::to_value(ErrorBody::with_message("a", "b")).unwrap();
        assert_eq!(json["message"], "b");
    }

    #[test]
    fn test_refresh_flag() {
        let query = |value: Option<&str>| SummaryQuery { refresh: value.map(str::to_string) };
        assert!(query(Some("true")).force_refresh());
        assert!(!query(Some("1")).force_refresh());
        assert!(!query(Some("false")).force_refresh());
        assert!(!query(None).force_refresh());
    }
}
