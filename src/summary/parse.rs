/// Recovery of the summary JSON object from free-form model output
use crate::error::SummaryError;
use serde::{Deserialize, Deserializer};
use std::ops::RangeInclusive;

pub const TAKEAWAYS_RANGE: RangeInclusive<usize> = 5..=6;
pub const TOPICS_RANGE: RangeInclusive<usize> = 5..=8;
pub const HIGHLIGHTS_RANGE: RangeInclusive<usize> = 2..=3;

/// Summary fields as requested from the model
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryContent {
    #[serde(default)]
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "string_list")]
    pub key_takeaways: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub topics: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub highlights: Vec<String>,
}

impl SummaryContent {
    /// Lists whose length falls outside what the prompt asked for
    pub fn out_of_range_fields(&self) -> Vec<(&'static str, usize)> {
        [
            ("keyTakeaways", self.key_takeaways.len(), TAKEAWAYS_RANGE),
            ("topics", self.topics.len(), TOPICS_RANGE),
            ("highlights", self.highlights.len(), HIGHLIGHTS_RANGE),
        ]
        .into_iter()
        .filter(|(_, len, range)| !range.contains(len))
        .map(|(field, len, _)| (field, len))
        .collect()
    }
}

/// Some models answer with `{"text": ...}` objects instead of plain strings
#[derive(Deserialize)]
#[serde(untagged)]
enum ListItem {
    Text(String),
    Object { text: String },
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<ListItem>::deserialize(deserializer)?;
    Ok(items
        .into_iter()
        .map(|item| match item {
            ListItem::Text(text) | ListItem::Object { text } => text,
        })
        .collect())
}

/// Strip one layer of markdown code fencing
fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Span from the first `{` to the last `}`
fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse model output into summary fields.
///
/// Tolerates code fences and prose around the object. Anything that still does not parse
/// is an `InvalidResponse`.
pub fn parse_summary_content(text: &str) -> Result<SummaryContent, SummaryError> {
    let cleaned = strip_code_fences(text);
    let object = outermost_object(cleaned).ok_or_else(|| SummaryError::InvalidResponse(preview(text)))?;

    serde_json::from_str(object).map_err(|e| SummaryError::InvalidResponse(format!("{} ({})", preview(text), e)))
}

fn preview(text: &str) -> String {
    const MAX: usize = 120;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        format!("{}...", trimmed.chars().take(MAX).collect::<String>())
    }
}
