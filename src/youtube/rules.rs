/// Named extraction rules for YouTube pages
///
/// YouTube pages are not parsed as HTML. Each field is pulled out of the raw body with a
/// dedicated pattern so that upstream markup drift shows up as a failing fixture test.
use super::counts::{parse_count, parse_grouped_integer};
use anyhow::Result;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

/// Counts found on a channel page; every field is independently optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelCounts {
    pub subscribers: Option<u64>,
    pub total_views: Option<u64>,
    pub video_count: Option<u64>,
}

/// Fields found on a watch page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoPage {
    pub title: String,
    pub description: String,
    /// Base URL of the preferred caption track
    pub caption_url: Option<String>,
}

/// Compiled patterns for channel and watch pages
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    subscriber_count: Regex,
    view_count: Regex,
    video_count: Regex,
    player_response: Regex,
    page_title: Regex,
}

impl ExtractionRules {
    pub fn new() -> Result<Self> {
        Ok(Self {
            subscriber_count: Regex::new(r#""subscriberCountText":\s*\{\s*"simpleText":\s*"([^"]+)""#)?,
            view_count: Regex::new(r#""viewCountText":\s*\{\s*"simpleText":\s*"([^"]+)""#)?,
            video_count: Regex::new(
                r#""videosCountText":\s*\{\s*"runs":\s*\[\s*\{\s*"text":\s*"([^"]+)""#,
            )?,
            player_response: Regex::new(r"(?s)var ytInitialPlayerResponse\s*=\s*(\{.+?\});")?,
            page_title: Regex::new(r"<title>([^<]+)</title>")?,
        })
    }

    /// Extract subscriber, view and video counts from a channel page
    pub fn channel_counts(&self, html: &str) -> ChannelCounts {
        let counts = ChannelCounts {
            subscribers: first_capture(&self.subscriber_count, html).and_then(parse_count),
            total_views: first_capture(&self.view_count, html).and_then(parse_count),
            video_count: first_capture(&self.video_count, html).and_then(parse_grouped_integer),
        };
        debug!("Channel counts extracted: {:?}", counts);
        counts
    }

    /// Extract title, description and caption track from a watch page.
    ///
    /// Falls back to the `<title>` tag when the player response is missing or malformed.
    /// Returns `None` only when neither source yields anything.
    pub fn video_page(&self, html: &str) -> Option<VideoPage> {
        let mut page = VideoPage::default();
        let mut found_player = false;

        if let Some(raw) = first_capture(&self.player_response, html) {
            match serde_json::from_str::<Value>(raw) {
                Ok(player) => {
                    found_player = true;
                    let details = &player["videoDetails"];
                    page.title = details["title"].as_str().unwrap_or_default().to_string();
                    page.description = details["shortDescription"].as_str().unwrap_or_default().to_string();
                    page.caption_url = select_caption_track(&player);
                }
                Err(e) => warn!("Failed to parse player response: {}", e),
            }
        }

        if page.title.is_empty() {
            if let Some(title) = first_capture(&self.page_title, html) {
                let title = html_escape::decode_html_entities(title);
                page.title = title.trim().trim_end_matches("- YouTube").trim().to_string();
            }
        }

        if !found_player && page.title.is_empty() {
            return None;
        }
        Some(page)
    }
}

fn first_capture<'h>(regex: &Regex, haystack: &'h str) -> Option<&'h str> {
    regex.captures(haystack).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// English track if there is one, otherwise the first track listed
fn select_caption_track(player: &Value) -> Option<String> {
    let tracks = player["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"].as_array()?;
    let track = tracks
        .iter()
        .find(|t| t["languageCode"].as_str() == Some("en"))
        .or_else(|| tracks.first())?;
    track["baseUrl"].as_str().map(str::to_string)
}
