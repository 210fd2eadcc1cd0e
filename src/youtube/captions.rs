/// Caption track download and flattening into a plain transcript
use super::text::{collapse_whitespace, truncate_with_ellipsis};
use super::PageFetcher;
use anyhow::Result;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Fetches timed-text documents and turns them into transcript strings
#[derive(Clone)]
pub struct CaptionFetcher {
    fetcher: Arc<dyn PageFetcher>,
    text_element: Regex,
    max_chars: usize,
}

impl CaptionFetcher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, max_chars: usize) -> Result<Self> {
        Ok(Self {
            fetcher,
            text_element: Regex::new(r"<text[^>]*>([^<]*)</text>")?,
            max_chars,
        })
    }

    /// Download and flatten a caption track. Any failure yields `None`.
    pub async fn fetch_transcript(&self, base_url: &str) -> Option<String> {
        let url = caption_request_url(base_url)?;

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Caption fetch failed: {}", e);
                return None;
            }
        };

        if !page.is_success() {
            warn!("Caption fetch returned status {}", page.status);
            return None;
        }

        let transcript = self.parse_document(&page.body);
        match &transcript {
            Some(text) => debug!("Transcript extracted: {} chars", text.chars().count()),
            None => debug!("Caption document contained no text elements"),
        }
        transcript
    }

    /// Flatten the `<text>` elements of a timed-text document.
    ///
    /// Tolerates malformed markup: anything that is not a plain `<text ...>body</text>` span is
    /// ignored. The result is truncated to `max_chars` characters plus `...`.
    pub fn parse_document(&self, document: &str) -> Option<String> {
        let fragments: Vec<String> = self
            .text_element
            .captures_iter(document)
            .map(|caps| html_escape::decode_html_entities(&caps[1]).into_owned())
            .filter(|fragment| !fragment.trim().is_empty())
            .collect();

        if fragments.is_empty() {
            return None;
        }

        let transcript = collapse_whitespace(&fragments.join(" "));
        Some(truncate_with_ellipsis(&transcript, self.max_chars))
    }
}

/// Track URL with `fmt=srv3` requested, replacing any format already present
fn caption_request_url(base_url: &str) -> Option<String> {
    let mut url = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            warn!("Invalid caption track URL {}: {}", base_url, e);
            return None;
        }
    };

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut().clear().extend_pairs(pairs).append_pair("fmt", "srv3");
    Some(url.to_string())
}
