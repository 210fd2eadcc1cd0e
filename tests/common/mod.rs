//! Mock upstreams shared by the integration tests

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use episode_summarizer::llm::{ChatMessage, LLMResponse};
use episode_summarizer::summary::{SummaryCache, SummaryGenerator, SummaryService};
use episode_summarizer::youtube::{FeedReader, FetchedPage, PageFetcher, YouTubeScraper};
use episode_summarizer::{AppState, Config, ConfigBuilder, LLMProvider, LLM};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const VIDEO_ID: &str = "8j-cSM4qnwQ";
pub const MISSING_ID: &str = "gone0000000";

pub const SUMMARY_JSON: &str = r#"{
  "title": "Nvidia earnings & The Private Credit bubble",
  "description": "The hosts dig into Nvidia's quarter and whether private credit is overheating.",
  "keyTakeaways": ["Nvidia beat again", "Private credit is crowded", "Rates matter", "AI capex keeps rising", "Watch the spreads"],
  "topics": ["Nvidia", "Private credit", "Interest rates", "AI capex", "Venture funding", "Markets"],
  "highlights": ["\"Capex is the new moat\"", "\"Credit always finds a way\""]
}"#;

pub fn fenced(json: &str) -> String {
    format!("```json\n{}\n```", json)
}

pub const CHANNEL_PAGE: &str = r#"<html><script>var ytInitialData = {"header":{
  "subscriberCountText": {"simpleText": "1.2K subscribers"},
  "videosCountText": {"runs": [{"text": "42"}, {"text": " videos"}]}},
  "about": {"viewCountText": {"simpleText": "10,234 views"}}};</script></html>"#;

pub const WATCH_PAGE: &str = r#"<html><head><title>Nvidia earnings &amp; The Private Credit bubble - YouTube</title></head>
<body><script>var ytInitialPlayerResponse = {"videoDetails":{"videoId":"8j-cSM4qnwQ",
"title":"Nvidia earnings & The Private Credit bubble","shortDescription":"Weekly markets show"},
"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[
{"baseUrl":"https://www.youtube.com/api/timedtext?v=8j-cSM4qnwQ&lang=en","languageCode":"en"}]}}};
var other = {};</script></body></html>"#;

pub const CAPTIONS: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
<text start="0.0" dur="2.1">welcome back to the show</text>
<text start="2.1" dur="3.0">Nvidia&#39;s numbers are in</text>
</transcript>"#;

pub const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
<id>yt:channel:UCkrNV__eDuSmX2Y5GYU5ulQ</id><title>Not Investment Advice VC</title>
<entry><id>yt:video:8j-cSM4qnwQ</id><yt:videoId>8j-cSM4qnwQ</yt:videoId>
<title>Nvidia earnings &amp; The Private Credit bubble</title><published>2025-11-23T14:00:00+00:00</published>
<media:group><media:thumbnail url="https://i1.ytimg.com/vi/8j-cSM4qnwQ/hqdefault.jpg" width="480" height="360"/>
<media:description>Weekly markets show</media:description></media:group></entry>
<entry><id>yt:video:shortclip01</id><yt:videoId>shortclip01</yt:videoId>
<title>Capex in 30 seconds #shorts</title><published>2025-11-24T14:00:00+00:00</published>
<media:group><media:description>clip</media:description></media:group></entry>
</feed>"#;

/// Serves canned YouTube pages by URL; anything unknown is a transport error
pub struct FakeYouTube {
    pub channel_available: bool,
    pub feed_available: bool,
}

impl Default for FakeYouTube {
    fn default() -> Self {
        Self { channel_available: true, feed_available: true }
    }
}

#[async_trait]
impl PageFetcher for FakeYouTube {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        if url.contains("/api/timedtext") {
            return Ok(FetchedPage::ok(CAPTIONS));
        }
        if url.contains("/feeds/videos.xml") {
            return if self.feed_available {
                Ok(FetchedPage::ok(FEED))
            } else {
                Err(anyhow!("connection reset"))
            };
        }
        if url.contains("watch?v=") {
            return if url.ends_with(VIDEO_ID) {
                Ok(FetchedPage::ok(WATCH_PAGE))
            } else {
                Ok(FetchedPage { status: 404, body: String::new() })
            };
        }
        if url.contains("/@") {
            return if self.channel_available {
                Ok(FetchedPage::ok(CHANNEL_PAGE))
            } else {
                Ok(FetchedPage { status: 500, body: String::new() })
            };
        }
        Err(anyhow!("unexpected url {}", url))
    }
}

/// Provider double that replays scripted replies and records every prompt
pub struct ScriptedLLM {
    provider: LLMProvider,
    model: String,
    configured: bool,
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub prompts: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl ScriptedLLM {
    pub fn new(provider: LLMProvider, model: &str) -> Self {
        Self {
            provider,
            model: model.to_string(),
            configured: true,
            replies: Mutex::new(VecDeque::new()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn perplexity() -> Self {
        Self::new(LLMProvider::Perplexity, "perplexity-sonar")
    }

    pub fn gemini() -> Self {
        Self::new(LLMProvider::Gemini, "gemini-2.0-flash")
    }

    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn reply(self, content: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(content.into()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.to_string()));
        self
    }
}

#[async_trait]
impl LLM for ScriptedLLM {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        self.prompts.lock().unwrap().push(messages);
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(LLMResponse { content, tokens_used: Some(512) }),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("{} API error 429 Too Many Requests", self.provider)),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn provider_type(&self) -> LLMProvider {
        self.provider
    }

    fn model_id(&self) -> String {
        self.model.clone()
    }
}

pub fn test_config(cache_dir: &Path) -> Config {
    ConfigBuilder::new()
        .with_cache_dir(cache_dir.to_path_buf())
        .build()
}

/// Application state wired to the fakes
pub fn app_state(cache_dir: &Path, youtube: FakeYouTube, primary: ScriptedLLM, fallback: ScriptedLLM) -> AppState {
    let config = Arc::new(test_config(cache_dir));
    let fetcher: Arc<dyn PageFetcher> = Arc::new(youtube);

    let scraper = YouTubeScraper::new(fetcher.clone(), &config).unwrap();
    let generator = SummaryGenerator::new(Box::new(primary), Box::new(fallback));
    let cache = SummaryCache::new(cache_dir);
    let feed = FeedReader::new(fetcher, config.feed.clone());

    AppState {
        summaries: Arc::new(SummaryService::new(scraper, generator, cache)),
        feed: Arc::new(feed),
        config,
    }
}
