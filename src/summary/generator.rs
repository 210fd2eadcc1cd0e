/// Summary generation with primary/fallback providers
use super::parse::{parse_summary_content, SummaryContent};
use super::prompt::build_messages;
use super::Summary;
use crate::config::SummarizerConfig;
use crate::error::SummaryError;
use crate::llm::{create_llm, ChatMessage, LLMProvider, LLM};
use crate::youtube::VideoData;
use anyhow::Result;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Asks the primary provider first and the fallback only when the primary attempt fails
pub struct SummaryGenerator {
    primary: Box<dyn LLM>,
    fallback: Box<dyn LLM>,
}

impl SummaryGenerator {
    pub fn new(primary: Box<dyn LLM>, fallback: Box<dyn LLM>) -> Self {
        Self { primary, fallback }
    }

    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        Ok(Self::new(create_llm(&config.primary)?, create_llm(&config.fallback)?))
    }

    /// Credential presence per provider, keyed by lowercase provider name
    pub fn provider_status(&self) -> BTreeMap<String, bool> {
        [&self.primary, &self.fallback]
            .into_iter()
            .map(|llm| (llm.provider_type().to_string().to_lowercase(), llm.is_configured()))
            .collect()
    }

    /// Summarize one video.
    ///
    /// Any failure of the primary attempt, including output that does not parse, moves on to
    /// the fallback with the same messages.
    pub async fn generate(&self, video: &VideoData) -> Result<Summary, SummaryError> {
        let messages = build_messages(video);

        let (llm, content) = match attempt(self.primary.as_ref(), messages.clone()).await {
            Ok(content) => (&self.primary, content),
            Err(primary_error) => {
                warn!(
                    "⚠️ {} failed for {}, trying {}: {:#}",
                    self.primary.provider_type(),
                    video.video_id,
                    self.fallback.provider_type(),
                    primary_error
                );
                match attempt(self.fallback.as_ref(), messages).await {
                    Ok(content) => (&self.fallback, content),
                    Err(fallback_error) => {
                        return Err(provider_failure(
                            self.primary.provider_type(),
                            &primary_error,
                            self.fallback.provider_type(),
                            &fallback_error,
                        ));
                    }
                }
            }
        };

        for (field, len) in content.out_of_range_fields() {
            warn!("Summary for {} has {} {} entries", video.video_id, len, field);
        }

        let model = llm.model_id();
        info!("✨ Generated summary for {} with {}", video.video_id, model);

        Ok(Summary::from_content(video, content, model))
    }
}

/// One provider call plus extraction of the summary object from its reply
async fn attempt(llm: &dyn LLM, messages: Vec<ChatMessage>) -> Result<SummaryContent> {
    let response = llm.chat(messages).await?;
    debug!(
        "{} replied ({} tokens)",
        llm.provider_type(),
        response.tokens_used.map_or_else(|| "?".to_string(), |t| t.to_string())
    );
    Ok(parse_summary_content(&response.content)?)
}

fn provider_failure(
    primary: LLMProvider,
    primary_error: &anyhow::Error,
    fallback: LLMProvider,
    fallback_error: &anyhow::Error,
) -> SummaryError {
    SummaryError::ProvidersFailed {
        primary,
        primary_error: primary_error.to_string(),
        fallback,
        fallback_error: fallback_error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, LLMConfig, LLMResponse};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    const REPLY: &str = r#"{"title":"T","description":"D","keyTakeaways":["a","b","c","d","e"],"topics":["1","2","3","4","5"],"highlights":["h1","h2"]}"#;

    struct ScriptedLLM {
        provider: LLMProvider,
        reply: Option<String>,
        calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    }

    #[async_trait]
    impl LLM for ScriptedLLM {
        async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
            self.calls.lock().unwrap().push(messages);
            match &self.reply {
                Some(content) => Ok(LLMResponse { content: content.clone(), tokens_used: Some(10) }),
                None => Err(anyhow!("{} API error 503", self.provider)),
            }
        }

        fn is_configured(&self) -> bool {
            self.reply.is_some()
        }

        fn provider_type(&self) -> LLMProvider {
            self.provider
        }

        fn model_id(&self) -> String {
            format!("{}-test", self.provider.to_string().to_lowercase())
        }
    }

    fn scripted(provider: LLMProvider, reply: Option<&str>) -> (Box<dyn LLM>, Arc<Mutex<Vec<Vec<ChatMessage>>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let llm = ScriptedLLM { provider, reply: reply.map(str::to_string), calls: calls.clone() };
        (Box::new(llm), calls)
    }

    fn video() -> VideoData {
        VideoData {
            video_id: "abc".to_string(),
            title: "Episode".to_string(),
            description: "desc".to_string(),
            transcript: "words".to_string(),
            has_transcript: true,
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let (primary, primary_calls) = scripted(LLMProvider::Perplexity, Some(REPLY));
        let (fallback, fallback_calls) = scripted(LLMProvider::Gemini, Some(REPLY));
        let generator = SummaryGenerator::new(primary, fallback);

        let summary = generator.generate(&video()).await.unwrap();
        assert_eq!(summary.model, "perplexity-test");
        assert_eq!(primary_calls.lock().unwrap().len(), 1);
        assert!(fallback_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_gets_same_messages() {
        let (primary, primary_calls) = scripted(LLMProvider::Perplexity, None);
        let (fallback, fallback_calls) = scripted(LLMProvider::Gemini, Some(REPLY));
        let generator = SummaryGenerator::new(primary, fallback);

        let summary = generator.generate(&video()).await.unwrap();
        assert_eq!(summary.model, "gemini-test");
        assert_eq!(primary_calls.lock().unwrap()[0], fallback_calls.lock().unwrap()[0]);
    }

    #[tokio::test]
    async fn test_both_fail() {
        let (primary, _) = scripted(LLMProvider::Perplexity, None);
        let (fallback, _) = scripted(LLMProvider::Gemini, None);
        let generator = SummaryGenerator::new(primary, fallback);

        let err = generator.generate(&video()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "All AI providers failed. Perplexity: Perplexity API error 503, Gemini: Gemini API error 503"
        );
    }

    #[tokio::test]
    async fn test_unparseable_primary_output_falls_back() {
        let (primary, _) = scripted(LLMProvider::Perplexity, Some("I cannot help"));
        let (fallback, fallback_calls) = scripted(LLMProvider::Gemini, Some(REPLY));
        let generator = SummaryGenerator::new(primary, fallback);

        let summary = generator.generate(&video()).await.unwrap();
        assert_eq!(summary.model, "gemini-test");
        assert_eq!(fallback_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_output_from_both_is_aggregated() {
        let (primary, _) = scripted(LLMProvider::Perplexity, Some("I cannot help"));
        let (fallback, _) = scripted(LLMProvider::Gemini, Some("still no json"));
        let generator = SummaryGenerator::new(primary, fallback);

        let err = generator.generate(&video()).await.unwrap_err();
        assert!(matches!(err, SummaryError::ProvidersFailed { .. }));
        assert_eq!(
            err.to_string(),
            "All AI providers failed. Perplexity: No valid JSON found in response: I cannot help, \
             Gemini: No valid JSON found in response: still no json"
        );
    }

    #[test]
    fn test_provider_status_from_config() {
        let mut config = SummarizerConfig { primary: LLMConfig::perplexity(), fallback: LLMConfig::gemini() };
        config.fallback.api_key = Some("key".to_string());

        let generator = SummaryGenerator::from_config(&config).unwrap();
        let status = generator.provider_status();
        assert_eq!(status.get("perplexity"), Some(&false));
        assert_eq!(status.get("gemini"), Some(&true));
    }
}
