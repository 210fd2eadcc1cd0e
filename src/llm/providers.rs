use super::{ChatMessage, LLM, LLMConfig, LLMProvider, LLMResponse};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const PERPLEXITY_ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";
const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Perplexity provider implementation (OpenAI-compatible chat completions)
pub struct PerplexityProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct PerplexityRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct PerplexityResponse {
    choices: Vec<PerplexityChoice>,
    usage: Option<PerplexityUsage>,
}

#[derive(Debug, Deserialize)]
struct PerplexityChoice {
    message: PerplexityMessage,
}

#[derive(Debug, Deserialize)]
struct PerplexityMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PerplexityUsage {
    total_tokens: u32,
}

impl PerplexityProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl LLM for PerplexityProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow!("Perplexity API key not configured"))?;

        let request = PerplexityRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = self.config.endpoint.as_deref().unwrap_or(PERPLEXITY_ENDPOINT);

        debug!("Sending request to Perplexity API");

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Perplexity API error {}: {}", status, text));
        }

        let perplexity_response: PerplexityResponse = response.json().await?;

        let content = perplexity_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| anyhow!("No content in Perplexity response"))?;

        let tokens_used = perplexity_response
            .usage
            .map(|u| u.total_tokens);

        Ok(LLMResponse {
            content,
            tokens_used,
        })
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn provider_type(&self) -> LLMProvider {
        LLMProvider::Perplexity
    }

    fn model_id(&self) -> String {
        format!("perplexity-{}", self.config.model)
    }
}

/// Gemini provider implementation
pub struct GeminiProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

impl GeminiProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    /// System messages become the system instruction; the rest are user turns
    fn build_request(&self, messages: Vec<ChatMessage>) -> GeminiRequest {
        let (system, turns): (Vec<_>, Vec<_>) = messages.into_iter().partition(|msg| msg.role == "system");

        let system_instruction = if system.is_empty() {
            None
        } else {
            Some(GeminiContent {
                role: None,
                parts: system.into_iter().map(|msg| GeminiPart { text: msg.content }).collect(),
            })
        };

        let contents = turns
            .into_iter()
            .map(|msg| GeminiContent {
                role: Some(if msg.role == "assistant" { "model".to_string() } else { "user".to_string() }),
                parts: vec![GeminiPart { text: msg.content }],
            })
            .collect();

        GeminiRequest {
            system_instruction,
            contents,
            generation_config: GeminiGenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
        }
    }
}

#[async_trait]
impl LLM for GeminiProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow!("Gemini API key not configured"))?;

        let request = self.build_request(messages);

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.as_deref().unwrap_or(GEMINI_ENDPOINT).trim_end_matches('/'),
            self.config.model
        );

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error {}: {}", status, text));
        }

        let gemini_response: GeminiResponse = response.json().await?;

        let content = gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| anyhow!("No content in Gemini response"))?;

        let tokens_used = gemini_response
            .usage_metadata
            .and_then(|u| u.total_token_count);

        Ok(LLMResponse {
            content,
            tokens_used,
        })
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn provider_type(&self) -> LLMProvider {
        LLMProvider::Gemini
    }

    fn model_id(&self) -> String {
        self.config.model.clone()
    }
}
