pub mod providers;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// LLM provider types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LLMProvider {
    Perplexity,
    Gemini,
}

impl fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LLMProvider::Perplexity => write!(f, "Perplexity"),
            LLMProvider::Gemini => write!(f, "Gemini"),
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    /// Overrides the provider's public API URL
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl LLMConfig {
    pub fn perplexity() -> Self {
        Self {
            provider: LLMProvider::Perplexity,
            endpoint: None,
            api_key: None,
            model: "sonar".to_string(),
            max_tokens: 1500,
            temperature: 0.7,
            timeout_seconds: 60,
        }
    }

    pub fn gemini() -> Self {
        Self {
            provider: LLMProvider::Gemini,
            model: "gemini-2.0-flash".to_string(),
            ..Self::perplexity()
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self::perplexity()
    }
}

impl LLMConfig {
    pub fn for_provider(provider: LLMProvider) -> Self {
        match provider {
            LLMProvider::Perplexity => Self::perplexity(),
            LLMProvider::Gemini => Self::gemini(),
        }
    }
}

/// A provider table as written in a config file; unset fields come from the provider's defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PartialLLMConfig {
    pub provider: Option<LLMProvider>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

impl PartialLLMConfig {
    /// Fill unset fields from the defaults of the named provider, or of `default_provider`
    pub fn resolve(self, default_provider: LLMProvider) -> LLMConfig {
        let base = LLMConfig::for_provider(self.provider.unwrap_or(default_provider));
        LLMConfig {
            provider: base.provider,
            endpoint: self.endpoint.or(base.endpoint),
            api_key: self.api_key.or(base.api_key),
            model: self.model.unwrap_or(base.model),
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
            temperature: self.temperature.unwrap_or(base.temperature),
            timeout_seconds: self.timeout_seconds.unwrap_or(base.timeout_seconds),
        }
    }
}

/// Chat message for LLM communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// LLM response
#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub tokens_used: Option<u32>,
}

/// Trait for LLM providers
#[async_trait]
pub trait LLM: Send + Sync {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse>;

    /// Whether a credential is present; says nothing about reachability
    fn is_configured(&self) -> bool;

    fn provider_type(&self) -> LLMProvider;

    /// Identifier stamped on summaries produced by this provider
    fn model_id(&self) -> String;
}

/// Create LLM instance based on configuration
pub fn create_llm(config: &LLMConfig) -> Result<Box<dyn LLM>> {
    match config.provider {
        LLMProvider::Perplexity => Ok(Box::new(providers::PerplexityProvider::new(config.clone())?)),
        LLMProvider::Gemini => Ok(Box::new(providers::GeminiProvider::new(config.clone())?)),
    }
}
