use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{KonspektError, Result};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Missing API key for {provider_name}: {env_var} environment variable is not set")]
    MissingApiKey {
        provider_name: String,
        env_var: String,
    },
}

/// One prompt in, one reply out. No streaming, no conversation state.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn name(&self) -> &str;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    Grok,
    Openai,
    #[default]
    Gemini,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-5.1",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
                model: "gemini-1.5-flash",
                env_var: "GEMINI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Grok => "Grok",
            Provider::Openai => "OpenAI",
            Provider::Gemini => "Gemini",
        }
    }

    /// Validate that the API key is set for this provider
    pub fn validate_api_key(&self) -> std::result::Result<String, ProviderError> {
        let config = self.config();
        std::env::var(config.env_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey {
                provider_name: self.name().to_string(),
                env_var: config.env_var.to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completions endpoint
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    name: String,
    api_url: String,
    model: String,
    api_key: String,
}

impl ChatCompletionsClient {
    pub fn new(
        http: reqwest::Client,
        name: impl Into<String>,
        api_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            name: name.into(),
            api_url: api_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Client for a known provider; fails early when its key is not set
    pub fn for_provider(http: reqwest::Client, provider: &Provider) -> Result<Self> {
        let config = provider.config();
        let api_key = provider.validate_api_key()?;
        Ok(Self::new(
            http,
            provider.name(),
            config.api_url,
            config.model,
            api_key,
        ))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(provider = %self.name, model = %self.model, "sending analysis prompt");

        let response = self
            .http
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt,
                    },
                ],
                "temperature": 0.3,
            }))
            .send()
            .await
            .map_err(|e| KonspektError::AiRequest {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(KonspektError::AiRequest {
                reason: format!("{} returned {}: {}", self.name, status, body),
            });
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| KonspektError::AiRequest {
                reason: format!("Invalid API response: {e}"),
            })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| KonspektError::AiRequest {
                reason: format!("{} returned no message content", self.name),
            })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
