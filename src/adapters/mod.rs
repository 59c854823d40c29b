// Adapters layer: concrete text-generation providers behind the domain port.

pub mod gemini;
pub mod openai;

use crate::core::{ConfigProvider, GenerationRequest, ProviderKind, TextGenerationProvider};
use crate::utils::error::{Result, SuggestError};
use async_trait::async_trait;
use reqwest::Client;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Provider chosen at runtime from configuration.
pub enum ProviderClient {
    Gemini(GeminiProvider),
    OpenAi(OpenAiProvider),
}

impl ProviderClient {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        match config.provider_kind() {
            ProviderKind::Gemini => Ok(Self::Gemini(GeminiProvider::new(config)?)),
            ProviderKind::OpenAi => Ok(Self::OpenAi(OpenAiProvider::new(config)?)),
        }
    }
}

#[async_trait]
impl TextGenerationProvider for ProviderClient {
    fn name(&self) -> &str {
        match self {
            Self::Gemini(p) => p.name(),
            Self::OpenAi(p) => p.name(),
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<serde_json::Value> {
        match self {
            Self::Gemini(p) => p.generate(request).await,
            Self::OpenAi(p) => p.generate(request).await,
        }
    }
}

pub(crate) fn build_http_client<C: ConfigProvider>(config: &C) -> Result<Client> {
    Client::builder()
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| SuggestError::ConfigError {
            message: format!("Failed to build HTTP client: {}", e),
        })
}

pub(crate) fn require_api_key<C: ConfigProvider>(config: &C) -> Result<String> {
    config.api_key().ok_or_else(|| SuggestError::MissingConfigError {
        field: "provider.api_key".to_string(),
    })
}

pub(crate) fn trim_base_url(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Keeps provider error bodies readable in logs and messages.
pub(crate) fn truncate_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty response body>".to_string();
    }
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let truncated: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!("{}... [truncated]", truncated)
}

/// Parses the model's text answer as JSON. Code fences or prose are not stripped.
pub(crate) fn parse_structured_text(provider: &str, text: &str) -> Result<serde_json::Value> {
    serde_json::from_str(text).map_err(|e| {
        SuggestError::provider(format!(
            "{} returned text that is not valid JSON: {} ({})",
            provider,
            e,
            truncate_error_body(text)
        ))
    })
}
