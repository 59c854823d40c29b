//! OpenAI-compatible `chat/completions` adapter with JSON-schema constrained output.

use super::{
    build_http_client, parse_structured_text, require_api_key, trim_base_url, truncate_error_body,
};
use crate::core::{ConfigProvider, GenerationRequest, TextGenerationProvider};
use crate::utils::error::{Result, SuggestError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const SCHEMA_NAME: &str = "learning_path_suggestions";

pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl OpenAiProvider {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            base_url: trim_base_url(config.base_url()).to_string(),
            model: config.model().to_string(),
            api_key: require_api_key(config)?,
            temperature: config.temperature(),
            max_output_tokens: config.max_output_tokens(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn request_body(&self, request: &GenerationRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "schema": request.output_schema,
                    "strict": true
                }
            }
        });
        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = self.max_output_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        body
    }
}

#[async_trait]
impl TextGenerationProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Value> {
        tracing::debug!("Making chat completion request to: {}", self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| SuggestError::provider(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        tracing::debug!("Chat completion response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SuggestError::provider(format!(
                "OpenAI API error (status {}): {}",
                status,
                truncate_error_body(&body)
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SuggestError::provider(format!("Failed to parse OpenAI response: {}", e)))?;

        let message = &body["choices"][0]["message"];
        if let Some(refusal) = message["refusal"].as_str() {
            return Err(SuggestError::provider(format!("Model refused: {}", refusal)));
        }

        let content = message["content"]
            .as_str()
            .ok_or_else(|| SuggestError::provider("OpenAI response has no message content"))?;

        parse_structured_text(self.name(), content)
    }
}
