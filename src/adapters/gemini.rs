//! Google Gemini `generateContent` adapter.

use super::{
    build_http_client, parse_structured_text, require_api_key, trim_base_url, truncate_error_body,
};
use crate::core::{ConfigProvider, GenerationRequest, TextGenerationProvider};
use crate::utils::error::{Result, SuggestError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl GeminiProvider {
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
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn request_body(&self, request: &GenerationRequest) -> Value {
        let mut generation_config = json!({
            "responseMimeType": "application/json",
            "responseSchema": to_gemini_schema(&request.output_schema),
        });
        if let Some(temperature) = self.temperature {
            generation_config["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = self.max_output_tokens {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }

        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": generation_config,
        })
    }
}

#[async_trait]
impl TextGenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Value> {
        tracing::debug!("Making Gemini request to: {}", self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| SuggestError::provider(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        tracing::debug!("Gemini response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SuggestError::provider(format!(
                "Gemini API error (status {}): {}",
                status,
                truncate_error_body(&body)
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SuggestError::provider(format!("Failed to parse Gemini response: {}", e)))?;

        let text = extract_candidate_text(&body)?;
        parse_structured_text(self.name(), &text)
    }
}

/// Joins the text parts of the first candidate.
fn extract_candidate_text(body: &Value) -> Result<String> {
    let candidate = match body["candidates"].get(0) {
        Some(candidate) => candidate,
        None => {
            let reason = body["promptFeedback"]["blockReason"]
                .as_str()
                .unwrap_or("no candidates returned");
            return Err(SuggestError::provider(format!(
                "Gemini returned no candidates: {}",
                reason
            )));
        }
    };

    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let finish = candidate["finishReason"].as_str().unwrap_or("unknown");
        return Err(SuggestError::provider(format!(
            "Gemini candidate has no text (finishReason: {})",
            finish
        )));
    }

    Ok(text)
}

/// Gemini takes an OpenAPI subset: upper-case type names, no `additionalProperties`.
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, value) in map {
                match key.as_str() {
                    "additionalProperties" => {}
                    "type" => {
                        let upper = value
                            .as_str()
                            .map(|t| Value::String(t.to_ascii_uppercase()))
                            .unwrap_or_else(|| value.clone());
                        out.insert(key.clone(), upper);
                    }
                    _ => {
                        out.insert(key.clone(), to_gemini_schema(value));
                    }
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}
