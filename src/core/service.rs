use crate::core::prompt;
use crate::domain::model::{GenerationRequest, PathSuggestionRequest, PathSuggestionResponse};
use crate::domain::ports::TextGenerationProvider;
use crate::utils::error::{Result, SuggestError};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Validate, render, call the provider once, validate what came back.
///
/// Holds no mutable state; share it behind an `Arc` to serve concurrent callers.
pub struct PathSuggestionService<P: TextGenerationProvider> {
    provider: P,
    timeout: Duration,
}

impl<P: TextGenerationProvider> PathSuggestionService<P> {
    pub fn new(provider: P) -> Self {
        Self::with_timeout(provider, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(provider: P, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn suggest(&self, request: &PathSuggestionRequest) -> Result<PathSuggestionResponse> {
        request.validate()?;

        let generation = GenerationRequest::new(prompt::render(request));
        tracing::debug!(
            "Requesting suggestions from {} (prompt: {} chars, timeout: {:?})",
            self.provider.name(),
            generation.prompt.chars().count(),
            self.timeout
        );

        // At most one provider call per request.
        let raw = match tokio::time::timeout(self.timeout, self.provider.generate(&generation)).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                let err = e.into_provider_error();
                tracing::warn!("Provider {} failed: {}", self.provider.name(), err);
                return Err(err);
            }
            Err(_) => {
                tracing::warn!(
                    "Provider {} timed out after {:?}",
                    self.provider.name(),
                    self.timeout
                );
                return Err(SuggestError::provider(format!(
                    "{} did not respond within {:?}",
                    self.provider.name(),
                    self.timeout
                )));
            }
        };

        let response = PathSuggestionResponse::from_provider_output(raw)?;
        tracing::info!(
            "Received {} learning path suggestion(s)",
            response.suggested_learning_paths.len()
        );
        Ok(response)
    }

    /// Same as [`suggest`](Self::suggest) for callers holding untyped JSON.
    pub async fn suggest_value(&self, value: &serde_json::Value) -> Result<PathSuggestionResponse> {
        let request = PathSuggestionRequest::from_value(value)?;
        self.suggest(&request).await
    }
}
