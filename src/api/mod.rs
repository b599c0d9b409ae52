use crate::config::{ProviderConfig, ProviderKind};
use crate::constants::{GENERATION_FAILED_MESSAGE, RETRY_BASE_DELAY};
use crate::error::WizardError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

pub mod gemini;
pub mod ollama;
pub mod openai_compat;
#[cfg(test)]
pub(crate) mod testing;

use crate::api::gemini::GeminiProvider;
use crate::api::ollama::OllamaProvider;
use crate::api::openai_compat::OpenAiCompatibleProvider;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Chat message for providers that speak a chat protocol.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Provider-level failures. These are logged and never shown to the user verbatim.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP client-level error (connection, timeout, body decoding)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// API returned a non-success status
    #[error("API response error: {0}")]
    Response(String),
    /// 401/403 from the provider
    #[error("Authentication rejected: {0}")]
    Unauthorized(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Provider returned no text")]
    EmptyCompletion,
}

impl ApiError {
    /// Maps a non-success status to an error, keeping auth rejections apart.
    pub fn from_status(status: StatusCode, detail: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(detail),
            _ => ApiError::Response(detail),
        }
    }

    /// Configuration and credential problems will not go away by asking again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ApiError::Config(_) | ApiError::Unauthorized(_))
    }
}

/// A text-generation backend: one prompt in, one completion out.
#[async_trait]
pub trait TextProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn complete(&self, prompt: &str) -> Result<String, ApiError>;
    async fn check_availability(&self) -> Result<(), ApiError>;
}

pub(crate) fn build_http_client(timeout: Option<Duration>) -> Client {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_default()
}

pub fn create_provider(config: &ProviderConfig) -> Arc<dyn TextProvider> {
    let client = build_http_client(config.request_timeout());
    match config.kind {
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(
            client,
            config.name.clone(),
            config.active_model.clone(),
            config.base_url.clone(),
            config.api_key(),
            config.temperature(),
        )),
        ProviderKind::OpenAiCompatible => Arc::new(OpenAiCompatibleProvider::new(
            client,
            config.name.clone(),
            config.active_model.clone(),
            config.base_url.clone(),
            config.api_key(),
            config.temperature(),
        )),
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            client,
            config.name.clone(),
            config.active_model.clone(),
            config.base_url.clone(),
            config.temperature(),
        )),
    }
}

/// Sends prompts to a [`TextProvider`] and folds every failure into
/// [`WizardError::GenerationFailed`].
///
/// By default each call makes exactly one attempt. Retries with exponential
/// backoff are opt-in through [`GenerationClient::with_retries`].
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn TextProvider>,
    max_retries: u32,
    base_delay: Duration,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self {
            provider,
            max_retries: 0,
            base_delay: RETRY_BASE_DELAY,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(create_provider(config)).with_retries(config.max_retries(), RETRY_BASE_DELAY)
    }

    pub fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn check_availability(&self) -> Result<(), ApiError> {
        self.provider.check_availability().await
    }

    /// Runs one generation attempt (plus any configured retries).
    ///
    /// Blank completions count as failures, so a successful return is never empty.
    pub async fn generate(&self, prompt: &str) -> Result<String, WizardError> {
        let start = Instant::now();
        let mut attempt = 0;
        loop {
            attempt += 1;
            tracing::debug!(
                "Dispatching {} char prompt to {} (attempt {})",
                prompt.len(),
                self.provider.name(),
                attempt
            );

            let outcome = match self.provider.complete(prompt).await {
                Ok(text) if text.trim().is_empty() => Err(ApiError::EmptyCompletion),
                other => other,
            };

            match outcome {
                Ok(text) => {
                    tracing::info!(
                        "{} returned {} chars in {:.2}s",
                        self.provider.name(),
                        text.len(),
                        start.elapsed().as_secs_f64()
                    );
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && attempt <= self.max_retries => {
                    let delay = self.base_delay * 2u32.saturating_pow(attempt - 1);
                    tracing::warn!(
                        "Generation attempt {} via {} failed: {}. Retrying in {:?}",
                        attempt,
                        self.provider.name(),
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!("Error generating content via {}: {}", self.provider.name(), e);
                    return Err(WizardError::GenerationFailed {
                        message: GENERATION_FAILED_MESSAGE.to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubProvider;
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Response("test error".to_string());
        assert_eq!(format!("{}", err), "API response error: test error");
        assert_eq!(ApiError::EmptyCompletion.to_string(), "Provider returned no text");
    }

    #[test]
    fn test_config_errors_are_not_retryable() {
        assert!(!ApiError::Config("missing key".to_string()).is_retryable());
        assert!(ApiError::Response("503".to_string()).is_retryable());
        assert!(ApiError::EmptyCompletion.is_retryable());
        assert!(!ApiError::Unauthorized("401".to_string()).is_retryable());
    }

    #[test]
    fn test_from_status_separates_auth_failures() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, "bad key".to_string()),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "denied".to_string()),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, "busy".to_string()),
            ApiError::Response(_)
        ));
    }

    #[test]
    fn test_create_provider_uses_configured_name() {
        let config = crate::config::AppConfig::default();
        for provider in &config.providers {
            let created = create_provider(provider);
            assert_eq!(created.name(), provider.name);
        }
    }

    #[tokio::test]
    async fn test_generate_returns_provider_text() {
        let stub = StubProvider::ok("Paragraph one.\n\nParagraph two.");
        let client = GenerationClient::new(stub.clone());
        let text = client.generate("prompt").await.unwrap();
        assert_eq!(text, "Paragraph one.\n\nParagraph two.");
        assert_eq!(stub.calls(), vec!["prompt".to_string()]);
    }

    #[tokio::test]
    async fn test_generate_maps_failure_to_uniform_error() {
        let stub = StubProvider::new(vec![Err(ApiError::Response(
            "401 Unauthorized: API key not valid".to_string(),
        ))]);
        let client = GenerationClient::new(stub.clone());
        let err = client.generate("prompt").await.unwrap_err();
        match err {
            WizardError::GenerationFailed { message } => {
                assert_eq!(message, "Failed to generate content");
                assert!(!message.contains("401"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_single_attempt_by_default() {
        let stub = StubProvider::new(vec![
            Err(ApiError::Response("boom".to_string())),
            Ok("never reached".to_string()),
        ]);
        let client = GenerationClient::new(stub.clone());
        assert!(client.generate("p").await.is_err());
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_blank_text_is_failure() {
        let stub = StubProvider::ok("   \n\n ");
        let client = GenerationClient::new(stub);
        assert!(matches!(
            client.generate("p").await,
            Err(WizardError::GenerationFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_retries_with_backoff_when_enabled() {
        let stub = StubProvider::new(vec![
            Err(ApiError::Response("503".to_string())),
            Ok(String::new()),
            Ok("finally".to_string()),
        ]);
        let client =
            GenerationClient::new(stub.clone()).with_retries(2, Duration::from_millis(1));
        assert_eq!(client.generate("p").await.unwrap(), "finally");
        assert_eq!(stub.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_generate_retry_budget_is_bounded() {
        let stub = StubProvider::new(vec![
            Err(ApiError::Response("1".to_string())),
            Err(ApiError::Response("2".to_string())),
            Err(ApiError::Response("3".to_string())),
            Ok("too late".to_string()),
        ]);
        let client =
            GenerationClient::new(stub.clone()).with_retries(2, Duration::from_millis(1));
        assert!(client.generate("p").await.is_err());
        assert_eq!(stub.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_generate_does_not_retry_auth_rejections() {
        let stub = StubProvider::new(vec![
            Err(ApiError::Unauthorized("API error (401): invalid key".to_string())),
            Ok("unused".to_string()),
        ]);
        let client =
            GenerationClient::new(stub.clone()).with_retries(3, Duration::from_millis(1));
        assert!(matches!(
            client.generate("p").await,
            Err(WizardError::GenerationFailed { .. })
        ));
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_does_not_retry_config_errors() {
        let stub = StubProvider::new(vec![
            Err(ApiError::Config("API key is missing".to_string())),
            Ok("unused".to_string()),
        ]);
        let client =
            GenerationClient::new(stub.clone()).with_retries(3, Duration::from_millis(1));
        assert!(client.generate("p").await.is_err());
        assert_eq!(stub.calls().len(), 1);
    }
}
