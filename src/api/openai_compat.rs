use crate::api::{ApiError, Message, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Any backend exposing the OpenAI `/chat/completions` API.
pub struct OpenAiCompatibleProvider {
    client: Client,
    pub name: String,
    pub model: String,
    pub base_url: String,
    api_key: Option<String>,
    temperature: f32,
}

impl OpenAiCompatibleProvider {
    pub fn new(
        client: Client,
        name: String,
        model: String,
        base_url: String,
        api_key: Option<String>,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            name,
            model,
            base_url,
            api_key,
            temperature,
        }
    }

    fn key(&self) -> Result<&str, ApiError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ApiError::Config("API Key is missing".to_string()))
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl TextProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_availability(&self) -> Result<(), ApiError> {
        let key = self.key()?;
        let url = format!("{}/models", self.base_url);
        let response = self.client.get(url).bearer_auth(key).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::Response(format!(
                "API returned status {}",
                response.status()
            )))
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, ApiError> {
        let key = self.key()?;
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(key)
            .json(&json!({
                "model": self.model,
                "messages": [Message::user(prompt)],
                "temperature": self.temperature,
                "stream": false
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(
                status,
                format!("API error ({}): {}", status, body),
            ));
        }

        let body = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::Malformed(format!("chat completion: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ApiError::EmptyCompletion)
    }
}
