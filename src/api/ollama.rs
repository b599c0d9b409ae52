use crate::api::{ApiError, Message, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Local Ollama daemon. Needs no credential.
pub struct OllamaProvider {
    client: Client,
    pub name: String,
    pub model: String,
    pub base_url: String,
    temperature: f32,
}

impl OllamaProvider {
    pub fn new(client: Client, name: String, model: String, base_url: String, temperature: f32) -> Self {
        Self {
            client,
            name,
            model,
            base_url,
            temperature,
        }
    }
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Message,
}

#[derive(Deserialize)]
struct OllamaTags {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

#[async_trait]
impl TextProvider for OllamaProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_availability(&self) -> Result<(), ApiError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Response(format!(
                "Ollama returned status {}",
                response.status()
            )));
        }

        let tags: OllamaTags = response.json().await?;
        if tags
            .models
            .iter()
            .any(|m| m.name == self.model || m.name.starts_with(&format!("{}:", self.model)))
        {
            Ok(())
        } else {
            Err(ApiError::Response(format!(
                "Model {} not found in Ollama",
                self.model
            )))
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, ApiError> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(url)
            .json(&json!({
                "model": self.model,
                "messages": [Message::user(prompt)],
                "stream": false,
                "options": {
                    "temperature": self.temperature
                }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(
                status,
                format!("Ollama chat error ({}): {}", status, body),
            ));
        }

        let body = response.text().await?;
        let chat: OllamaChatResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::Malformed(format!("Ollama response: {}", e)))?;
        Ok(chat.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{local_client, serve_once};

    fn provider(base_url: String, model: &str) -> OllamaProvider {
        OllamaProvider::new(
            local_client(),
            "Ollama".to_string(),
            model.to_string(),
            base_url,
            0.7,
        )
    }

    #[tokio::test]
    async fn test_complete_reads_message_content() {
        let (base_url, server) = serve_once(
            200,
            r#"{"model":"mistral","message":{"role":"assistant","content":"Local words."},"done":true}"#,
        )
        .await;
        let ollama = provider(base_url, "mistral");
        assert_eq!(ollama.complete("topic").await.unwrap(), "Local words.");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/chat"));
        assert!(request.contains("\"stream\":false"));
        assert!(!request.to_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn test_check_availability_matches_tagged_model() {
        let (base_url, server) =
            serve_once(200, r#"{"models":[{"name":"llama3.2:3b"},{"name":"mistral:latest"}]}"#)
                .await;
        assert!(provider(base_url, "mistral").check_availability().await.is_ok());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_check_availability_missing_model() {
        let (base_url, server) = serve_once(200, r#"{"models":[{"name":"llama3.2:3b"}]}"#).await;
        let err = provider(base_url, "qwen2.5")
            .check_availability()
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "API response error: Model qwen2.5 not found in Ollama"
        );
        server.await.unwrap();
    }
}
