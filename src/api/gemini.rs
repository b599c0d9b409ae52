use crate::api::{ApiError, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini `generateContent` endpoint.
pub struct GeminiProvider {
    client: Client,
    pub name: String,
    pub model: String,
    pub base_url: String,
    api_key: Option<String>,
    temperature: f32,
}

impl GeminiProvider {
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
            .ok_or_else(|| ApiError::Config("Gemini API key is missing".to_string()))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Joins the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, ApiError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ApiError::Response(format!("Prompt blocked: {}", reason)));
    }

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        Err(ApiError::EmptyCompletion)
    } else {
        Ok(text)
    }
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_availability(&self) -> Result<(), ApiError> {
        let key = self.key()?;
        let url = format!("{}/models/{}", self.base_url, self.model);
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::Response(format!(
                "Gemini returned status {}",
                response.status()
            )))
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, ApiError> {
        let key = self.key()?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, key)
            .json(&json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }],
                "generationConfig": {
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
                format!("Gemini error ({}): {}", status, body),
            ));
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::Malformed(format!("Gemini response: {}", e)))?;
        extract_text(parsed)
    }
}
