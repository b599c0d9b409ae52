use crate::constants::{
    AI_TEMPERATURE, APP_DIR_NAME, CONFIG_FILE_NAME, GEMINI_API_KEY_ENV, GEMINI_BASE_URL,
    GEMINI_DEFAULT_MODEL, MAX_RETRIES_CAP, OLLAMA_BASE_URL, OLLAMA_DEFAULT_MODEL,
    OPENAI_API_KEY_ENV, OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL,
};
use crate::content::{Format, GenerationRequest, Tone, WordCount};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Wire protocol spoken by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Gemini,
    OpenAiCompatible,
    Ollama,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub name: String,
    pub kind: ProviderKind,
    pub base_url: String,
    pub active_model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Name of the environment variable holding the API key. Keys are never
    /// written to the config file.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub max_retries: u32,
}

impl ProviderConfig {
    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(AI_TEMPERATURE)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries.min(MAX_RETRIES_CAP)
    }
}

/// Starting values of a new session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct GenerationDefaults {
    #[serde(default)]
    pub word_count: WordCount,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub format: Format,
}

impl GenerationDefaults {
    pub fn request(&self, topic: impl Into<String>) -> GenerationRequest {
        GenerationRequest::new(topic, self.word_count, self.tone, self.format)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub active_provider: String,
    pub providers: Vec<ProviderConfig>,
    #[serde(default)]
    pub defaults: GenerationDefaults,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            active_provider: "Gemini".to_string(),
            providers: vec![
                ProviderConfig {
                    name: "Gemini".to_string(),
                    kind: ProviderKind::Gemini,
                    base_url: GEMINI_BASE_URL.to_string(),
                    active_model: GEMINI_DEFAULT_MODEL.to_string(),
                    temperature: None,
                    api_key_env: Some(GEMINI_API_KEY_ENV.to_string()),
                    request_timeout_secs: None,
                    max_retries: 0,
                },
                ProviderConfig {
                    name: "OpenAI".to_string(),
                    kind: ProviderKind::OpenAiCompatible,
                    base_url: OPENAI_BASE_URL.to_string(),
                    active_model: OPENAI_DEFAULT_MODEL.to_string(),
                    temperature: Some(AI_TEMPERATURE),
                    api_key_env: Some(OPENAI_API_KEY_ENV.to_string()),
                    request_timeout_secs: None,
                    max_retries: 0,
                },
                ProviderConfig {
                    name: "Ollama".to_string(),
                    kind: ProviderKind::Ollama,
                    base_url: OLLAMA_BASE_URL.to_string(),
                    active_model: OLLAMA_DEFAULT_MODEL.to_string(),
                    temperature: None,
                    api_key_env: None,
                    request_timeout_secs: None,
                    max_retries: 0,
                },
            ],
            defaults: GenerationDefaults::default(),
            export_dir: None,
        }
    }
}

impl AppConfig {
    pub fn config_dir() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR_NAME);
        path
    }

    pub fn config_file() -> PathBuf {
        let mut path = Self::config_dir();
        path.push(CONFIG_FILE_NAME);
        path
    }

    /// Loads the user config, falling back to defaults when it is missing or invalid.
    pub fn load() -> Self {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Invalid config {:?}, using defaults: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Could not read config {:?}, using defaults: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_file())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
            }
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    pub fn get_active_provider(&self) -> Option<&ProviderConfig> {
        self.get_provider(&self.active_provider)
    }

    /// Looks a provider up by name, ignoring case.
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}
