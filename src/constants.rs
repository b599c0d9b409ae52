//! Application-wide constants for content-wizard.
//!
//! Centralizes all magic numbers and default values to improve maintainability
//! and make the codebase self-documenting.

use std::time::Duration;

// ============================================================================
// Application Identity
// ============================================================================

/// Directory name used under the platform config directory.
pub const APP_DIR_NAME: &str = "content-wizard";

/// Name of the configuration file inside [`APP_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

// ============================================================================
// Generation Request
// ============================================================================

/// Smallest word count a request may ask for.
pub const MIN_WORD_COUNT: u32 = 100;

/// Largest word count a request may ask for.
pub const MAX_WORD_COUNT: u32 = 2000;

/// Increment used by word-count selectors.
pub const WORD_COUNT_STEP: u32 = 100;

/// Word count of a fresh session.
pub const DEFAULT_WORD_COUNT: u32 = 500;

// ============================================================================
// User-facing Messages
// ============================================================================

/// Notice shown when generate is requested without a topic.
pub const EMPTY_TOPIC_NOTICE: &str = "Please enter a keyword";

/// Uniform message for every failed generation attempt.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate content";

// ============================================================================
// AI Providers
// ============================================================================

/// Base URL for the Gemini REST API.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model.
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-pro";

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Base URL for the OpenAI REST API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default OpenAI chat model.
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Base URL for a local Ollama daemon.
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default Ollama model.
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3.2:3b";

/// Sampling temperature used when a provider config does not set one.
pub const AI_TEMPERATURE: f32 = 0.7;

/// First delay of the optional retry backoff. Doubles on each retry.
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Upper bound for `max_retries` in provider configs.
pub const MAX_RETRIES_CAP: u32 = 5;
