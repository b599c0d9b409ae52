//! Data model for a generation session: what the user asks for and what comes back.

use crate::constants::{DEFAULT_WORD_COUNT, MAX_WORD_COUNT, MIN_WORD_COUNT, WORD_COUNT_STEP};
use crate::error::ValidationError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Writing tone requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Academic,
    Creative,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Professional, Tone::Casual, Tone::Academic, Tone::Creative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Academic => "academic",
            Tone::Creative => "creative",
        }
    }

    /// Human readable label for selectors.
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Academic => "Academic",
            Tone::Creative => "Creative",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownTone(s.to_string()))
    }
}

/// Shape of the requested piece of writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Article,
    Blog,
    Essay,
    Report,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Article, Format::Blog, Format::Essay, Format::Report];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Article => "article",
            Format::Blog => "blog",
            Format::Essay => "essay",
            Format::Report => "report",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Format::Article => "Article",
            Format::Blog => "Blog Post",
            Format::Essay => "Essay",
            Format::Report => "Report",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownFormat(s.to_string()))
    }
}

/// Requested length in words, always within `MIN_WORD_COUNT..=MAX_WORD_COUNT`.
///
/// The value is only a request to the model; nothing checks the length of
/// the text that comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WordCount(u32);

impl WordCount {
    pub fn new(words: u32) -> Result<Self, ValidationError> {
        if (MIN_WORD_COUNT..=MAX_WORD_COUNT).contains(&words) {
            Ok(Self(words))
        } else {
            Err(ValidationError::WordCountOutOfRange(words))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Values offered by a stepped selector (100, 200, ... 2000).
    pub fn steps() -> impl Iterator<Item = WordCount> {
        (MIN_WORD_COUNT..=MAX_WORD_COUNT)
            .step_by(WORD_COUNT_STEP as usize)
            .map(WordCount)
    }
}

impl Default for WordCount {
    fn default() -> Self {
        Self(DEFAULT_WORD_COUNT)
    }
}

impl TryFrom<u32> for WordCount {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        WordCount::new(value)
    }
}

impl From<WordCount> for u32 {
    fn from(value: WordCount) -> Self {
        value.0
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything needed to build a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    pub word_count: WordCount,
    pub tone: Tone,
    pub format: Format,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, word_count: WordCount, tone: Tone, format: Format) -> Self {
        Self {
            topic: topic.into(),
            word_count,
            tone,
            format,
        }
    }

    /// A request may only be issued with a non-empty topic.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.topic.is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        Ok(())
    }
}

/// Text returned by a provider. Paragraphs are separated by a blank line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
}

impl GenerationResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Splits the text into display paragraphs on double line breaks.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}
