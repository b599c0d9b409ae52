use crate::api::GenerationClient;
use crate::content::{Format, GenerationRequest, GenerationResult, Tone, WordCount};
use crate::error::{ValidationError, WizardError};
use crate::export::{export_filename, Exporter};
use crate::prompt::build_request_prompt;
use std::path::PathBuf;

/// Where the session is in the generate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Generating,
    /// Output holds the text of the last successful generation.
    Ready,
}

/// In-memory state of one user session. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub request: GenerationRequest,
    pub output: GenerationResult,
    pub is_loading: bool,
    pub phase: Phase,
}

/// Owns the session and drives it through explicit transitions.
///
/// A front end calls the setters as the user edits the form, then
/// [`ViewController::generate`] (or the `begin_generate`/`finish_generate`
/// pair when it needs to render the loading state in between).
pub struct ViewController {
    state: SessionState,
    client: GenerationClient,
    exporter: Box<dyn Exporter>,
    notice: Option<String>,
}

impl ViewController {
    pub fn new(client: GenerationClient, exporter: Box<dyn Exporter>, request: GenerationRequest) -> Self {
        Self {
            state: SessionState {
                request,
                ..SessionState::default()
            },
            client,
            exporter,
            notice: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn output(&self) -> &GenerationResult {
        &self.state.output
    }

    /// Last message surfaced to the user, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.state.request.topic = topic.into();
    }

    pub fn set_word_count(&mut self, words: u32) -> Result<(), ValidationError> {
        self.state.request.word_count = WordCount::new(words)?;
        Ok(())
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.state.request.tone = tone;
    }

    pub fn set_format(&mut self, format: Format) {
        self.state.request.format = format;
    }

    /// The generate control is disabled while a request is in flight.
    pub fn can_generate(&self) -> bool {
        !self.state.is_loading
    }

    /// The export control is disabled until there is output.
    pub fn can_export(&self) -> bool {
        !self.state.output.is_empty()
    }

    /// `Idle | Ready -> Generating`. Returns the prompt to dispatch.
    ///
    /// An empty topic is rejected with a notice and leaves the state untouched.
    pub fn begin_generate(&mut self) -> Result<String, WizardError> {
        if self.state.is_loading {
            return Err(ValidationError::GenerationInFlight.into());
        }
        if let Err(e) = self.state.request.validate() {
            self.notice = Some(e.to_string());
            return Err(e.into());
        }

        self.notice = None;
        self.state.is_loading = true;
        self.state.phase = Phase::Generating;
        Ok(build_request_prompt(&self.state.request))
    }

    /// `Generating -> Ready` on success, `Generating -> Idle` on failure.
    ///
    /// A failure keeps whatever output the session already had. Outside the
    /// `Generating` phase the call is rejected and the session is left as is.
    pub fn finish_generate(
        &mut self,
        outcome: Result<String, WizardError>,
    ) -> Result<&GenerationResult, WizardError> {
        if self.state.phase != Phase::Generating {
            tracing::warn!("Ignoring generation result in phase {:?}", self.state.phase);
            return Err(ValidationError::NoGenerationInFlight.into());
        }
        self.state.is_loading = false;
        match outcome {
            Ok(text) => {
                self.state.output = GenerationResult::new(text);
                self.state.phase = Phase::Ready;
                Ok(&self.state.output)
            }
            Err(e) => {
                self.state.phase = Phase::Idle;
                self.notice = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Runs one full generation attempt against the configured provider.
    pub async fn generate(&mut self) -> Result<&GenerationResult, WizardError> {
        let prompt = self.begin_generate()?;
        tracing::info!(
            "Generating {} words ({}, {}) via {}",
            self.state.request.word_count,
            self.state.request.tone,
            self.state.request.format,
            self.client.provider_name()
        );
        let outcome = self.client.generate(&prompt).await;
        self.finish_generate(outcome)
    }

    /// Hands the current output to the exporter. A no-op without output.
    pub fn export(&self) -> Result<Option<PathBuf>, WizardError> {
        if !self.can_export() {
            return Ok(None);
        }
        let filename = export_filename(&self.state.request.topic, self.state.request.format);
        let path = self.exporter.export(&self.state.output.text, &filename)?;
        Ok(Some(path))
    }
}
