use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Speech recognition is not supported in this environment")]
    Unavailable,
    #[error("{0}")]
    Recognition(String),
}

#[async_trait]
pub trait SpeechCapturer: Send + Sync {
    fn is_available(&self) -> bool;

    async fn recognize(&self, language: &str) -> Result<Option<String>, CaptureError>;
}

#[async_trait]
impl<S> SpeechCapturer for Box<S>
where
    S: SpeechCapturer + ?Sized,
{
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    async fn recognize(&self, language: &str) -> Result<Option<String>, CaptureError> {
        (**self).recognize(language).await
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoCapturer;

#[async_trait]
impl SpeechCapturer for NoCapturer {
    fn is_available(&self) -> bool {
        false
    }

    async fn recognize(&self, _language: &str) -> Result<Option<String>, CaptureError> {
        Err(CaptureError::Unavailable)
    }
}

#[derive(Debug, Default)]
pub struct ScriptedCapturer {
    outcomes: Mutex<VecDeque<Result<Option<String>, CaptureError>>>,
    languages: Mutex<Vec<String>>,
}

impl ScriptedCapturer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transcript(self, transcript: &str) -> Self {
        self.push(Ok(Some(transcript.to_string())));
        self
    }

    pub fn with_error(self, reason: &str) -> Self {
        self.push(Err(CaptureError::Recognition(reason.to_string())));
        self
    }

    pub fn push(&self, outcome: Result<Option<String>, CaptureError>) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push_back(outcome);
        }
    }

    pub fn sessions(&self) -> Vec<String> {
        self.languages
            .lock()
            .map(|languages| languages.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SpeechCapturer for ScriptedCapturer {
    fn is_available(&self) -> bool {
        true
    }

    async fn recognize(&self, language: &str) -> Result<Option<String>, CaptureError> {
        if let Ok(mut languages) = self.languages.lock() {
            languages.push(language.to_string());
        }

        self.outcomes
            .lock()
            .ok()
            .and_then(|mut outcomes| outcomes.pop_front())
            .unwrap_or(Ok(None))
    }
}
