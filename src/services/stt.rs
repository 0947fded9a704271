use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::settings::Settings;
use crate::modules::speech::capturer::{CaptureError, SpeechCapturer};

#[derive(Error, Debug)]
pub enum SttError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

pub struct Transcript {
    pub text: String,
    pub language: Option<String>,
}

/// Client for a Whisper-compatible `/audio/transcriptions` endpoint.
#[derive(Clone)]
pub struct SttClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl SttClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, SttError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(SttError::MissingApiKey);
        }

        Ok(Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SttError> {
        let api_key = settings.stt_api_key.clone().ok_or(SttError::MissingApiKey)?;
        Self::new(settings.stt_base_url.clone(), api_key, settings.stt_model.clone())
    }

    pub async fn transcribe(
        &self,
        audio_data: Vec<u8>,
        file_name: &str,
        language: Option<&str>,
    ) -> Result<Transcript, SttError> {
        let mime_type = Self::get_mime_type(file_name);

        let file_part = Part::bytes(audio_data)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| SttError::InvalidResponse(e.to_string()))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");

        if let Some(lang) = language {
            form = form.text("language", lang.to_string());
        }

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&error_text) {
                return Err(SttError::ApiError(error_response.error.message));
            }
            return Err(SttError::ApiError(error_text));
        }

        let whisper_response: WhisperResponse = response.json().await?;

        Ok(Transcript {
            text: whisper_response.text,
            language: whisper_response.language,
        })
    }

    fn get_mime_type(file_name: &str) -> &'static str {
        match extension(file_name).as_str() {
            "mp3" => "audio/mpeg",
            "wav" => "audio/wav",
            "webm" => "audio/webm",
            "ogg" => "audio/ogg",
            "m4a" => "audio/m4a",
            "flac" => "audio/flac",
            "mp4" => "audio/mp4",
            _ => "application/octet-stream",
        }
    }

    pub fn supported_formats() -> Vec<&'static str> {
        vec!["mp3", "wav", "webm", "ogg", "m4a", "flac", "mp4"]
    }

    pub fn is_supported(file_name: &str) -> bool {
        Self::supported_formats().contains(&extension(file_name).as_str())
    }
}

fn extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub struct ClipCapturer {
    client: SttClient,
    clip: PathBuf,
}

impl ClipCapturer {
    pub fn new(client: SttClient, clip: impl Into<PathBuf>) -> Result<Self, SttError> {
        let clip = clip.into();
        let name = clip.to_string_lossy().to_string();
        if !SttClient::is_supported(&name) {
            return Err(SttError::UnsupportedFormat(name));
        }
        Ok(Self { client, clip })
    }
}

#[async_trait]
impl SpeechCapturer for ClipCapturer {
    fn is_available(&self) -> bool {
        true
    }

    async fn recognize(&self, language: &str) -> Result<Option<String>, CaptureError> {
        let audio = tokio::fs::read(&self.clip)
            .await
            .map_err(|e| CaptureError::Recognition(e.to_string()))?;

        let file_name = self
            .clip
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());

        info!(file = %file_name, bytes = audio.len(), language, "Transcribing clip");

        match self.client.transcribe(audio, &file_name, Some(language)).await {
            Ok(transcript) => {
                let text = transcript.text.trim().to_string();
                if let Some(detected) = transcript.language.as_deref() {
                    if !detected.starts_with(language) {
                        warn!(expected = language, detected, "Transcription language differs from source");
                    }
                }
                Ok((!text.is_empty()).then_some(text))
            }
            Err(e) => Err(CaptureError::Recognition(e.to_string())),
        }
    }
}
