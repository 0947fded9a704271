use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::config::settings::Settings;
use crate::modules::translation::model::TranslationResult;
use crate::modules::translation::schema::{TranslationRequest, TranslationResponse};
use crate::modules::translation::session::TranslationService;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("HTTP error! status: {0}")]
    Http(u16),
    #[error("{0}")]
    Service(String),
    #[error("{0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Clone)]
pub struct TranslatorClient {
    client: Client,
    base_url: String,
}

impl TranslatorClient {
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self, TranslateError> {
        let client = Client::builder().connect_timeout(connect_timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, TranslateError> {
        Self::new(settings.translator_url.clone(), settings.http_connect_timeout)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/translate", self.base_url)
    }

    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, TranslateError> {
        request.validate()?;

        info!(
            source = %request.source_lang,
            target = %request.target_lang,
            tts = request.tts,
            chars = request.text.chars().count(),
            "Sending translation request"
        );

        let response = self.client.post(self.endpoint()).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Translation endpoint returned an error status");
            return Err(TranslateError::Http(status.as_u16()));
        }

        let body: TranslationResponse = response.json().await?;
        let result = body.into_result()?;

        debug!(
            has_audio = result.has_audio(),
            has_romanization = result.romanized_text.is_some(),
            "Translation received"
        );

        Ok(result)
    }
}

#[async_trait]
impl TranslationService for TranslatorClient {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, TranslateError> {
        TranslatorClient::translate(self, request).await
    }
}
