use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::translation::model::TranslationResult;
use crate::modules::validation::validate_not_blank;
use crate::services::translator::TranslateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    #[default]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Body of `POST /translate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct TranslationRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
    #[validate(length(min = 2, max = 8, message = "Invalid source language code"))]
    pub source_lang: String,
    #[validate(length(min = 2, max = 8, message = "Invalid target language code"))]
    pub target_lang: String,
    pub tts: bool,
    pub speaker_gender: Gender,
    pub voice_gender: Gender,
}

#[derive(Debug, Default, Deserialize)]
pub struct TranslationResponse {
    #[serde(default)]
    pub translated_text: Option<String>,
    #[serde(default)]
    pub romanized_text: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub source_lang: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TranslationResponse {
    pub fn into_result(self) -> Result<TranslationResult, TranslateError> {
        if let Some(error) = non_empty(self.error) {
            return Err(TranslateError::Service(error));
        }

        let translated_text = self
            .translated_text
            .ok_or_else(|| TranslateError::InvalidResponse("missing translated_text".to_string()))?;

        Ok(TranslationResult {
            translated_text,
            romanized_text: non_empty(self.romanized_text),
            audio_url: non_empty(self.audio_url),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
