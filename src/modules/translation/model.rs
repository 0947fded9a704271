use serde::{Deserialize, Serialize};

use crate::modules::language::model::{DEFAULT_SOURCE_LANG, DEFAULT_TARGET_LANG};
use crate::modules::speech::model::ListeningState;
use crate::modules::translation::schema::Gender;

pub const MAX_TEXT_LENGTH: usize = 500;
pub const WARN_TEXT_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub romanized_text: Option<String>,
    pub audio_url: Option<String>,
}

impl TranslationResult {
    pub fn has_audio(&self) -> bool {
        self.audio_url.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Translated(TranslationResult),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioPolicy {
    #[default]
    Always,
    WhenSupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthWarningPolicy {
    #[default]
    Advisory,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPolicy {
    pub audio: AudioPolicy,
    pub length_warning: LengthWarningPolicy,
    pub enforce_hard_cap: bool,
    pub max_text_length: usize,
    pub warn_text_length: usize,
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self {
            audio: AudioPolicy::default(),
            length_warning: LengthWarningPolicy::default(),
            enforce_hard_cap: true,
            max_text_length: MAX_TEXT_LENGTH,
            warn_text_length: WARN_TEXT_LENGTH,
        }
    }
}

impl SubmitPolicy {
    pub fn exceeds_cap(&self, length: usize) -> bool {
        self.enforce_hard_cap && length > self.max_text_length
    }

    pub fn needs_warning(&self, length: usize) -> bool {
        length > self.warn_text_length
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorState {
    pub input_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub speaker_gender: Gender,
    pub voice_gender: Gender,
    pub in_flight: bool,
    pub awaiting_confirmation: bool,
    pub outcome: Option<Outcome>,
    pub listening: ListeningState,
}

impl TranslatorState {
    pub fn input_length(&self) -> usize {
        self.input_text.chars().count()
    }
}

impl Default for TranslatorState {
    fn default() -> Self {
        Self {
            input_text: String::new(),
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            speaker_gender: Gender::default(),
            voice_gender: Gender::default(),
            in_flight: false,
            awaiting_confirmation: false,
            outcome: None,
            listening: ListeningState::default(),
        }
    }
}
