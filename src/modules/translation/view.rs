use serde::Serialize;

use crate::modules::speech::controller::microphone_enabled;
use crate::modules::translation::controller::ReducerContext;
use crate::modules::translation::model::{Outcome, TranslatorState};

pub const LENGTH_WARNING: &str = "Large text may take 30-60 seconds";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioView {
    Player { url: String },
    Unavailable { notice: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputView {
    Translation {
        text: String,
        romanized: Option<String>,
        audio: AudioView,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharCounter {
    pub count: usize,
    pub max: usize,
    pub warning: Option<&'static str>,
    pub over_limit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatorView {
    pub counter: CharCounter,
    pub submit_enabled: bool,
    pub busy: bool,
    pub mic_enabled: bool,
    pub listening: bool,
    pub voice_gender_enabled: bool,
    pub voice_notice: Option<String>,
    pub output: Option<OutputView>,
}

pub fn render(state: &TranslatorState, ctx: &ReducerContext) -> TranslatorView {
    let languages = &ctx.languages;
    let policy = &ctx.policy;
    let count = state.input_length();
    let over_limit = count > policy.max_text_length;
    let target_tts = languages.tts_supported(&state.target_lang);

    TranslatorView {
        counter: CharCounter {
            count,
            max: policy.max_text_length,
            warning: policy.needs_warning(count).then_some(LENGTH_WARNING),
            over_limit,
        },
        submit_enabled: !state.in_flight && !state.awaiting_confirmation && !policy.exceeds_cap(count),
        busy: state.in_flight,
        mic_enabled: ctx.speech_available
            && microphone_enabled(state.listening, languages.stt_supported(&state.source_lang)),
        listening: state.listening.is_active(),
        voice_gender_enabled: target_tts,
        voice_notice: (!target_tts).then(|| "Voice not available for this language".to_string()),
        output: state
            .outcome
            .as_ref()
            .and_then(|outcome| render_outcome(outcome, languages.display_name(&state.target_lang))),
    }
}

fn render_outcome(outcome: &Outcome, target_name: &str) -> Option<OutputView> {
    let view = match outcome {
        // An empty translation shows nothing at all.
        Outcome::Translated(result) if result.translated_text.is_empty() => return None,
        Outcome::Translated(result) => OutputView::Translation {
            text: result.translated_text.clone(),
            romanized: result.romanized_text.clone(),
            audio: match &result.audio_url {
                Some(url) => AudioView::Player { url: url.clone() },
                None => AudioView::Unavailable {
                    notice: format!("Audio not available for {}", target_name),
                },
            },
        },
        Outcome::Failed(message) => OutputView::Error {
            message: format!("Error: {}", message),
        },
    };
    Some(view)
}

impl std::fmt::Display for OutputView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputView::Translation {
                text,
                romanized,
                audio,
            } => {
                writeln!(f, "Translation: {}", text)?;
                if let Some(romanized) = romanized {
                    writeln!(f, "Pronunciation: {}", romanized)?;
                }
                match audio {
                    AudioView::Player { url } if url.starts_with("data:") => {
                        write!(f, "Audio: inline ({} bytes encoded)", url.len())
                    }
                    AudioView::Player { url } => write!(f, "Audio: {}", url),
                    AudioView::Unavailable { notice } => write!(f, "{}", notice),
                }
            }
            OutputView::Error { message } => write!(f, "{}", message),
        }
    }
}
