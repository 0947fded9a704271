use tracing::debug;

use crate::modules::language::model::LanguageTable;
use crate::modules::speech::controller as speech;
use crate::modules::speech::model::{ListeningState, RecognitionEvent, RecognitionOutput};
use crate::modules::translation::model::{
    AudioPolicy, LengthWarningPolicy, Outcome, SubmitPolicy, TranslationResult, TranslatorState,
};
use crate::modules::translation::schema::{Gender, TranslationRequest};

pub const EMPTY_INPUT_ALERT: &str = "Please enter some text to translate";
pub const LARGE_TEXT_CONFIRM: &str = "Large text detected. This may take 30-60 seconds. Continue?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslatorEvent {
    InputChanged(String),
    SourceSelected(String),
    TargetSelected(String),
    SpeakerGenderSelected(Gender),
    VoiceGenderSelected(Gender),
    SubmitRequested,
    SubmitConfirmed,
    SubmitDeclined,
    TranslationSucceeded(TranslationResult),
    TranslationFailed(String),
    MicrophoneRequested,
    Recognition(RecognitionEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslatorEffect {
    Alert(String),
    Confirm(String),
    SendTranslation(TranslationRequest),
    StartRecognition { language: String },
}

#[derive(Debug, Clone, Copy)]
pub struct ReducerContext {
    pub languages: LanguageTable,
    pub policy: SubmitPolicy,
    pub speech_available: bool,
}

impl Default for ReducerContext {
    fn default() -> Self {
        Self {
            languages: LanguageTable::builtin(),
            policy: SubmitPolicy::default(),
            speech_available: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: TranslatorState,
    pub effects: Vec<TranslatorEffect>,
}

impl Transition {
    fn unchanged(state: &TranslatorState) -> Self {
        Self::to(state.clone())
    }

    fn to(state: TranslatorState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: TranslatorEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

pub fn build_request(state: &TranslatorState, ctx: &ReducerContext) -> TranslationRequest {
    let tts = match ctx.policy.audio {
        AudioPolicy::Always => true,
        AudioPolicy::WhenSupported => ctx.languages.tts_supported(&state.target_lang),
    };

    TranslationRequest {
        text: state.input_text.clone(),
        source_lang: state.source_lang.clone(),
        target_lang: state.target_lang.clone(),
        tts,
        speaker_gender: state.speaker_gender,
        voice_gender: state.voice_gender,
    }
}

pub fn reduce(state: &TranslatorState, event: TranslatorEvent, ctx: &ReducerContext) -> Transition {
    match event {
        TranslatorEvent::InputChanged(text) => Transition::to(TranslatorState {
            input_text: text,
            ..state.clone()
        }),
        TranslatorEvent::SourceSelected(code) => Transition::to(TranslatorState {
            source_lang: code,
            ..state.clone()
        }),
        TranslatorEvent::TargetSelected(code) => Transition::to(TranslatorState {
            target_lang: code,
            ..state.clone()
        }),
        TranslatorEvent::SpeakerGenderSelected(gender) => Transition::to(TranslatorState {
            speaker_gender: gender,
            ..state.clone()
        }),
        TranslatorEvent::VoiceGenderSelected(gender) => {
            if !ctx.languages.tts_supported(&state.target_lang) {
                return Transition::unchanged(state);
            }
            Transition::to(TranslatorState {
                voice_gender: gender,
                ..state.clone()
            })
        }
        TranslatorEvent::SubmitRequested => submit(state, ctx),
        TranslatorEvent::SubmitConfirmed if state.awaiting_confirmation => begin_request(state, ctx),
        TranslatorEvent::SubmitConfirmed => Transition::unchanged(state),
        TranslatorEvent::SubmitDeclined => Transition::to(TranslatorState {
            awaiting_confirmation: false,
            ..state.clone()
        }),
        TranslatorEvent::TranslationSucceeded(result) => Transition::to(TranslatorState {
            in_flight: false,
            outcome: Some(Outcome::Translated(result)),
            ..state.clone()
        }),
        TranslatorEvent::TranslationFailed(message) => Transition::to(TranslatorState {
            in_flight: false,
            outcome: Some(Outcome::Failed(message)),
            ..state.clone()
        }),
        TranslatorEvent::MicrophoneRequested => request_microphone(state, ctx),
        TranslatorEvent::Recognition(event) => recognition(state, event),
    }
}

fn submit(state: &TranslatorState, ctx: &ReducerContext) -> Transition {
    if state.in_flight || state.awaiting_confirmation {
        return Transition::unchanged(state);
    }

    if state.input_text.trim().is_empty() {
        return Transition::unchanged(state).with(TranslatorEffect::Alert(EMPTY_INPUT_ALERT.to_string()));
    }

    let length = state.input_length();
    if ctx.policy.exceeds_cap(length) {
        debug!(length, max = ctx.policy.max_text_length, "Submit blocked by length cap");
        return Transition::unchanged(state).with(TranslatorEffect::Alert(format!(
            "Text exceeds the {} character limit",
            ctx.policy.max_text_length
        )));
    }

    if ctx.policy.needs_warning(length) && ctx.policy.length_warning == LengthWarningPolicy::Confirm {
        return Transition::to(TranslatorState {
            awaiting_confirmation: true,
            ..state.clone()
        })
        .with(TranslatorEffect::Confirm(LARGE_TEXT_CONFIRM.to_string()));
    }

    begin_request(state, ctx)
}

fn begin_request(state: &TranslatorState, ctx: &ReducerContext) -> Transition {
    let request = build_request(state, ctx);

    Transition::to(TranslatorState {
        in_flight: true,
        awaiting_confirmation: false,
        outcome: None,
        ..state.clone()
    })
    .with(TranslatorEffect::SendTranslation(request))
}

fn request_microphone(state: &TranslatorState, ctx: &ReducerContext) -> Transition {
    let stt_supported = ctx.languages.stt_supported(&state.source_lang);
    if !speech::microphone_enabled(state.listening, stt_supported) {
        return Transition::unchanged(state);
    }

    if !ctx.speech_available {
        return Transition::unchanged(state).with(TranslatorEffect::Alert(
            "Speech recognition is not supported in this environment".to_string(),
        ));
    }

    Transition::to(TranslatorState {
        listening: ListeningState::Requested,
        ..state.clone()
    })
    .with(TranslatorEffect::StartRecognition {
        language: state.source_lang.clone(),
    })
}

fn recognition(state: &TranslatorState, event: RecognitionEvent) -> Transition {
    let (listening, output) = speech::reduce(state.listening, event);
    let next = TranslatorState {
        listening,
        ..state.clone()
    };

    match output {
        Some(RecognitionOutput::Transcript(transcript)) => Transition::to(TranslatorState {
            input_text: transcript,
            ..next
        }),
        Some(RecognitionOutput::Alert(message)) => {
            Transition::to(next).with(TranslatorEffect::Alert(message))
        }
        None => Transition::to(next),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(policy: SubmitPolicy) -> ReducerContext {
        ReducerContext {
            policy,
            speech_available: true,
            ..ReducerContext::default()
        }
    }

    fn typed(text: &str) -> TranslatorState {
        TranslatorState {
            input_text: text.to_string(),
            ..TranslatorState::default()
        }
    }

    fn sent(transition: &Transition) -> Option<&TranslationRequest> {
        transition.effects.iter().find_map(|effect| match effect {
            TranslatorEffect::SendTranslation(request) => Some(request),
            _ => None,
        })
    }

    #[test]
    fn test_whitespace_submit_alerts_without_request() {
        let t = reduce(&typed("   \n"), TranslatorEvent::SubmitRequested, &ctx(SubmitPolicy::default()));

        assert!(sent(&t).is_none());
        assert_eq!(t.effects, vec![TranslatorEffect::Alert(EMPTY_INPUT_ALERT.to_string())]);
        assert!(!t.state.in_flight);
    }

    #[test]
    fn test_over_cap_never_sends() {
        let long = "a".repeat(501);
        let t = reduce(&typed(&long), TranslatorEvent::SubmitRequested, &ctx(SubmitPolicy::default()));

        assert!(sent(&t).is_none());
        assert!(!t.state.in_flight);
    }

    #[test]
    fn test_cap_counts_characters_not_bytes() {
        let text = "é".repeat(500);
        let t = reduce(&typed(&text), TranslatorEvent::SubmitRequested, &ctx(SubmitPolicy::default()));

        assert!(sent(&t).is_some());
    }

    #[test]
    fn test_over_cap_sends_when_cap_disabled() {
        let policy = SubmitPolicy {
            enforce_hard_cap: false,
            ..SubmitPolicy::default()
        };
        let t = reduce(&typed(&"a".repeat(800)), TranslatorEvent::SubmitRequested, &ctx(policy));

        assert!(sent(&t).is_some());
    }

    #[test]
    fn test_submit_clears_previous_outcome() {
        let state = TranslatorState {
            outcome: Some(Outcome::Failed("old".to_string())),
            ..typed("Hello")
        };
        let t = reduce(&state, TranslatorEvent::SubmitRequested, &ctx(SubmitPolicy::default()));

        assert!(t.state.in_flight);
        assert_eq!(t.state.outcome, None);
    }

    #[test]
    fn test_resubmit_while_in_flight_is_ignored() {
        let state = TranslatorState {
            in_flight: true,
            ..typed("Hello")
        };
        let t = reduce(&state, TranslatorEvent::SubmitRequested, &ctx(SubmitPolicy::default()));

        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_advisory_warning_does_not_block() {
        let t = reduce(&typed(&"a".repeat(300)), TranslatorEvent::SubmitRequested, &ctx(SubmitPolicy::default()));

        assert!(sent(&t).is_some());
    }

    #[test]
    fn test_confirm_policy_asks_then_sends() {
        let policy = SubmitPolicy {
            length_warning: LengthWarningPolicy::Confirm,
            ..SubmitPolicy::default()
        };
        let ctx = ctx(policy);

        let asked = reduce(&typed(&"a".repeat(300)), TranslatorEvent::SubmitRequested, &ctx);
        assert_eq!(asked.effects, vec![TranslatorEffect::Confirm(LARGE_TEXT_CONFIRM.to_string())]);
        assert!(asked.state.awaiting_confirmation);

        let confirmed = reduce(&asked.state, TranslatorEvent::SubmitConfirmed, &ctx);
        assert!(sent(&confirmed).is_some());
        assert!(!confirmed.state.awaiting_confirmation);
    }

    #[test]
    fn test_confirm_policy_decline_sends_nothing() {
        let policy = SubmitPolicy {
            length_warning: LengthWarningPolicy::Confirm,
            ..SubmitPolicy::default()
        };
        let ctx = ctx(policy);

        let asked = reduce(&typed(&"a".repeat(300)), TranslatorEvent::SubmitRequested, &ctx);
        let declined = reduce(&asked.state, TranslatorEvent::SubmitDeclined, &ctx);

        assert!(declined.effects.is_empty());
        assert!(!declined.state.awaiting_confirmation);
        assert!(!declined.state.in_flight);
    }

    #[test]
    fn test_audio_gated_by_target_capability() {
        let policy = SubmitPolicy {
            audio: AudioPolicy::WhenSupported,
            ..SubmitPolicy::default()
        };
        let ctx = ctx(policy);

        for entry in ctx.languages.entries() {
            let state = TranslatorState {
                target_lang: entry.code.to_string(),
                ..typed("Hello")
            };
            let request = build_request(&state, &ctx);
            assert_eq!(request.tts, entry.tts_supported, "target {}", entry.code);
        }
    }

    #[test]
    fn test_audio_always_requested() {
        let ctx = ctx(SubmitPolicy::default());
        let state = TranslatorState {
            target_lang: "sv".to_string(),
            ..typed("Hello")
        };

        assert!(build_request(&state, &ctx).tts);
    }

    #[test]
    fn test_request_carries_raw_text_and_genders() {
        let state = TranslatorState {
            speaker_gender: Gender::Male,
            voice_gender: Gender::Female,
            ..typed("  Hello  ")
        };
        let request = build_request(&state, &ctx(SubmitPolicy::default()));

        assert_eq!(request.text, "  Hello  ");
        assert_eq!(request.source_lang, "en");
        assert_eq!(request.target_lang, "hi");
        assert_eq!(request.speaker_gender, Gender::Male);
    }

    #[test]
    fn test_voice_gender_locked_for_text_only_target() {
        let state = TranslatorState {
            target_lang: "tr".to_string(),
            voice_gender: Gender::Female,
            ..TranslatorState::default()
        };
        let t = reduce(
            &state,
            TranslatorEvent::VoiceGenderSelected(Gender::Male),
            &ctx(SubmitPolicy::default()),
        );

        assert_eq!(t.state.voice_gender, Gender::Female);
    }

    #[test]
    fn test_failure_outcome() {
        let state = TranslatorState {
            in_flight: true,
            ..typed("Hello")
        };
        let t = reduce(
            &state,
            TranslatorEvent::TranslationFailed("bad language".to_string()),
            &ctx(SubmitPolicy::default()),
        );

        assert!(!t.state.in_flight);
        assert_eq!(t.state.outcome, Some(Outcome::Failed("bad language".to_string())));
    }

    #[test]
    fn test_microphone_ignored_for_text_only_source() {
        let state = TranslatorState {
            source_lang: "pl".to_string(),
            ..TranslatorState::default()
        };
        let t = reduce(&state, TranslatorEvent::MicrophoneRequested, &ctx(SubmitPolicy::default()));

        assert!(t.effects.is_empty());
        assert_eq!(t.state.listening, ListeningState::Idle);
    }

    #[test]
    fn test_microphone_starts_one_session() {
        let ctx = ctx(SubmitPolicy::default());
        let first = reduce(&TranslatorState::default(), TranslatorEvent::MicrophoneRequested, &ctx);

        assert_eq!(
            first.effects,
            vec![TranslatorEffect::StartRecognition {
                language: "en".to_string()
            }]
        );

        let second = reduce(&first.state, TranslatorEvent::MicrophoneRequested, &ctx);
        assert!(second.effects.is_empty());
    }

    #[test]
    fn test_microphone_without_speech_support_alerts() {
        let ctx = ReducerContext {
            speech_available: false,
            ..ReducerContext::default()
        };
        let t = reduce(&TranslatorState::default(), TranslatorEvent::MicrophoneRequested, &ctx);

        assert!(matches!(t.effects.as_slice(), [TranslatorEffect::Alert(_)]));
        assert_eq!(t.state.listening, ListeningState::Idle);
    }

    #[test]
    fn test_transcript_replaces_input() {
        let ctx = ctx(SubmitPolicy::default());
        let state = TranslatorState {
            listening: ListeningState::Listening,
            ..typed("previous content")
        };

        let t = reduce(
            &state,
            TranslatorEvent::Recognition(RecognitionEvent::Result("hello world".to_string())),
            &ctx,
        );
        assert_eq!(t.state.input_text, "hello world");

        let ended = reduce(&t.state, TranslatorEvent::Recognition(RecognitionEvent::Ended), &ctx);
        assert_eq!(ended.state.listening, ListeningState::Idle);
        assert_eq!(ended.state.input_text, "hello world");
    }
}
