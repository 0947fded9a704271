use tracing::{debug, warn};

use crate::modules::speech::capturer::{CaptureError, SpeechCapturer};
use crate::modules::speech::model::{ListeningState, RecognitionEvent, RecognitionOutput};

pub fn microphone_enabled(state: ListeningState, stt_supported: bool) -> bool {
    stt_supported && !state.is_active()
}

pub fn reduce(
    state: ListeningState,
    event: RecognitionEvent,
) -> (ListeningState, Option<RecognitionOutput>) {
    match event {
        RecognitionEvent::Started => (ListeningState::Listening, None),
        RecognitionEvent::Result(transcript) if state.is_active() => {
            (state, Some(RecognitionOutput::Transcript(transcript)))
        }
        RecognitionEvent::Result(_) => (state, None),
        RecognitionEvent::Error(reason) => (
            ListeningState::Idle,
            Some(RecognitionOutput::Alert(format!(
                "Speech recognition error: {}",
                reason
            ))),
        ),
        RecognitionEvent::Ended => (ListeningState::Idle, None),
    }
}

pub async fn run_session<S>(capturer: &S, language: &str) -> Vec<RecognitionEvent>
where
    S: SpeechCapturer + ?Sized,
{
    let mut events = vec![RecognitionEvent::Started];

    match capturer.recognize(language).await {
        Ok(Some(transcript)) => {
            debug!(language, chars = transcript.chars().count(), "Speech recognized");
            events.push(RecognitionEvent::Result(transcript));
        }
        Ok(None) => debug!(language, "Recognition ended without a result"),
        Err(CaptureError::Unavailable) => {
            events.push(RecognitionEvent::Error(CaptureError::Unavailable.to_string()));
        }
        Err(CaptureError::Recognition(reason)) => {
            warn!(language, reason = %reason, "Speech recognition failed");
            events.push(RecognitionEvent::Error(reason));
        }
    }

    events.push(RecognitionEvent::Ended);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::speech::capturer::ScriptedCapturer;

    #[test]
    fn test_microphone_disabled_for_unsupported_language() {
        assert!(!microphone_enabled(ListeningState::Idle, false));
        assert!(!microphone_enabled(ListeningState::Listening, false));
        assert!(microphone_enabled(ListeningState::Idle, true));
    }

    #[test]
    fn test_microphone_disabled_while_listening() {
        assert!(!microphone_enabled(ListeningState::Requested, true));
        assert!(!microphone_enabled(ListeningState::Listening, true));
    }

    #[test]
    fn test_result_while_listening_yields_transcript() {
        let (state, output) = reduce(
            ListeningState::Listening,
            RecognitionEvent::Result("hello world".to_string()),
        );

        assert_eq!(state, ListeningState::Listening);
        assert_eq!(
            output,
            Some(RecognitionOutput::Transcript("hello world".to_string()))
        );
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let (state, output) = reduce(
            ListeningState::Idle,
            RecognitionEvent::Result("late".to_string()),
        );

        assert_eq!(state, ListeningState::Idle);
        assert_eq!(output, None);
    }

    #[test]
    fn test_error_clears_listening_and_alerts() {
        let (state, output) = reduce(
            ListeningState::Listening,
            RecognitionEvent::Error("no-speech".to_string()),
        );

        assert_eq!(state, ListeningState::Idle);
        assert_eq!(
            output,
            Some(RecognitionOutput::Alert(
                "Speech recognition error: no-speech".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_run_session_event_order() {
        let capturer = ScriptedCapturer::new().with_transcript("hola");

        let events = run_session(&capturer, "es").await;

        assert_eq!(
            events,
            vec![
                RecognitionEvent::Started,
                RecognitionEvent::Result("hola".to_string()),
                RecognitionEvent::Ended,
            ]
        );
        assert_eq!(capturer.sessions(), vec!["es".to_string()]);
    }

    #[tokio::test]
    async fn test_run_session_error_then_end() {
        let capturer = ScriptedCapturer::new().with_error("network");

        let events = run_session(&capturer, "en").await;

        assert_eq!(
            events,
            vec![
                RecognitionEvent::Started,
                RecognitionEvent::Error("network".to_string()),
                RecognitionEvent::Ended,
            ]
        );
    }
}
