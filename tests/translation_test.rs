use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{http::StatusCode, routing::post, Json, Router};
use linguacoach::modules::speech::capturer::NoCapturer;
use linguacoach::modules::translation::controller::{ReducerContext, TranslatorEvent};
use linguacoach::modules::translation::model::{AudioPolicy, SubmitPolicy};
use linguacoach::modules::translation::schema::{Gender, TranslationRequest};
use linguacoach::modules::translation::session::TranslatorSession;
use linguacoach::modules::translation::view::{AudioView, OutputView};
use linguacoach::platform::RecordingPrompter;
use linguacoach::services::translator::{TranslateError, TranslatorClient};
use serde_json::{json, Value};

type Seen = Arc<Mutex<Vec<Value>>>;

async fn spawn_stub(status: StatusCode, reply: Value) -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let seen_handler = Arc::clone(&seen);

    let app = Router::new().route(
        "/translate",
        post(move |Json(body): Json<Value>| {
            let seen = Arc::clone(&seen_handler);
            let reply = reply.clone();
            async move {
                seen.lock().unwrap().push(body);
                (status, Json(reply))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), seen)
}

fn client(base_url: &str) -> TranslatorClient {
    TranslatorClient::new(base_url, Duration::from_secs(2)).unwrap()
}

fn request(text: &str, target: &str) -> TranslationRequest {
    TranslationRequest {
        text: text.to_string(),
        source_lang: "en".to_string(),
        target_lang: target.to_string(),
        tts: true,
        speaker_gender: Gender::Female,
        voice_gender: Gender::Male,
    }
}

fn session(
    base_url: &str,
    policy: SubmitPolicy,
) -> TranslatorSession<TranslatorClient, NoCapturer, RecordingPrompter> {
    let ctx = ReducerContext {
        policy,
        ..ReducerContext::default()
    };
    TranslatorSession::new(ctx, client(base_url), NoCapturer, RecordingPrompter::accepting())
}

#[tokio::test]
async fn test_translate_posts_wire_body() {
    let (url, seen) = spawn_stub(
        StatusCode::OK,
        json!({ "translated_text": "Hola", "romanized_text": null, "audio_url": "http://x/a.mp3" }),
    )
    .await;

    let result = client(&url).translate(&request("Hello", "es")).await.unwrap();

    assert_eq!(result.translated_text, "Hola");
    assert_eq!(result.audio_url.as_deref(), Some("http://x/a.mp3"));

    let bodies = seen.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![json!({
            "text": "Hello",
            "source_lang": "en",
            "target_lang": "es",
            "tts": true,
            "speaker_gender": "female",
            "voice_gender": "male"
        })]
    );
}

#[tokio::test]
async fn test_non_success_status_is_http_error() {
    let (url, _) = spawn_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Translation service temporarily unavailable" }),
    )
    .await;

    let err = client(&url).translate(&request("Hello", "es")).await.unwrap_err();

    assert!(matches!(err, TranslateError::Http(500)));
    assert_eq!(err.to_string(), "HTTP error! status: 500");
}

#[tokio::test]
async fn test_error_field_with_ok_status_is_service_error() {
    let (url, _) = spawn_stub(StatusCode::OK, json!({ "error": "bad language" })).await;

    let err = client(&url).translate(&request("Hello", "xx")).await.unwrap_err();

    assert!(matches!(err, TranslateError::Service(ref m) if m == "bad language"));
}

#[tokio::test]
async fn test_blank_request_is_rejected_before_sending() {
    let (url, seen) = spawn_stub(StatusCode::OK, json!({ "translated_text": "x" })).await;

    let err = client(&url).translate(&request("  ", "es")).await.unwrap_err();

    assert!(matches!(err, TranslateError::InvalidRequest(_)));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .translate(&request("Hello", "es"))
        .await
        .unwrap_err();

    assert!(matches!(err, TranslateError::RequestError(_)));
}

#[tokio::test]
async fn test_session_renders_text_without_audio_notice() {
    let (url, _) = spawn_stub(StatusCode::OK, json!({ "translated_text": "Hola", "audio_url": null })).await;
    let mut s = session(&url, SubmitPolicy::default());

    s.dispatch(TranslatorEvent::TargetSelected("es".to_string())).await;
    s.dispatch(TranslatorEvent::InputChanged("Hello".to_string())).await;
    s.dispatch(TranslatorEvent::SubmitRequested).await;

    assert_eq!(
        s.view().output,
        Some(OutputView::Translation {
            text: "Hola".to_string(),
            romanized: None,
            audio: AudioView::Unavailable {
                notice: "Audio not available for Spanish".to_string()
            },
        })
    );
}

#[tokio::test]
async fn test_session_renders_player_and_romanization() {
    let (url, _) = spawn_stub(
        StatusCode::OK,
        json!({ "translated_text": "नमस्ते", "romanized_text": "namaste", "audio_url": "http://x/a.mp3" }),
    )
    .await;
    let mut s = session(&url, SubmitPolicy::default());

    s.dispatch(TranslatorEvent::InputChanged("Hello".to_string())).await;
    s.dispatch(TranslatorEvent::SubmitRequested).await;

    assert_eq!(
        s.view().output,
        Some(OutputView::Translation {
            text: "नमस्ते".to_string(),
            romanized: Some("namaste".to_string()),
            audio: AudioView::Player {
                url: "http://x/a.mp3".to_string()
            },
        })
    );
}

#[tokio::test]
async fn test_session_renders_service_error_without_extras() {
    let (url, _) = spawn_stub(StatusCode::OK, json!({ "error": "bad language" })).await;
    let mut s = session(&url, SubmitPolicy::default());

    s.dispatch(TranslatorEvent::InputChanged("Hello".to_string())).await;
    s.dispatch(TranslatorEvent::SubmitRequested).await;

    assert_eq!(
        s.view().output,
        Some(OutputView::Error {
            message: "Error: bad language".to_string()
        })
    );
    assert!(!s.view().busy);
}

#[tokio::test]
async fn test_session_renders_nothing_for_empty_translation() {
    let (url, _) = spawn_stub(StatusCode::OK, json!({ "translated_text": "", "audio_url": null })).await;
    let mut s = session(&url, SubmitPolicy::default());

    s.dispatch(TranslatorEvent::InputChanged("Hello".to_string())).await;
    s.dispatch(TranslatorEvent::SubmitRequested).await;

    assert_eq!(s.view().output, None);
    assert!(!s.view().busy);
}

#[tokio::test]
async fn test_session_renders_http_failure() {
    let (url, _) = spawn_stub(StatusCode::BAD_GATEWAY, json!({})).await;
    let mut s = session(&url, SubmitPolicy::default());

    s.dispatch(TranslatorEvent::InputChanged("Hello".to_string())).await;
    s.dispatch(TranslatorEvent::SubmitRequested).await;

    assert_eq!(
        s.view().output,
        Some(OutputView::Error {
            message: "Error: HTTP error! status: 502".to_string()
        })
    );
}

#[tokio::test]
async fn test_session_never_calls_for_whitespace_or_over_cap() {
    let (url, seen) = spawn_stub(StatusCode::OK, json!({ "translated_text": "x" })).await;
    let mut s = session(&url, SubmitPolicy::default());

    s.dispatch(TranslatorEvent::InputChanged(" \t ".to_string())).await;
    s.dispatch(TranslatorEvent::SubmitRequested).await;

    s.dispatch(TranslatorEvent::InputChanged("a".repeat(501))).await;
    s.dispatch(TranslatorEvent::SubmitRequested).await;

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(s.prompter().alerts().len(), 2);
}

#[tokio::test]
async fn test_capability_gated_audio_request() {
    let (url, seen) = spawn_stub(StatusCode::OK, json!({ "translated_text": "x" })).await;
    let policy = SubmitPolicy {
        audio: AudioPolicy::WhenSupported,
        ..SubmitPolicy::default()
    };
    let mut s = session(&url, policy);

    s.dispatch(TranslatorEvent::InputChanged("Hello".to_string())).await;
    s.dispatch(TranslatorEvent::TargetSelected("nl".to_string())).await;
    s.dispatch(TranslatorEvent::SubmitRequested).await;
    s.dispatch(TranslatorEvent::TargetSelected("fr".to_string())).await;
    s.dispatch(TranslatorEvent::SubmitRequested).await;

    let bodies = seen.lock().unwrap().clone();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0]["tts"], false);
    assert_eq!(bodies[1]["tts"], true);
}
