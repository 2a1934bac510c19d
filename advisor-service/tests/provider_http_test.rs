//! Exercises the remote providers against a local mock server.

use advisor_service::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use advisor_service::services::providers::openai::{OpenAiConfig, OpenAiTextProvider};
use advisor_service::services::providers::{
    CompletionParams, FinishReason, ProviderError, TextProvider,
};
use advisor_service::services::AdvisorService;
use advisor_service::{build_router, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use secrecy::SecretString;
use std::sync::Arc;
use tower::ServiceExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn openai(server: &MockServer) -> OpenAiTextProvider {
    OpenAiTextProvider::new(
        OpenAiConfig {
            api_key: SecretString::new("sk-test".to_string()),
            model: "gpt-3.5-turbo".to_string(),
            api_base: format!("{}/v1", server.uri()),
        },
        5,
    )
    .expect("Failed to build provider")
}

fn gemini(server: &MockServer) -> GeminiTextProvider {
    GeminiTextProvider::new(
        GeminiConfig {
            api_key: SecretString::new("g-test".to_string()),
            model: "gemini-2.0-flash".to_string(),
            api_base: server.uri(),
        },
        5,
    )
    .expect("Failed to build provider")
}

#[tokio::test]
async fn openai_sends_chat_request_and_reads_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 200,
            "messages": [
                {"role": "system", "content": "system prompt"},
                {"role": "user", "content": "user prompt"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {"role": "assistant", "content": "  Actionable Items:\n- Call client\n"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 40, "completion_tokens": 8}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let completion = openai(&server)
        .complete("system prompt", "user prompt", &CompletionParams::default())
        .await
        .expect("completion failed");

    assert_eq!(completion.text, "Actionable Items:\n- Call client");
    assert_eq!(completion.input_tokens, 40);
    assert_eq!(completion.output_tokens, 8);
    assert_eq!(completion.finish_reason, FinishReason::Complete);
}

#[tokio::test]
async fn openai_maps_429_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = openai(&server)
        .complete("s", "u", &CompletionParams::default())
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::RateLimited);
}

#[tokio::test]
async fn openai_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = openai(&server)
        .complete("s", "u", &CompletionParams::default())
        .await
        .unwrap_err();

    match err {
        ProviderError::ApiError(msg) => {
            assert!(msg.contains("401"));
            assert!(msg.contains("invalid api key"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn openai_without_choices_is_empty_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = openai(&server)
        .complete("s", "u", &CompletionParams::default())
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::EmptyCompletion);
}

#[tokio::test]
async fn openai_malformed_body_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = openai(&server)
        .complete("s", "u", &CompletionParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ApiError(_)));
}

#[tokio::test]
async fn gemini_sends_system_instruction() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "g-test"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "system prompt"}]},
            "generationConfig": {"maxOutputTokens": 200}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "- Diversify\n"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 30, "candidatesTokenCount": 3}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let completion = gemini(&server)
        .complete("system prompt", "user prompt", &CompletionParams::default())
        .await
        .expect("completion failed");

    assert_eq!(completion.text, "- Diversify");
    assert_eq!(completion.input_tokens, 30);
}

#[tokio::test]
async fn gemini_safety_stop_is_content_filtered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        })))
        .mount(&server)
        .await;

    let err = gemini(&server)
        .complete("s", "u", &CompletionParams::default())
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::ContentFiltered);
}

fn unreachable_gemini(key: &str) -> GeminiTextProvider {
    GeminiTextProvider::new(
        GeminiConfig {
            api_key: SecretString::new(key.to_string()),
            model: "gemini-2.0-flash".to_string(),
            // Nothing listens on port 1.
            api_base: "http://127.0.0.1:1".to_string(),
        },
        5,
    )
    .expect("Failed to build provider")
}

#[tokio::test]
async fn gemini_key_is_not_sent_in_query_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "ok"}]},
                "finishReason": "STOP"
            }]
        })))
        .mount(&server)
        .await;

    gemini(&server)
        .complete("s", "u", &CompletionParams::default())
        .await
        .expect("completion failed");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query().is_none());
}

#[tokio::test]
async fn network_error_does_not_expose_gemini_key() {
    let err = unreachable_gemini("TOPSECRETKEY")
        .complete("s", "u", &CompletionParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NetworkError(_)));
    assert!(!err.to_string().contains("TOPSECRETKEY"));
}

#[tokio::test]
async fn unreachable_provider_500_body_omits_credential() {
    let advisor = AdvisorService::new(
        Arc::new(unreachable_gemini("TOPSECRETKEY")),
        CompletionParams::default(),
        true,
    );
    let app = build_router(AppState { advisor });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/extract_action_items")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"meeting_notes": "Review the portfolio."}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8_lossy(&bytes);
    assert!(body.contains("Network error"));
    assert!(!body.contains("TOPSECRETKEY"));
}
