//! HTTP endpoint tests.
//!
//! Each test drives the axum router directly with `tower::ServiceExt::oneshot`
//! — no sockets, no API keys. Fake providers are injected through the shared
//! config, exactly as a browser front end would observe the running service.

#![cfg(feature = "server")]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use papercast::{server, PodcastConfig, PodcastError, SpeechSynthesizer, TextGenerator};
use serde_json::{json, Value};
use tower::ServiceExt;

// ── Fakes ────────────────────────────────────────────────────────────────────

struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, PodcastError> {
        // Echo the prompt tail so responses stay distinguishable per chunk.
        let tail: String = {
            let mut chars: Vec<char> = prompt.chars().rev().take(30).collect();
            chars.reverse();
            chars.into_iter().collect()
        };
        Ok(format!("echo [{tail}]"))
    }
}

struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, PodcastError> {
        Err(PodcastError::LlmApiError {
            message: "quota exceeded".to_string(),
        })
    }
}

struct StubSynthesizer;

#[async_trait]
impl SpeechSynthesizer for StubSynthesizer {
    async fn synthesize(&self, transcript: &str, _voice: &str) -> Result<Vec<u8>, PodcastError> {
        assert!(!transcript.is_empty());
        Ok(vec![0xFF, 0xFB, 0x90, 0x00, 0xAA, 0xBB])
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn test_router() -> axum::Router {
    let config = PodcastConfig::builder()
        .generator(Arc::new(EchoGenerator))
        .synthesizer(Arc::new(StubSynthesizer))
        .build()
        .expect("valid config");
    server::router(Arc::new(config))
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid JSON body")
}

// ── /health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("handler runs");
    assert_eq!(response.status(), StatusCode::OK);
}

// ── /api/text-splitter ───────────────────────────────────────────────────────

#[tokio::test]
async fn split_returns_chunks_and_null_error() {
    let response = test_router()
        .oneshot(json_request(
            "/api/text-splitter",
            json!({ "file_content": "A. B. C." }),
        ))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["error"], Value::Null);
    assert_eq!(body["texts"], json!(["A. B. C."]));
}

#[tokio::test]
async fn split_rejects_missing_file_content() {
    let response = test_router()
        .oneshot(json_request("/api/text-splitter", json!({})))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["texts"], Value::Null);
    assert_eq!(
        body["error"],
        json!("Invalid file_content: expected a non-empty string")
    );
}

#[tokio::test]
async fn split_rejects_blank_file_content() {
    let response = test_router()
        .oneshot(json_request(
            "/api/text-splitter",
            json!({ "file_content": "   " }),
        ))
        .await
        .expect("handler runs");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ── /api/per-chunk-analysis ──────────────────────────────────────────────────

#[tokio::test]
async fn analysis_returns_one_summary_per_chunk_in_order() {
    let response = test_router()
        .oneshot(json_request(
            "/api/per-chunk-analysis",
            json!({
                "texts": ["first chunk alpha", "second chunk beta", "third chunk gamma"],
                "complexity": "BEGINNER"
            }),
        ))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["error"], Value::Null);

    let summaries = body["summaries"].as_array().expect("array of summaries");
    assert_eq!(summaries.len(), 3, "N chunks in, N summaries out");
    assert!(summaries[0].as_str().unwrap().contains("alpha"));
    assert!(summaries[1].as_str().unwrap().contains("beta"));
    assert!(summaries[2].as_str().unwrap().contains("gamma"));
}

#[tokio::test]
async fn analysis_rejects_empty_texts() {
    let response = test_router()
        .oneshot(json_request(
            "/api/per-chunk-analysis",
            json!({ "texts": [] }),
        ))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["summaries"], Value::Null);
    assert_eq!(
        body["error"],
        json!("Invalid texts: expected a non-empty array of strings")
    );
}

#[tokio::test]
async fn analysis_surfaces_provider_failure_as_500() {
    let config = PodcastConfig::builder()
        .generator(Arc::new(FailingGenerator))
        .synthesizer(Arc::new(StubSynthesizer))
        .build()
        .expect("valid config");
    let app = server::router(Arc::new(config));

    let response = app
        .oneshot(json_request(
            "/api/per-chunk-analysis",
            json!({ "texts": ["one chunk"] }),
        ))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["summaries"], Value::Null);
    let error = body["error"].as_str().expect("error string");
    assert!(error.starts_with("Failed to analyze chunks: "));
    assert!(error.contains("quota exceeded"), "upstream message embedded");
}

// ── /api/create-podcast-transcript ───────────────────────────────────────────

#[tokio::test]
async fn transcript_returns_single_string() {
    let response = test_router()
        .oneshot(json_request(
            "/api/create-podcast-transcript",
            json!({ "summaries": ["summary one", "summary two"] }),
        ))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["error"], Value::Null);
    assert!(body["transcript"].is_string(), "one string, never an array");
}

#[tokio::test]
async fn transcript_rejects_missing_summaries() {
    let response = test_router()
        .oneshot(json_request("/api/create-podcast-transcript", json!({})))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["transcript"], Value::Null);
    assert_eq!(
        body["error"],
        json!("Invalid summaries: expected a non-empty array of strings")
    );
}

// ── /api/text-to-speech ──────────────────────────────────────────────────────

#[tokio::test]
async fn speech_returns_audio_mpeg_bytes() {
    let response = test_router()
        .oneshot(json_request(
            "/api/text-to-speech",
            json!({ "transcript": "Welcome to the show." }),
        ))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("audio/mpeg")
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    assert!(!bytes.is_empty(), "non-empty audio buffer");
    assert_eq!(&bytes[..2], &[0xFF, 0xFB]);
}

#[tokio::test]
async fn speech_rejects_missing_transcript() {
    let response = test_router()
        .oneshot(json_request("/api/text-to-speech", json!({})))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Invalid transcript"));
}

#[tokio::test]
async fn speech_reports_missing_credential_as_500() {
    // No injected synthesizer and no key in the config: the handler must
    // answer 500 with no partial audio. Skipped when the environment carries
    // a real key, which would make the request succeed instead.
    if std::env::var("ELEVENLABS_API_KEY").is_ok() {
        println!("SKIP — ELEVENLABS_API_KEY is set");
        return;
    }

    let config = PodcastConfig::builder()
        .generator(Arc::new(EchoGenerator))
        .build()
        .expect("valid config");
    let app = server::router(Arc::new(config));

    let response = app
        .oneshot(json_request(
            "/api/text-to-speech",
            json!({ "transcript": "Hello." }),
        ))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Missing API Key"));
}
