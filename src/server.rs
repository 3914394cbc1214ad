//! HTTP server exposing the pipeline stages as JSON endpoints.
//!
//! Each stage is reachable independently so a browser front end can drive
//! the pipeline step by step, holding the intermediate data itself:
//!
//! * `POST /api/text-splitter` — text in, ordered chunks out
//! * `POST /api/per-chunk-analysis` — chunks in, summaries out
//! * `POST /api/create-podcast-transcript` — summaries in, transcript out
//! * `POST /api/text-to-speech` — transcript in, MP3 bytes out
//! * `GET /health` — liveness probe
//!
//! Error responses carry the stage's payload field as an explicit JSON
//! `null` so clients can destructure a single response shape for both
//! outcomes. Invalid input is 400, upstream or configuration failures are
//! 500 with the upstream message embedded.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::config::{Complexity, PodcastConfig, DEFAULT_VOICE_ID};
use crate::error::PodcastError;
use crate::pipeline::chunk::TextSplitter;
use crate::pipeline::speech::{ElevenLabsSynthesizer, SpeechSynthesizer};
use crate::pipeline::{compose, polish, summarize};
use crate::generate;

/// Shared state: one configuration for every request.
///
/// Injected generators/synthesizers in the config are reused across
/// requests; otherwise each request resolves its own from the environment.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PodcastConfig>,
}

/// Build the application router.
pub fn router(config: Arc<PodcastConfig>) -> Router {
    let state = AppState { config };
    Router::new()
        .route("/api/text-splitter", post(split_text))
        .route("/api/per-chunk-analysis", post(analyze_chunks))
        .route("/api/create-podcast-transcript", post(create_transcript))
        .route("/api/text-to-speech", post(text_to_speech))
        .route("/health", get(health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is terminated.
pub async fn serve(addr: SocketAddr, config: PodcastConfig) -> Result<(), PodcastError> {
    let app = router(Arc::new(config));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| PodcastError::Internal(format!("failed to bind {addr}: {e}")))?;
    info!("Listening on {}", addr);
    axum::serve(listener, app)
        .await
        .map_err(|e| PodcastError::Internal(format!("server error: {e}")))
}

async fn health() -> &'static str {
    "OK"
}

// ── /api/text-splitter ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct SplitRequest {
    file_content: Option<String>,
}

#[derive(Serialize)]
struct SplitResponse {
    texts: Option<Vec<String>>,
    error: Option<String>,
}

async fn split_text(
    State(state): State<AppState>,
    Json(req): Json<SplitRequest>,
) -> (StatusCode, Json<SplitResponse>) {
    let content = match req.file_content {
        Some(c) if !c.trim().is_empty() => c,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(SplitResponse {
                    texts: None,
                    error: Some("Invalid file_content: expected a non-empty string".to_string()),
                }),
            );
        }
    };

    let splitter = TextSplitter::new(state.config.chunk_size, state.config.chunk_overlap);
    let texts = splitter.split(&content);
    info!(chunks = texts.len(), "text split");
    (
        StatusCode::OK,
        Json(SplitResponse {
            texts: Some(texts),
            error: None,
        }),
    )
}

// ── /api/per-chunk-analysis ──────────────────────────────────────────────

#[derive(Deserialize)]
struct AnalyzeRequest {
    texts: Option<Vec<String>>,
    complexity: Option<String>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    summaries: Option<Vec<String>>,
    error: Option<String>,
}

async fn analyze_chunks(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> (StatusCode, Json<AnalyzeResponse>) {
    let texts = match req.texts {
        Some(t) if !t.is_empty() => t,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AnalyzeResponse {
                    summaries: None,
                    error: Some(
                        "Invalid texts: expected a non-empty array of strings".to_string(),
                    ),
                }),
            );
        }
    };

    // An unknown complexity level falls back to the configured default
    // rather than failing the whole batch.
    let complexity = req
        .complexity
        .as_deref()
        .and_then(|s| s.parse::<Complexity>().ok())
        .unwrap_or(state.config.complexity);

    let mut config = (*state.config).clone();
    config.complexity = complexity;

    let generator = match generate::resolve_generator(&state.config, &state.config.summary_model) {
        Ok(g) => g,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, Json(AnalyzeResponse {
            summaries: None,
            error: Some(format!("Failed to analyze chunks: {e}")),
        })),
    };

    match summarize::summarize_chunks(generator, &texts, &config).await {
        Ok(summaries) => (
            StatusCode::OK,
            Json(AnalyzeResponse {
                summaries: Some(summaries),
                error: None,
            }),
        ),
        Err(e) => {
            error!("chunk analysis failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AnalyzeResponse {
                    summaries: None,
                    error: Some(format!("Failed to analyze chunks: {e}")),
                }),
            )
        }
    }
}

// ── /api/create-podcast-transcript ───────────────────────────────────────

#[derive(Deserialize)]
struct TranscriptRequest {
    summaries: Option<Vec<String>>,
}

#[derive(Serialize)]
struct TranscriptResponse {
    transcript: Option<String>,
    error: Option<String>,
}

async fn create_transcript(
    State(state): State<AppState>,
    Json(req): Json<TranscriptRequest>,
) -> (StatusCode, Json<TranscriptResponse>) {
    let summaries = match req.summaries {
        Some(s) if !s.is_empty() => s,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(TranscriptResponse {
                    transcript: None,
                    error: Some(
                        "Invalid summaries: expected a non-empty array of strings".to_string(),
                    ),
                }),
            );
        }
    };

    let generator =
        match generate::resolve_generator(&state.config, &state.config.transcript_model) {
        Ok(g) => g,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, Json(TranscriptResponse {
            transcript: None,
            error: Some(format!("Failed to create podcast transcript: {e}")),
        })),
    };

    match compose::compose_transcript(generator, &summaries).await {
        Ok(raw) => (
            StatusCode::OK,
            Json(TranscriptResponse {
                transcript: Some(polish::clean_transcript(&raw)),
                error: None,
            }),
        ),
        Err(e) => {
            error!("transcript composition failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TranscriptResponse {
                    transcript: None,
                    error: Some(format!("Failed to create podcast transcript: {e}")),
                }),
            )
        }
    }
}

// ── /api/text-to-speech ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct SpeechRequest {
    transcript: Option<String>,
    #[serde(rename = "voiceId")]
    voice_id: Option<String>,
}

#[derive(Serialize)]
struct SpeechErrorResponse {
    error: String,
}

async fn text_to_speech(
    State(state): State<AppState>,
    Json(req): Json<SpeechRequest>,
) -> Response {
    let transcript = match req.transcript {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(SpeechErrorResponse {
                    error: "Invalid transcript".to_string(),
                }),
            )
                .into_response();
        }
    };
    let voice_id = req
        .voice_id
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string());

    let synthesizer: Arc<dyn SpeechSynthesizer> = match &state.config.synthesizer {
        Some(s) => Arc::clone(s),
        None => match ElevenLabsSynthesizer::from_config(&state.config) {
            Ok(s) => Arc::new(s),
            Err(PodcastError::MissingApiKey { .. }) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(SpeechErrorResponse {
                        error: "Missing API Key".to_string(),
                    }),
                )
                    .into_response();
            }
            Err(e) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(SpeechErrorResponse {
                        error: e.to_string(),
                    }),
                )
                    .into_response();
            }
        },
    };

    match synthesizer.synthesize(&transcript, &voice_id).await {
        Ok(audio) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "audio/mpeg")],
            audio,
        )
            .into_response(),
        Err(e) => {
            error!("speech synthesis failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SpeechErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
