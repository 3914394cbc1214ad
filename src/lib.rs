//! # papercast
//!
//! Turn a research paper (PDF) into a narrated podcast.
//!
//! ## Why this crate?
//!
//! Reading a dense paper takes an hour of full attention; listening to a
//! well-produced explainer takes a commute. This crate automates the
//! production: it extracts the paper's text, summarizes it piecewise with a
//! cheap language model, composes the summaries into one flowing narration
//! with a stronger model, and turns the narration into MP3 audio.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input       resolve local file or download from URL
//!  ├─ 2. Extract     text layer via pdf-extract (CPU-bound, spawn_blocking)
//!  ├─ 3. Chunk       recursive character splitting (1700 chars, 20 overlap)
//!  ├─ 4. Summarize   concurrent per-chunk calls to gpt-4o-mini
//!  ├─ 5. Compose     single gpt-4o call weaving summaries into narration
//!  ├─ 6. Polish      strip fences/headers/list markers from the script
//!  └─ 7. Synthesize  ElevenLabs text-to-speech → MP3 byte buffer
//! ```
//!
//! Data flows strictly forward; the only concurrency is inside step 4, and
//! a single failed chunk there aborts the whole batch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use papercast::{generate, PodcastConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // LLM provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY;
//!     // speech synthesis reads ELEVENLABS_API_KEY.
//!     let config = PodcastConfig::default();
//!     let output = generate("paper.pdf", &config).await?;
//!     std::fs::write("paper.mp3", &output.audio)?;
//!     eprintln!("{} chunks, {} audio bytes", output.stats.chunk_count, output.stats.audio_bytes);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `papercast` binary (clap + anyhow + tracing-subscriber) |
//! | `server` | on      | Enables the axum HTTP server exposing each stage as a JSON endpoint |
//!
//! Disable both when using only the library:
//! ```toml
//! papercast = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod session;

#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Complexity, PodcastConfig, PodcastConfigBuilder, DEFAULT_VOICE_ID};
pub use error::PodcastError;
pub use generate::{
    extract_only, generate, generate_from_bytes, generate_from_text, generate_sync,
    generate_to_file,
};
pub use output::{PodcastOutput, PodcastStats};
pub use pipeline::llm::TextGenerator;
pub use pipeline::speech::SpeechSynthesizer;
pub use progress::{PipelineStage, PodcastProgressCallback, ProgressCallback};
pub use session::{ConversionSession, SessionState};
