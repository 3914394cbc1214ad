//! Pipeline stages for PDF-to-podcast conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap an external
//! service (the LLM provider, the speech provider) without touching the
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ chunk ──▶ summarize ──▶ compose ──▶ polish ──▶ speech
//! (URL/path) (pdf-extract) (splitter) (N LLM calls)  (1 LLM call) (cleanup)  (TTS)
//! ```
//!
//! 1. [`input`]     — canonicalise the user-supplied path or URL to a local file
//! 2. [`extract`]   — pull the text layer out of the PDF; runs in
//!    `spawn_blocking` because pdf-extract is synchronous
//! 3. [`chunk`]     — split the text into bounded, overlapping chunks
//! 4. [`summarize`] — one concurrent LLM call per chunk, collected in order,
//!    fail-fast
//! 5. [`compose`]   — a single LLM call turning the summaries into narration
//! 6. [`polish`]    — deterministic cleanup so the script carries no headers
//!    or list markers
//! 7. [`speech`]    — synthesize the script into a single MP3 buffer
//!
//! [`llm`] holds the provider seam the summarize and compose stages share.

pub mod chunk;
pub mod compose;
pub mod extract;
pub mod input;
pub mod llm;
pub mod polish;
pub mod speech;
pub mod summarize;
