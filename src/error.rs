//! Error types for the papercast library.
//!
//! One enum covers the whole pipeline because every failure is terminal for
//! the request that produced it: there are no retries and no partial-result
//! policies anywhere (a single failed chunk summary aborts the batch, a
//! rejected synthesis call aborts the conversion). The variants still keep
//! the three failure families distinct so callers — in particular the HTTP
//! layer — can map them to the right status class:
//!
//! * invalid input (bad path, not a PDF, empty document, bad config),
//! * upstream-service failures (LLM or speech API, message embedded),
//! * missing configuration (absent credential, unresolvable provider).

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the papercast library.
#[derive(Debug, Error)]
pub enum PodcastError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// pdf-extract could not parse the document.
    #[error("Text extraction failed for '{path}': {detail}")]
    ExtractionFailed { path: PathBuf, detail: String },

    /// The PDF parsed but yielded no text (scanned images, empty document).
    /// Rejected explicitly rather than sent onward as an empty chunk list.
    #[error("No text could be extracted from '{path}'\nThe PDF may be a scan without a text layer.")]
    EmptyDocument { path: PathBuf },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No LLM provider could be resolved (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API returned an error for a single request.
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    /// One chunk summary failed, aborting the whole batch.
    ///
    /// The summarizer has no partial-result policy: the remaining in-flight
    /// requests are dropped when this is returned.
    #[error("Chunk {chunk}/{total} failed to summarize: {detail}")]
    ChunkFailed {
        chunk: usize,
        total: usize,
        detail: String,
    },

    // ── Speech synthesis errors ───────────────────────────────────────────
    /// The speech provider credential is absent from config and environment.
    #[error("Missing API key for '{provider}'\nSet {env_var} or inject the key via the config.")]
    MissingApiKey {
        provider: String,
        env_var: &'static str,
    },

    /// The speech API rejected the request (quota, bad voice, bad key).
    #[error("Speech synthesis rejected (HTTP {status}): {detail}")]
    SynthesisRejected { status: u16, detail: String },

    /// The request itself failed (network, timeout, truncated stream).
    #[error("Speech synthesis failed: {detail}")]
    SynthesisFailed { detail: String },

    /// The provider returned a 2xx with an empty body.
    #[error("Speech synthesis returned no audio data")]
    EmptyAudio,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output audio file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_failed_display() {
        let e = PodcastError::ChunkFailed {
            chunk: 3,
            total: 12,
            detail: "rate limited".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("3/12"), "got: {msg}");
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn missing_api_key_display_names_env_var() {
        let e = PodcastError::MissingApiKey {
            provider: "elevenlabs".into(),
            env_var: "ELEVENLABS_API_KEY",
        };
        assert!(e.to_string().contains("ELEVENLABS_API_KEY"));
    }

    #[test]
    fn synthesis_rejected_display() {
        let e = PodcastError::SynthesisRejected {
            status: 401,
            detail: "invalid api key".into(),
        };
        assert!(e.to_string().contains("401"));
        assert!(e.to_string().contains("invalid api key"));
    }

    #[test]
    fn empty_document_display() {
        let e = PodcastError::EmptyDocument {
            path: PathBuf::from("scan.pdf"),
        };
        assert!(e.to_string().contains("scan.pdf"));
    }
}
