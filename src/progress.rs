//! Progress-callback trait for pipeline events.
//!
//! Inject an [`Arc<dyn PodcastProgressCallback>`] via
//! [`crate::config::PodcastConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline moves through its stages.
//!
//! The callback approach keeps the library agnostic about how the host
//! application communicates: the CLI forwards events to an indicatif bar, a
//! server could forward them to a WebSocket. The trait is `Send + Sync`
//! because chunk summaries are produced concurrently.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The five externally visible pipeline stages, in execution order.
///
/// The orchestrator passes through them strictly forward; the state machine
/// in [`crate::session`] mirrors them for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Extracting,
    Chunking,
    Summarizing,
    Composing,
    Synthesizing,
}

impl PipelineStage {
    /// All stages in execution order.
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::Extracting,
        PipelineStage::Chunking,
        PipelineStage::Summarizing,
        PipelineStage::Composing,
        PipelineStage::Synthesizing,
    ];

    /// The stage after this one, if any.
    pub fn next(self) -> Option<PipelineStage> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(idx + 1).copied()
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineStage::Extracting => "extracting",
            PipelineStage::Chunking => "chunking",
            PipelineStage::Summarizing => "summarizing",
            PipelineStage::Composing => "composing",
            PipelineStage::Synthesizing => "synthesizing",
        };
        f.write_str(s)
    }
}

/// Called by the pipeline as it progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `on_summary_start` and `on_summary_complete` may be
/// called concurrently from different tasks; implementations must protect
/// shared mutable state.
pub trait PodcastProgressCallback: Send + Sync {
    /// Called when a stage begins.
    fn on_stage_start(&self, stage: PipelineStage) {
        let _ = stage;
    }

    /// Called when a stage finishes successfully.
    fn on_stage_complete(&self, stage: PipelineStage) {
        let _ = stage;
    }

    /// Called just before the summarization request for one chunk is sent.
    ///
    /// # Arguments
    /// * `index` — 1-indexed chunk number
    /// * `total` — total chunks in this conversion
    fn on_summary_start(&self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// Called when one chunk summary arrives.
    ///
    /// # Arguments
    /// * `index`       — 1-indexed chunk number
    /// * `total`       — total chunks
    /// * `summary_len` — byte length of the produced summary
    fn on_summary_complete(&self, index: usize, total: usize, summary_len: usize) {
        let _ = (index, total, summary_len);
    }

    /// Called once after the audio artifact is fully assembled.
    ///
    /// # Arguments
    /// * `chunk_count` — chunks that were summarized
    /// * `audio_bytes` — size of the final audio buffer
    fn on_pipeline_complete(&self, chunk_count: usize, audio_bytes: usize) {
        let _ = (chunk_count, audio_bytes);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PodcastProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PodcastConfig`].
pub type ProgressCallback = Arc<dyn PodcastProgressCallback>;
