//! Output types: the finished podcast artifact and its run statistics.

use serde::{Deserialize, Serialize};

/// The result of a successful conversion.
///
/// The transcript and per-chunk summaries are kept alongside the audio for
/// diagnostics (`--transcript-out`, debug logging); the audio buffer is the
/// terminal artifact. Everything is request-scoped — nothing here persists
/// beyond the caller dropping the value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodcastOutput {
    /// The composed narration script, post-polish.
    pub transcript: String,

    /// One summary per chunk, in chunk order.
    pub summaries: Vec<String>,

    /// The full MP3 byte buffer. Skipped during serialisation: `--json`
    /// output reports stats and text, the audio goes to a file.
    #[serde(skip)]
    pub audio: Vec<u8>,

    /// Timing and size statistics for the run.
    pub stats: PodcastStats,
}

/// Statistics describing one conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodcastStats {
    /// Number of chunks the document was split into (= number of summaries).
    pub chunk_count: usize,

    /// Characters of text extracted from the PDF.
    pub extracted_chars: usize,

    /// Characters in the final transcript.
    pub transcript_chars: usize,

    /// Size of the final audio buffer in bytes.
    pub audio_bytes: usize,

    /// Wall-clock duration of text extraction in milliseconds.
    pub extract_duration_ms: u64,

    /// Wall-clock duration of the concurrent summarization batch.
    pub summarize_duration_ms: u64,

    /// Wall-clock duration of the transcript-composition call.
    pub compose_duration_ms: u64,

    /// Wall-clock duration of speech synthesis (including stream drain).
    pub synthesize_duration_ms: u64,

    /// Total wall-clock duration of the whole pipeline.
    pub total_duration_ms: u64,
}
