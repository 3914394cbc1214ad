//! Configuration types for podcast generation.
//!
//! Every knob lives in [`PodcastConfig`], built via its
//! [`PodcastConfigBuilder`]. Keeping the whole configuration in one struct
//! makes it trivial to share across the CLI, the HTTP server, and tests, and
//! to diff two runs to understand why their outputs differ.
//!
//! The speech-synthesis credential is an explicit field rather than an ad hoc
//! per-request environment read: the binary and the server read the
//! environment once at startup and inject the value here, so tests can swap
//! in fakes without touching process state.

use crate::error::PodcastError;
use crate::pipeline::llm::TextGenerator;
use crate::pipeline::speech::SpeechSynthesizer;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Default ElevenLabs voice (the "George" stock voice).
pub const DEFAULT_VOICE_ID: &str = "JBFqnCBsd6RMkjVDRZzb";

/// Configuration for a PDF-to-podcast conversion.
///
/// Built via [`PodcastConfig::builder()`] or [`PodcastConfig::default()`].
///
/// # Example
/// ```rust
/// use papercast::{Complexity, PodcastConfig};
///
/// let config = PodcastConfig::builder()
///     .chunk_size(1700)
///     .complexity(Complexity::Beginner)
///     .concurrency(8)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PodcastConfig {
    /// Maximum chunk length in characters. Default: 1700.
    ///
    /// Keeps each summarization request comfortably inside per-request size
    /// limits while leaving enough context for a coherent 3–4 sentence
    /// summary. Larger chunks mean fewer requests but coarser summaries.
    pub chunk_size: usize,

    /// Overlap between neighbouring chunks in characters. Default: 20.
    ///
    /// A small overlap stops sentences that straddle a chunk boundary from
    /// being summarized with half their context missing. Must be strictly
    /// smaller than `chunk_size`; the builder rejects anything else.
    pub chunk_overlap: usize,

    /// Summarization depth, chosen once per conversion and applied uniformly
    /// to every chunk. Default: [`Complexity::Intermediate`].
    pub complexity: Complexity,

    /// Number of concurrent per-chunk summarization calls. Default: 8.
    ///
    /// Summarization is network-bound; firing the requests together cuts
    /// wall-clock time roughly by this factor. Lower it if the provider
    /// rate-limits you.
    pub concurrency: usize,

    /// Model for per-chunk summaries. Default: "gpt-4o-mini".
    ///
    /// Chunk summaries are many and short — the cheap model is the right
    /// trade. The transcript composition is a single call and uses
    /// `transcript_model` instead.
    pub summary_model: String,

    /// Model for the single transcript-composition call. Default: "gpt-4o".
    pub transcript_model: String,

    /// LLM provider name (e.g. "openai", "anthropic").
    /// If None along with `generator`, the provider is auto-detected from
    /// the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed text generator. Takes precedence over
    /// `provider_name`; used by tests to inject fakes.
    pub generator: Option<Arc<dyn TextGenerator>>,

    /// Pre-constructed speech synthesizer. Takes precedence over the
    /// ElevenLabs key fields; used by tests to inject fakes.
    pub synthesizer: Option<Arc<dyn SpeechSynthesizer>>,

    /// Sampling temperature for both LLM stages. Default: 0.7.
    ///
    /// Summaries and narration want some fluency, not transcription-grade
    /// determinism.
    pub temperature: f32,

    /// Maximum tokens the LLM may generate per call. Default: 4096.
    pub max_tokens: usize,

    /// ElevenLabs voice identifier. Default: [`DEFAULT_VOICE_ID`].
    pub voice_id: String,

    /// ElevenLabs model. Default: "eleven_multilingual_v2".
    pub tts_model: String,

    /// ElevenLabs output format. Default: "mp3_44100_128".
    ///
    /// The pipeline only frames the final artifact as MP3
    /// (`Content-Type: audio/mpeg`); other formats are untested.
    pub tts_output_format: String,

    /// ElevenLabs API key. If None, the synthesizer falls back to the
    /// `ELEVENLABS_API_KEY` environment variable at request time; absence of
    /// both is a per-request error, not a startup check.
    pub elevenlabs_api_key: Option<String>,

    /// ElevenLabs API base URL. Overridable so tests can point at a local
    /// stub server. Default: "https://api.elevenlabs.io".
    pub elevenlabs_base_url: String,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-request timeout for LLM and synthesis calls in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Optional progress callback for stage and per-chunk events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PodcastConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1700,
            chunk_overlap: 20,
            complexity: Complexity::default(),
            concurrency: 8,
            summary_model: "gpt-4o-mini".to_string(),
            transcript_model: "gpt-4o".to_string(),
            provider_name: None,
            generator: None,
            synthesizer: None,
            temperature: 0.7,
            max_tokens: 4096,
            voice_id: DEFAULT_VOICE_ID.to_string(),
            tts_model: "eleven_multilingual_v2".to_string(),
            tts_output_format: "mp3_44100_128".to_string(),
            elevenlabs_api_key: None,
            elevenlabs_base_url: "https://api.elevenlabs.io".to_string(),
            download_timeout_secs: 120,
            api_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PodcastConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PodcastConfig")
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("complexity", &self.complexity)
            .field("concurrency", &self.concurrency)
            .field("summary_model", &self.summary_model)
            .field("transcript_model", &self.transcript_model)
            .field("provider_name", &self.provider_name)
            .field("generator", &self.generator.as_ref().map(|_| "<dyn TextGenerator>"))
            .field("synthesizer", &self.synthesizer.as_ref().map(|_| "<dyn SpeechSynthesizer>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("voice_id", &self.voice_id)
            .field("tts_model", &self.tts_model)
            .field("tts_output_format", &self.tts_output_format)
            .field("elevenlabs_api_key", &self.elevenlabs_api_key.as_ref().map(|_| "<redacted>"))
            .field("elevenlabs_base_url", &self.elevenlabs_base_url)
            .finish()
    }
}

impl PodcastConfig {
    /// Create a new builder for `PodcastConfig`.
    pub fn builder() -> PodcastConfigBuilder {
        PodcastConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PodcastConfig`].
#[derive(Debug)]
pub struct PodcastConfigBuilder {
    config: PodcastConfig,
}

impl PodcastConfigBuilder {
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    pub fn complexity(mut self, level: Complexity) -> Self {
        self.config.complexity = level;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn summary_model(mut self, model: impl Into<String>) -> Self {
        self.config.summary_model = model.into();
        self
    }

    pub fn transcript_model(mut self, model: impl Into<String>) -> Self {
        self.config.transcript_model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.config.synthesizer = Some(synthesizer);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn voice_id(mut self, voice: impl Into<String>) -> Self {
        self.config.voice_id = voice.into();
        self
    }

    pub fn tts_model(mut self, model: impl Into<String>) -> Self {
        self.config.tts_model = model.into();
        self
    }

    pub fn tts_output_format(mut self, format: impl Into<String>) -> Self {
        self.config.tts_output_format = format.into();
        self
    }

    pub fn elevenlabs_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.elevenlabs_api_key = Some(key.into());
        self
    }

    pub fn elevenlabs_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.elevenlabs_base_url = url.into();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PodcastConfig, PodcastError> {
        let c = &self.config;
        if c.chunk_size == 0 {
            return Err(PodcastError::InvalidConfig(
                "chunk_size must be ≥ 1".into(),
            ));
        }
        if c.chunk_overlap >= c.chunk_size {
            return Err(PodcastError::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                c.chunk_overlap, c.chunk_size
            )));
        }
        if c.concurrency == 0 {
            return Err(PodcastError::InvalidConfig(
                "concurrency must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Summarization depth, chosen once per conversion.
///
/// Controls how much background the per-chunk summaries spell out. The level
/// is applied uniformly to every chunk so the composed narration keeps a
/// consistent register from start to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Plain language, analogies first, jargon defined inline.
    Beginner,
    /// Technical vocabulary allowed, background only where essential. (default)
    #[default]
    Intermediate,
    /// Full technical depth, methods and quantitative results preserved.
    Advanced,
}

impl Complexity {
    /// All levels, in increasing depth.
    pub const ALL: [Complexity; 3] = [
        Complexity::Beginner,
        Complexity::Intermediate,
        Complexity::Advanced,
    ];
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Complexity::Beginner => "beginner",
            Complexity::Intermediate => "intermediate",
            Complexity::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

impl FromStr for Complexity {
    type Err = PodcastError;

    /// Case-insensitive parse; the HTTP layer receives levels like
    /// `"BEGINNER"` from clients.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Complexity::Beginner),
            "intermediate" => Ok(Complexity::Intermediate),
            "advanced" => Ok(Complexity::Advanced),
            other => Err(PodcastError::InvalidConfig(format!(
                "unknown complexity level '{other}' (expected beginner, intermediate, or advanced)"
            ))),
        }
    }
}
