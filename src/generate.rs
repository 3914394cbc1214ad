//! Podcast generation entry points.
//!
//! This module provides the primary API: wait for the full pipeline, then
//! return. The pipeline is strictly sequential across stages — extract,
//! chunk, summarize, compose, synthesize — with concurrency only inside the
//! summarization stage. Each stage is timed individually so the stats can
//! tell an expensive extraction apart from a slow provider.

use crate::config::PodcastConfig;
use crate::error::PodcastError;
use crate::output::{PodcastOutput, PodcastStats};
use crate::pipeline::llm::{ChatGenerator, TextGenerator};
use crate::pipeline::speech::{ElevenLabsSynthesizer, SpeechSynthesizer};
use crate::pipeline::{chunk, compose, extract, input, polish, summarize};
use crate::progress::PipelineStage;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF file or URL into a narrated podcast.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config` — Generation configuration
///
/// # Errors
/// Every stage failure is fatal for the conversion: a file that is not a
/// PDF, a document with no extractable text, a single failed chunk summary,
/// or a rejected synthesis request all abort with the corresponding
/// [`PodcastError`].
pub async fn generate(
    input_str: impl AsRef<str>,
    config: &PodcastConfig,
) -> Result<PodcastOutput, PodcastError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting podcast generation: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();

    // ── Step 2: Extract text ─────────────────────────────────────────────
    stage_start(config, PipelineStage::Extracting);
    let extract_start = Instant::now();
    let text = extract::extract_text(&pdf_path).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    stage_complete(config, PipelineStage::Extracting);
    info!(
        "Extracted {} characters in {}ms",
        text.chars().count(),
        extract_duration_ms
    );

    let mut output = generate_from_extracted(&text, config).await?;
    output.stats.extract_duration_ms = extract_duration_ms;
    output.stats.extracted_chars = text.chars().count();
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_pipeline_complete(output.stats.chunk_count, output.stats.audio_bytes);
    }
    info!(
        "Podcast complete: {} chunks, {} audio bytes, {}ms total",
        output.stats.chunk_count, output.stats.audio_bytes, output.stats.total_duration_ms
    );
    Ok(output)
}

/// Generate a podcast from already-extracted text, skipping the PDF stages.
///
/// Useful when the text comes from a different extractor, or in tests.
pub async fn generate_from_text(
    text: &str,
    config: &PodcastConfig,
) -> Result<PodcastOutput, PodcastError> {
    let total_start = Instant::now();
    if text.trim().is_empty() {
        return Err(PodcastError::InvalidInput {
            input: "<empty text>".to_string(),
        });
    }
    let mut output = generate_from_extracted(text, config).await?;
    output.stats.extracted_chars = text.chars().count();
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    if let Some(ref cb) = config.progress_callback {
        cb.on_pipeline_complete(output.stats.chunk_count, output.stats.audio_bytes);
    }
    Ok(output)
}

/// Generate a podcast from PDF bytes in memory.
///
/// Internally writes `bytes` to a managed [`tempfile`] which is cleaned up
/// automatically on return or panic. This is the recommended API when the
/// PDF comes from an upload or a database rather than a file on disk.
pub async fn generate_from_bytes(
    bytes: &[u8],
    config: &PodcastConfig,
) -> Result<PodcastOutput, PodcastError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| PodcastError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| PodcastError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) when `generate` returns
    generate(&path, config).await
}

/// Generate a podcast and write the audio directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn generate_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &PodcastConfig,
) -> Result<PodcastStats, PodcastError> {
    let output = generate(input_str, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PodcastError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("mp3.tmp");
    tokio::fs::write(&tmp_path, &output.audio)
        .await
        .map_err(|e| PodcastError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| PodcastError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    input_str: impl AsRef<str>,
    config: &PodcastConfig,
) -> Result<PodcastOutput, PodcastError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PodcastError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate(input_str, config))
}

/// Extract the text of a PDF without summarizing or synthesizing.
///
/// Does not require any API key.
pub async fn extract_only(input_str: impl AsRef<str>) -> Result<String, PodcastError> {
    let resolved = input::resolve_input(input_str.as_ref(), 120).await?;
    let pdf_path = resolved.path().to_path_buf();
    extract::extract_text(&pdf_path).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Run the text-to-audio stages: chunk, summarize, compose, synthesize.
///
/// Extraction stats are filled in by the callers that performed extraction.
async fn generate_from_extracted(
    text: &str,
    config: &PodcastConfig,
) -> Result<PodcastOutput, PodcastError> {
    // ── Chunk ────────────────────────────────────────────────────────────
    stage_start(config, PipelineStage::Chunking);
    let splitter = chunk::TextSplitter::new(config.chunk_size, config.chunk_overlap);
    let chunks = splitter.split(text);
    stage_complete(config, PipelineStage::Chunking);
    info!("Split text into {} chunks", chunks.len());
    debug!(
        first_chunk_preview = %chunks.first().map(|c| preview(c)).unwrap_or_default(),
        "chunking done"
    );

    // ── Summarize ────────────────────────────────────────────────────────
    let summary_generator = resolve_generator(config, &config.summary_model)?;
    stage_start(config, PipelineStage::Summarizing);
    let summarize_start = Instant::now();
    let summaries = summarize::summarize_chunks(summary_generator, &chunks, config).await?;
    let summarize_duration_ms = summarize_start.elapsed().as_millis() as u64;
    stage_complete(config, PipelineStage::Summarizing);
    info!(
        "Summarized {} chunks in {}ms",
        summaries.len(),
        summarize_duration_ms
    );

    // ── Compose ──────────────────────────────────────────────────────────
    let transcript_generator = resolve_generator(config, &config.transcript_model)?;
    stage_start(config, PipelineStage::Composing);
    let compose_start = Instant::now();
    let raw_transcript = compose::compose_transcript(transcript_generator, &summaries).await?;
    let transcript = polish::clean_transcript(&raw_transcript);
    let compose_duration_ms = compose_start.elapsed().as_millis() as u64;
    stage_complete(config, PipelineStage::Composing);
    info!(
        "Composed transcript ({} chars) in {}ms",
        transcript.chars().count(),
        compose_duration_ms
    );
    debug!(transcript_preview = %preview(&transcript), "transcript ready");

    // ── Synthesize ───────────────────────────────────────────────────────
    let synthesizer = resolve_synthesizer(config)?;
    stage_start(config, PipelineStage::Synthesizing);
    let synthesize_start = Instant::now();
    let audio = synthesizer
        .synthesize(&transcript, &config.voice_id)
        .await?;
    let synthesize_duration_ms = synthesize_start.elapsed().as_millis() as u64;
    stage_complete(config, PipelineStage::Synthesizing);
    info!(
        "Synthesized {} audio bytes in {}ms",
        audio.len(),
        synthesize_duration_ms
    );

    let stats = PodcastStats {
        chunk_count: chunks.len(),
        extracted_chars: 0,
        transcript_chars: transcript.chars().count(),
        audio_bytes: audio.len(),
        extract_duration_ms: 0,
        summarize_duration_ms,
        compose_duration_ms,
        synthesize_duration_ms,
        total_duration_ms: 0,
    };

    Ok(PodcastOutput {
        transcript,
        summaries,
        audio,
        stats,
    })
}

/// Resolve the text generator for one LLM stage, from most-specific to
/// least-specific:
///
/// 1. **Pre-built generator** (`config.generator`) — used as-is; tests and
///    callers with custom middleware inject here. The same generator then
///    serves both stages regardless of the model fields.
///
/// 2. **Named provider + model** (`config.provider_name`) —
///    [`ProviderFactory::create_llm_provider`] reads the matching API key
///    (`OPENAI_API_KEY`, etc.) from the environment.
///
/// 3. **OpenAI key present** — a bare `OPENAI_API_KEY` selects OpenAI with
///    the stage's configured model.
///
/// 4. **Full auto-detection** ([`ProviderFactory::from_env`]) — the factory
///    scans all known API key variables and picks the first available
///    provider.
pub(crate) fn resolve_generator(
    config: &PodcastConfig,
    model: &str,
) -> Result<Arc<dyn TextGenerator>, PodcastError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }

    let provider: Arc<dyn LLMProvider> = if let Some(ref name) = config.provider_name {
        create_provider(name, model)?
    } else if std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty()) {
        create_provider("openai", model)?
    } else {
        let (llm_provider, _embedding) =
            ProviderFactory::from_env().map_err(|e| PodcastError::ProviderNotConfigured {
                provider: "auto".to_string(),
                hint: format!(
                    "No LLM provider could be auto-detected from environment.\n\
                    Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                    Error: {e}"
                ),
            })?;
        llm_provider
    };

    Ok(Arc::new(ChatGenerator::new(
        provider,
        config.temperature,
        config.max_tokens,
    )))
}

/// Instantiate a named provider with the given model.
fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, PodcastError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        PodcastError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the speech synthesizer: a pre-built one from the config, else a
/// fresh ElevenLabs client. Credentials are checked here, when synthesis is
/// actually needed, never at startup.
fn resolve_synthesizer(config: &PodcastConfig) -> Result<Arc<dyn SpeechSynthesizer>, PodcastError> {
    if let Some(ref synthesizer) = config.synthesizer {
        return Ok(Arc::clone(synthesizer));
    }
    Ok(Arc::new(ElevenLabsSynthesizer::from_config(config)?))
}

fn stage_start(config: &PodcastConfig, stage: PipelineStage) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(stage);
    }
}

fn stage_complete(config: &PodcastConfig, stage: PipelineStage) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_complete(stage);
    }
}

/// First 80 characters of a string, for debug logging.
fn preview(s: &str) -> String {
    s.chars().take(80).collect()
}
