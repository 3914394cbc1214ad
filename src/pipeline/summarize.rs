//! Concurrent per-chunk summarization.
//!
//! Each chunk gets its own independent summarization request; requests run
//! concurrently up to the configured limit, results come back in chunk order,
//! and the first failure aborts the whole batch.

use std::sync::Arc;

use futures::{stream, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::config::PodcastConfig;
use crate::error::PodcastError;
use crate::pipeline::llm::TextGenerator;
use crate::prompts::chunk_summary_prompt;

/// Summarize `chunks` concurrently, preserving chunk order in the output.
///
/// Fails fast: the first chunk error cancels the in-flight siblings and is
/// returned as [`PodcastError::ChunkFailed`] carrying the 1-based chunk
/// number.
pub async fn summarize_chunks(
    generator: Arc<dyn TextGenerator>,
    chunks: &[String],
    config: &PodcastConfig,
) -> Result<Vec<String>, PodcastError> {
    let total = chunks.len();
    info!(
        chunks = total,
        concurrency = config.concurrency,
        model = %config.summary_model,
        "summarizing chunks"
    );

    let callback = config.progress_callback.clone();
    // Collected eagerly: the futures are still lazy, but materializing the
    // iterator keeps the borrow of `chunks` out of the stream's type, which
    // otherwise trips a higher-ranked lifetime limitation in the compiler
    // when this future is used as an axum handler.
    let tasks: Vec<_> = chunks.iter().enumerate().map(|(index, chunk)| {
        let generator = Arc::clone(&generator);
        let prompt = chunk_summary_prompt(config.complexity, chunk);
        let callback = callback.clone();
        async move {
            if let Some(cb) = &callback {
                cb.on_summary_start(index + 1, total);
            }
            let summary = generator.generate(&prompt).await.map_err(|e| {
                PodcastError::ChunkFailed {
                    chunk: index + 1,
                    total,
                    detail: e.to_string(),
                }
            })?;
            debug!(
                chunk = index + 1,
                total,
                summary_chars = summary.chars().count(),
                "chunk summarized"
            );
            if let Some(cb) = &callback {
                cb.on_summary_complete(index + 1, total, summary.len());
            }
            Ok::<String, PodcastError>(summary)
        }
    }).collect();

    // buffered() keeps output in input order; try_collect drops the stream on
    // the first error, cancelling the other in-flight requests.
    stream::iter(tasks)
        .buffered(config.concurrency)
        .try_collect()
        .await
}
