//! Transcript composition.
//!
//! A single completion request weaves the ordered chunk summaries into one
//! continuous spoken-word narration.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::PodcastError;
use crate::pipeline::llm::TextGenerator;
use crate::prompts::transcript_prompt;

/// Compose a podcast transcript from ordered chunk summaries.
pub async fn compose_transcript(
    generator: Arc<dyn TextGenerator>,
    summaries: &[String],
) -> Result<String, PodcastError> {
    if summaries.is_empty() {
        return Err(PodcastError::Internal(
            "cannot compose a transcript from zero summaries".to_string(),
        ));
    }

    info!(summaries = summaries.len(), "composing transcript");
    let prompt = transcript_prompt(summaries);
    let transcript = generator.generate(&prompt).await?;
    debug!(
        transcript_chars = transcript.chars().count(),
        "transcript composed"
    );
    Ok(transcript)
}
