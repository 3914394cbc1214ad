//! PDF text extraction via the pdf-extract crate.
//!
//! ## Why spawn_blocking?
//!
//! pdf-extract is a synchronous, CPU-bound parser. `tokio::task::spawn_blocking`
//! moves the work onto the blocking thread pool so the async workers keep
//! serving other tasks while a large document is parsed.
//!
//! ## Empty documents
//!
//! A PDF with no text layer (a pure scan) parses fine but yields an empty or
//! whitespace-only string. That case is rejected here with
//! [`PodcastError::EmptyDocument`] instead of being passed on as an empty
//! chunk list the later stages would each have to guard against.

use crate::error::PodcastError;
use std::path::Path;
use tracing::{debug, info};

/// Extract the concatenated text of all pages of the PDF at `path`.
///
/// Returns the raw extracted text; whitespace normalisation is left to the
/// chunker and the summarization model.
pub async fn extract_text(path: &Path) -> Result<String, PodcastError> {
    let owned = path.to_path_buf();

    let text = tokio::task::spawn_blocking(move || extract_text_blocking(&owned))
        .await
        .map_err(|e| PodcastError::Internal(format!("Extraction task panicked: {}", e)))??;

    info!("Extracted {} chars of text", text.len());
    debug!("Extracted text preview: {:?}", text.chars().take(100).collect::<String>());

    Ok(text)
}

fn extract_text_blocking(path: &Path) -> Result<String, PodcastError> {
    let text = pdf_extract::extract_text(path).map_err(|e| PodcastError::ExtractionFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    if text.trim().is_empty() {
        return Err(PodcastError::EmptyDocument {
            path: path.to_path_buf(),
        });
    }

    Ok(text)
}
