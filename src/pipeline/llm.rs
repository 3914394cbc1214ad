//! Text-generation seam over the provider layer.
//!
//! The pipeline only ever needs "prompt in, text out", so it talks to this
//! narrow trait rather than to a provider directly. Production wires in
//! [`ChatGenerator`] backed by an `edgequake_llm` provider; tests substitute
//! deterministic fakes.

use std::sync::Arc;

use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use tracing::debug;

use crate::error::PodcastError;

/// Prompt-to-text generation. Implementations must be safe to share across
/// the concurrent summarization tasks.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, PodcastError>;
}

/// [`TextGenerator`] backed by a chat-completion provider.
pub struct ChatGenerator {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: usize,
}

impl ChatGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, temperature: f32, max_tokens: usize) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }
}

#[async_trait]
impl TextGenerator for ChatGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, PodcastError> {
        let messages = vec![ChatMessage::user(prompt)];
        let options = CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        };

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| PodcastError::LlmApiError {
                message: e.to_string(),
            })?;

        debug!(
            prompt_tokens = ?response.prompt_tokens,
            completion_tokens = ?response.completion_tokens,
            "chat completion finished"
        );

        let content = response.content.trim().to_string();
        if content.is_empty() {
            return Err(PodcastError::LlmApiError {
                message: "provider returned an empty completion".to_string(),
            });
        }
        Ok(content)
    }
}
