//! Speech synthesis.
//!
//! The pipeline talks to the [`SpeechSynthesizer`] trait; production wires in
//! [`ElevenLabsSynthesizer`], tests substitute fakes that return canned audio.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::PodcastConfig;
use crate::error::PodcastError;

const API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

/// Turns a transcript into encoded audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, transcript: &str, voice_id: &str) -> Result<Vec<u8>, PodcastError>;
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// Speech synthesis backed by the ElevenLabs text-to-speech API.
///
/// Audio arrives as a byte stream; the whole stream is drained into memory
/// before the result is returned, so partial responses never reach callers.
#[derive(Debug)]
pub struct ElevenLabsSynthesizer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model_id: String,
    output_format: String,
}

impl ElevenLabsSynthesizer {
    /// Build a synthesizer from pipeline configuration. The API key comes
    /// from the config when set, otherwise from `ELEVENLABS_API_KEY`.
    pub fn from_config(config: &PodcastConfig) -> Result<Self, PodcastError> {
        let api_key = match &config.elevenlabs_api_key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => env::var(API_KEY_ENV)
                .ok()
                .filter(|k| !k.is_empty())
                .ok_or(PodcastError::MissingApiKey {
                    provider: "ElevenLabs".to_string(),
                    env_var: API_KEY_ENV,
                })?,
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| PodcastError::SynthesisFailed {
                detail: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: config.elevenlabs_base_url.trim_end_matches('/').to_string(),
            model_id: config.tts_model.clone(),
            output_format: config.tts_output_format.clone(),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, transcript: &str, voice_id: &str) -> Result<Vec<u8>, PodcastError> {
        let url = format!(
            "{}/v1/text-to-speech/{}?output_format={}",
            self.base_url, voice_id, self.output_format
        );
        info!(
            voice = voice_id,
            model = %self.model_id,
            transcript_chars = transcript.chars().count(),
            "synthesizing speech"
        );

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&SynthesisRequest {
                text: transcript,
                model_id: &self.model_id,
            })
            .send()
            .await
            .map_err(|e| PodcastError::SynthesisFailed {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable response body>".to_string());
            return Err(PodcastError::SynthesisRejected {
                status: status.as_u16(),
                detail,
            });
        }

        let mut audio = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(part) = stream.next().await {
            let bytes = part.map_err(|e| PodcastError::SynthesisFailed {
                detail: format!("audio stream interrupted: {e}"),
            })?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(PodcastError::EmptyAudio);
        }
        debug!(audio_bytes = audio.len(), "speech synthesized");
        Ok(audio)
    }
}
