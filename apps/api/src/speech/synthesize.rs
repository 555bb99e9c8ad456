//! Groq text-to-speech client.
//!
//! Turns each interviewer question into a playable audio clip. Strictly
//! best-effort: the controller logs failures and the turn proceeds without
//! audio.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::interview::controller::SpeechSynthesizer;
use crate::speech::{AudioClip, SpeechError};

const SPEECH_URL: &str = "https://api.groq.com/openai/v1/audio/speech";
pub const MODEL: &str = "playai-tts";
const VOICE: &str = "Arista-PlayAI";
const FORMAT: &str = "wav";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// Groq speech-synthesis client.
pub struct GroqSpeechClient {
    client: Client,
    api_key: String,
}

impl GroqSpeechClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()?,
            api_key,
        })
    }

    /// Synthesizes `text` into a wav clip. Returns `None` for input too
    /// short to speak (single character or empty).
    pub async fn call(&self, text: &str) -> Result<Option<AudioClip>, SpeechError> {
        if text.chars().count() <= 1 {
            return Ok(None);
        }

        let request_body = SpeechRequest {
            model: MODEL,
            input: text,
            voice: VOICE,
            response_format: FORMAT,
        };

        let response = self
            .client
            .post(SPEECH_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let audio = response.bytes().await?;
        debug!(size = audio.len(), "speech synthesis succeeded");

        Ok(Some(AudioClip {
            media_type: "audio/wav".to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(&audio),
        }))
    }
}

#[async_trait]
impl SpeechSynthesizer for GroqSpeechClient {
    async fn synthesize(&self, text: &str) -> Result<Option<AudioClip>, SpeechError> {
        self.call(text).await
    }
}
