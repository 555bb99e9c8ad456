//! Groq Whisper client for speech-to-text.
//!
//! Transcribes the candidate's recorded answer. The controller substitutes a
//! sentinel transcript on failure, so errors returned here never abort a turn.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use crate::interview::controller::Transcriber;
use crate::speech::{mime_for_filename, SpeechError};

const TRANSCRIPTION_URL: &str = "https://api.groq.com/openai/v1/audio/transcriptions";
pub const MODEL: &str = "whisper-large-v3";
const LANGUAGE: &str = "en";

/// Groq speech-to-text client.
pub struct GroqTranscriber {
    client: Client,
    api_key: String,
}

impl GroqTranscriber {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(300))
                .build()?,
            api_key,
        })
    }

    /// Transcribes audio bytes to text.
    ///
    /// `filename` drives the MIME type of the multipart file part
    /// (wav, mp3, m4a, webm, ogg).
    pub async fn call(&self, audio: Bytes, filename: &str) -> Result<String, SpeechError> {
        debug!(
            model = MODEL,
            size = audio.len(),
            "transcription request"
        );

        let file_part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime_for_filename(filename))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", MODEL)
            .text("response_format", "text")
            .text("language", LANGUAGE);

        let response = self
            .client
            .post(TRANSCRIPTION_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
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

        // response_format=text returns the transcript as a plain-text body
        let transcript = response.text().await?;
        Ok(transcript.trim().to_string())
    }
}

#[async_trait]
impl Transcriber for GroqTranscriber {
    async fn transcribe(&self, audio: Bytes, filename: &str) -> Result<String, SpeechError> {
        self.call(audio, filename).await
    }
}
