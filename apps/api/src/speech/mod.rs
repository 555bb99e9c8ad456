//! Speech clients — Groq Whisper transcription and Groq text-to-speech.
//!
//! Both are collaborators of the dialogue controller: transcription failures
//! are converted to a sentinel transcript and synthesis failures are logged
//! and dropped, so neither can block a turn.

use serde::Serialize;
use thiserror::Error;

pub mod synthesize;
pub mod transcribe;

pub use synthesize::GroqSpeechClient;
pub use transcribe::GroqTranscriber;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A synthesized audio artifact, base64-encoded for transport in JSON.
#[derive(Debug, Clone, Serialize)]
pub struct AudioClip {
    pub media_type: String,
    pub data: String,
}

/// Maps an uploaded file name to a MIME type for the multipart form.
pub(crate) fn mime_for_filename(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("webm") => "audio/webm",
        Some("ogg") => "audio/ogg",
        _ => "audio/wav",
    }
}
