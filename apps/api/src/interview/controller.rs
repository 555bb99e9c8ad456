//! Interview Dialogue Controller.
//!
//! Owns the turn bookkeeping around the three hosted collaborators: chat
//! completions, transcription and speech synthesis. The controller's contract
//! is "always complete the turn": a model failure becomes a visible error
//! reply, a transcription failure becomes a sentinel transcript, and a
//! synthesis failure only costs the audio. The transcript advances by exactly
//! one interviewer turn per operation no matter what the network does.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::parse::parse_reply;
use crate::interview::prompts::build_system_prompt;
use crate::interview::session::{Phase, Session, Turn};
use crate::llm_client::LlmError;
use crate::speech::{AudioClip, SpeechError};

/// Shown in the transcript while transcription is in flight.
pub const VOICE_PLACEHOLDER: &str = "🎤 (Voice Input)";
/// Substituted for the transcript when speech-to-text fails, so the dialogue
/// is never blocked on a transcription error.
pub const TRANSCRIPTION_SENTINEL: &str = "Error in transcription.";

/// Hosted chat-completions endpoint. Stateless: the system instruction goes
/// first, then the transcript oldest-to-newest.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, turns: &[Turn]) -> Result<String, LlmError>;
}

/// Hosted speech-to-text endpoint.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Bytes, filename: &str) -> Result<String, SpeechError>;
}

/// Hosted text-to-speech endpoint. `Ok(None)` means the input was too short
/// to speak; failures are surfaced but never abort a turn.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Option<AudioClip>, SpeechError>;
}

/// Result of one controller operation: the new interviewer question, the
/// optional side-channel hint, the optional synthesized audio, and (for
/// answers) the candidate transcript.
#[derive(Debug)]
pub struct TurnOutcome {
    pub question: String,
    pub hint: Option<String>,
    pub audio: Option<AudioClip>,
    pub transcript: Option<String>,
}

pub struct InterviewController {
    chat: Arc<dyn ChatModel>,
    transcriber: Arc<dyn Transcriber>,
    speech: Arc<dyn SpeechSynthesizer>,
}

impl InterviewController {
    pub fn new(
        chat: Arc<dyn ChatModel>,
        transcriber: Arc<dyn Transcriber>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            chat,
            transcriber,
            speech,
        }
    }

    /// Opens the interview: stores the résumé context and produces the first
    /// interviewer question.
    ///
    /// Idempotent: if the session already has a résumé, the existing opening
    /// question is returned and no model call is made. Re-upload requires an
    /// explicit reset.
    pub async fn start_interview(
        &self,
        session: &mut Session,
        resume_text: String,
    ) -> Result<TurnOutcome, AppError> {
        if resume_text.trim().is_empty() {
            return Err(AppError::Validation(
                "Resume text is empty — nothing to interview about".to_string(),
            ));
        }

        if session.has_resume() {
            let question = session
                .turns
                .iter()
                .find(|t| t.role == crate::interview::session::Role::Interviewer)
                .map(|t| t.content.clone())
                .unwrap_or_default();
            return Ok(TurnOutcome {
                question,
                hint: session.current_hint.clone(),
                audio: None,
                transcript: None,
            });
        }

        session.resume_context = resume_text;
        session.phase = Phase::Processing;

        let system = build_system_prompt(&session.resume_context);
        let raw = self.complete_or_error_reply(&system, &[]).await;
        let parsed = parse_reply(&raw);

        session.turns.push(Turn::interviewer(&parsed.question));
        session.current_hint = parsed.hint.clone();
        session.phase = Phase::AwaitingAnswer;
        info!(session = %session.id, "Interview started");

        let audio = self.synthesize_best_effort(&parsed.question).await;
        Ok(TurnOutcome {
            question: parsed.question,
            hint: parsed.hint,
            audio,
            transcript: None,
        })
    }

    /// Processes one spoken answer: transcribe, ask the model for the next
    /// question, speak it.
    ///
    /// Appends exactly one candidate turn and one interviewer turn per call,
    /// regardless of transcription or model failure.
    pub async fn submit_answer(
        &self,
        session: &mut Session,
        audio: Bytes,
        filename: &str,
    ) -> Result<TurnOutcome, AppError> {
        if session.phase != Phase::AwaitingAnswer {
            return Err(AppError::Conflict(format!(
                "Session is not awaiting an answer (phase: {:?})",
                session.phase
            )));
        }
        session.phase = Phase::Processing;

        // Placeholder first, so the transcript shows the in-flight answer.
        session.turns.push(Turn::candidate(VOICE_PLACEHOLDER));

        let transcript = match self.transcriber.transcribe(audio, filename).await {
            Ok(text) => text,
            Err(e) => {
                warn!(session = %session.id, "Transcription failed: {e}");
                TRANSCRIPTION_SENTINEL.to_string()
            }
        };
        if let Some(last) = session.turns.last_mut() {
            last.content = transcript.clone();
        }

        let system = build_system_prompt(&session.resume_context);
        let raw = self.complete_or_error_reply(&system, &session.turns).await;
        let parsed = parse_reply(&raw);

        session.turns.push(Turn::interviewer(&parsed.question));
        session.current_hint = parsed.hint.clone();
        session.phase = Phase::AwaitingAnswer;

        let audio = self.synthesize_best_effort(&parsed.question).await;
        Ok(TurnOutcome {
            question: parsed.question,
            hint: parsed.hint,
            audio,
            transcript: Some(transcript),
        })
    }

    /// One model call, no retry. A failure is folded into the reply stream
    /// as `"||| Error: …"` so the transcript still advances.
    async fn complete_or_error_reply(&self, system: &str, turns: &[Turn]) -> String {
        match self.chat.complete(system, turns).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Model call failed: {e}");
                format!("||| Error: {e}")
            }
        }
    }

    async fn synthesize_best_effort(&self, text: &str) -> Option<AudioClip> {
        match self.speech.synthesize(text).await {
            Ok(clip) => clip,
            Err(e) => {
                warn!("Speech synthesis failed: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::session::Role;

    struct FixedChat(Option<&'static str>);

    #[async_trait]
    impl ChatModel for FixedChat {
        async fn complete(&self, _system: &str, _turns: &[Turn]) -> Result<String, LlmError> {
            match self.0 {
                Some(reply) => Ok(reply.to_string()),
                None => Err(LlmError::EmptyContent),
            }
        }
    }

    struct FixedTranscriber(Option<&'static str>);

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _audio: Bytes, _filename: &str) -> Result<String, SpeechError> {
            match self.0 {
                Some(text) => Ok(text.to_string()),
                None => Err(SpeechError::Api {
                    status: 500,
                    message: "boom".to_string(),
                }),
            }
        }
    }

    struct SilentSpeech;

    #[async_trait]
    impl SpeechSynthesizer for SilentSpeech {
        async fn synthesize(&self, _text: &str) -> Result<Option<AudioClip>, SpeechError> {
            Err(SpeechError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    fn controller(chat: FixedChat, transcriber: FixedTranscriber) -> InterviewController {
        InterviewController::new(Arc::new(chat), Arc::new(transcriber), Arc::new(SilentSpeech))
    }

    #[tokio::test]
    async fn test_start_interview_appends_one_interviewer_turn() {
        let c = controller(
            FixedChat(Some("||| Tell me about your Kafka project.")),
            FixedTranscriber(Some("unused")),
        );
        let mut session = Session::new();

        let outcome = c
            .start_interview(&mut session, "resume".to_string())
            .await
            .unwrap();

        assert_eq!(outcome.question, "Tell me about your Kafka project.");
        assert_eq!(outcome.hint, None);
        assert_eq!(session.turns.len(), 1);
        assert_eq!(session.turns[0].role, Role::Interviewer);
        assert_eq!(session.phase, Phase::AwaitingAnswer);
    }

    #[tokio::test]
    async fn test_start_interview_rejects_empty_resume() {
        let c = controller(FixedChat(Some("||| Q")), FixedTranscriber(Some("t")));
        let mut session = Session::new();
        let result = c.start_interview(&mut session, "  ".to_string()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(session.turns.is_empty());
    }

    #[tokio::test]
    async fn test_start_interview_is_idempotent() {
        let c = controller(FixedChat(Some("||| First question?")), FixedTranscriber(None));
        let mut session = Session::new();
        c.start_interview(&mut session, "resume".to_string())
            .await
            .unwrap();

        let again = c
            .start_interview(&mut session, "another resume".to_string())
            .await
            .unwrap();

        assert_eq!(again.question, "First question?");
        assert_eq!(session.turns.len(), 1);
        assert_eq!(session.resume_context, "resume");
    }

    #[tokio::test]
    async fn test_start_interview_survives_model_failure() {
        let c = controller(FixedChat(None), FixedTranscriber(Some("t")));
        let mut session = Session::new();

        let outcome = c
            .start_interview(&mut session, "resume".to_string())
            .await
            .unwrap();

        assert!(outcome.question.starts_with("Error:"));
        assert_eq!(session.turns.len(), 1);
        assert_eq!(session.phase, Phase::AwaitingAnswer);
    }

    #[tokio::test]
    async fn test_submit_answer_appends_exactly_two_turns() {
        let c = controller(
            FixedChat(Some("TIP: Say 'I went'. ||| Explain TCP vs UDP.")),
            FixedTranscriber(Some("I goed to a hackathon.")),
        );
        let mut session = Session::new();
        c.start_interview(&mut session, "resume".to_string())
            .await
            .unwrap();

        let outcome = c
            .submit_answer(&mut session, Bytes::from_static(b"wav"), "in.wav")
            .await
            .unwrap();

        assert_eq!(session.turns.len(), 3);
        assert_eq!(session.turns[1].role, Role::Candidate);
        assert_eq!(session.turns[1].content, "I goed to a hackathon.");
        assert_eq!(session.turns[2].role, Role::Interviewer);
        assert_eq!(outcome.hint.as_deref(), Some("TIP: Say 'I went'."));
        assert_eq!(outcome.question, "Explain TCP vs UDP.");
        assert_eq!(session.current_hint.as_deref(), Some("TIP: Say 'I went'."));
    }

    #[tokio::test]
    async fn test_submit_answer_uses_sentinel_on_transcription_failure() {
        let c = controller(FixedChat(Some("||| Next question?")), FixedTranscriber(None));
        let mut session = Session::new();
        c.start_interview(&mut session, "resume".to_string())
            .await
            .unwrap();

        let outcome = c
            .submit_answer(&mut session, Bytes::from_static(b"wav"), "in.wav")
            .await
            .unwrap();

        assert_eq!(outcome.transcript.as_deref(), Some(TRANSCRIPTION_SENTINEL));
        assert_eq!(session.turns[1].content, TRANSCRIPTION_SENTINEL);
        assert_eq!(session.turns.len(), 3);
    }

    #[tokio::test]
    async fn test_submit_answer_advances_even_when_everything_fails() {
        let c = controller(FixedChat(None), FixedTranscriber(None));
        let mut session = Session::new();
        // Model is down for the opener too.
        c.start_interview(&mut session, "resume".to_string())
            .await
            .unwrap();
        let before = session.turns.len();

        let outcome = c
            .submit_answer(&mut session, Bytes::from_static(b"wav"), "in.wav")
            .await
            .unwrap();

        assert_eq!(session.turns.len(), before + 2);
        assert!(outcome.question.starts_with("Error:"));
        assert!(outcome.audio.is_none());
        assert_eq!(session.phase, Phase::AwaitingAnswer);
    }

    #[tokio::test]
    async fn test_submit_answer_requires_awaiting_answer_phase() {
        let c = controller(FixedChat(Some("||| Q")), FixedTranscriber(Some("t")));
        let mut session = Session::new();

        let result = c
            .submit_answer(&mut session, Bytes::from_static(b"wav"), "in.wav")
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(session.turns.is_empty());
    }
}
