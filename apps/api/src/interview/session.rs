//! Session model — the only stateful entity in the system.
//!
//! One `Session` per interview. Nothing is persisted: a session lives in
//! process memory and dies with it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Who authored a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The person being interviewed (maps to the model's "user" role).
    Candidate,
    /// The AI recruiter (maps to the model's "assistant" role).
    Interviewer,
}

/// One message in the interview transcript. Immutable once appended, with a
/// single exception: the in-flight candidate placeholder is overwritten in
/// place once transcription resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn candidate(content: impl Into<String>) -> Self {
        Turn {
            role: Role::Candidate,
            content: content.into(),
        }
    }

    pub fn interviewer(content: impl Into<String>) -> Self {
        Turn {
            role: Role::Interviewer,
            content: content.into(),
        }
    }
}

/// Dialogue state machine: `AwaitingResume → AwaitingAnswer ⇄ Processing`.
/// A reset returns to `AwaitingResume` from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingResume,
    AwaitingAnswer,
    Processing,
}

#[derive(Debug, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Concatenated extracted text of the uploaded résumé.
    /// Empty until upload completes; set at most once per session.
    pub resume_context: String,
    /// Append-only transcript, oldest first.
    pub turns: Vec<Turn>,
    /// Most recent side-channel correction/tip from the interviewer.
    pub current_hint: Option<String>,
    pub phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Session {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            resume_context: String::new(),
            turns: Vec::new(),
            current_hint: None,
            phase: Phase::AwaitingResume,
        }
    }

    /// Unconditional reset: discards the transcript, the résumé context and
    /// the hint. The session id survives so clients keep a stable handle.
    pub fn reset(&mut self) {
        self.resume_context.clear();
        self.turns.clear();
        self.current_hint = None;
        self.phase = Phase::AwaitingResume;
    }

    pub fn has_resume(&self) -> bool {
        !self.resume_context.is_empty()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory session registry shared across handlers.
///
/// Each session sits behind its own `Mutex`, so `start_interview` and
/// `submit_answer` are atomic with respect to one session while state reads
/// of other sessions proceed concurrently.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let session = Session::new();
        let id = session.id;
        self.inner
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.inner.read().await.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_awaits_resume() {
        let s = Session::new();
        assert_eq!(s.phase, Phase::AwaitingResume);
        assert!(s.turns.is_empty());
        assert!(!s.has_resume());
    }

    #[test]
    fn test_reset_clears_everything_but_identity() {
        let mut s = Session::new();
        let id = s.id;
        s.resume_context = "resume text".to_string();
        s.turns.push(Turn::interviewer("Question?"));
        s.current_hint = Some("TIP".to_string());
        s.phase = Phase::Processing;

        s.reset();

        assert_eq!(s.id, id);
        assert_eq!(s.phase, Phase::AwaitingResume);
        assert!(s.turns.is_empty());
        assert!(s.current_hint.is_none());
        assert!(!s.has_resume());
    }

    #[tokio::test]
    async fn test_store_create_and_get() {
        let store = SessionStore::new();
        let id = store.create().await;
        assert!(store.get(id).await.is_some());
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }
}
