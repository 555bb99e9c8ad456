use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::session::{Phase, Turn};
use crate::resume;
use crate::speech::AudioClip;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub phase: Phase,
    pub turns: Vec<Turn>,
    pub current_hint: Option<String>,
}

#[derive(Serialize)]
pub struct StartInterviewResponse {
    pub question: String,
    pub hint: Option<String>,
    pub audio: Option<AudioClip>,
    /// Whether the résumé chunks reached the vector store. The interview
    /// proceeds on the extracted text either way.
    pub indexed: bool,
    pub namespace: Option<String>,
}

#[derive(Serialize)]
pub struct AnswerResponse {
    pub transcript: String,
    pub question: String,
    pub hint: Option<String>,
    pub audio: Option<AudioClip>,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse { session_id }),
    )
}

/// GET /api/v1/sessions/:id
///
/// Side-effect-free state read; safe to call at any time.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    let session = session.lock().await;
    Ok(Json(SessionView {
        id: session.id,
        created_at: session.created_at,
        phase: session.phase,
        turns: session.turns.clone(),
        current_hint: session.current_hint.clone(),
    }))
}

/// POST /api/v1/sessions/:id/resume — multipart PDF upload.
///
/// Extract → chunk → index → first interviewer question. A vector-store
/// failure is logged and reported via `indexed`, never fatal: the résumé
/// text is already extracted locally.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<StartInterviewResponse>, AppError> {
    let (file_name, pdf_bytes) = read_upload(&mut multipart, &["file", "resume"], "resume.pdf").await?;

    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    let mut session = session.lock().await;

    // Idempotent re-upload: return the existing opening question without
    // touching the résumé context or the vector store.
    if session.has_resume() {
        let existing = session.resume_context.clone();
        let outcome = state.controller.start_interview(&mut session, existing).await?;
        return Ok(Json(StartInterviewResponse {
            question: outcome.question,
            hint: outcome.hint,
            audio: outcome.audio,
            indexed: false,
            namespace: None,
        }));
    }

    let text = resume::extract_text(&pdf_bytes)
        .map_err(|e| AppError::Validation(format!("{e:#}")))?;
    let chunks = resume::chunk_resume(&text);
    if chunks.is_empty() {
        return Err(AppError::Validation(
            "PDF contained no extractable text".to_string(),
        ));
    }

    let (indexed, namespace) = match state.vector_store.index_resume(&file_name, &chunks).await {
        Ok(ns) => (true, Some(ns)),
        Err(e) => {
            warn!(session = %id, "Resume indexing failed, proceeding unindexed: {e}");
            (false, None)
        }
    };

    // The interview context is the concatenation of the chunk texts.
    let resume_text = chunks.concat();
    let outcome = state
        .controller
        .start_interview(&mut session, resume_text)
        .await?;

    Ok(Json(StartInterviewResponse {
        question: outcome.question,
        hint: outcome.hint,
        audio: outcome.audio,
        indexed,
        namespace,
    }))
}

/// POST /api/v1/sessions/:id/answer — multipart audio upload.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<AnswerResponse>, AppError> {
    let (file_name, audio_bytes) = read_upload(&mut multipart, &["audio", "file"], "in.wav").await?;

    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    let mut session = session.lock().await;

    let outcome = state
        .controller
        .submit_answer(&mut session, audio_bytes, &file_name)
        .await?;

    Ok(Json(AnswerResponse {
        transcript: outcome.transcript.unwrap_or_default(),
        question: outcome.question,
        hint: outcome.hint,
        audio: outcome.audio,
    }))
}

/// POST /api/v1/sessions/:id/reset
///
/// Unconditional: clears the transcript, résumé context and hint from any
/// phase. No confirmation step.
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    session.lock().await.reset();
    Ok(StatusCode::NO_CONTENT)
}

/// Pulls the first matching file field out of a multipart body.
async fn read_upload(
    multipart: &mut Multipart,
    field_names: &[&str],
    default_filename: &str,
) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if field_names.contains(&name.as_str()) {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| default_filename.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            return Ok((file_name, data));
        }
    }
    Err(AppError::Validation(format!(
        "Missing multipart field '{}'",
        field_names[0]
    )))
}
