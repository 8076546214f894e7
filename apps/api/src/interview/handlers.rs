//! Axum route handlers for the interview flow.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::{
    analyze_match, parse_answer_feedback, AnswerFeedback, MatchAnalysis, NumberedBlock,
    DEFAULT_SECTION_HEADERS,
};
use crate::interview::flow::{
    load_session, question_text, questions_from_upstream, read_form, require_pdf,
    require_session_id, resolve_job_title,
};
use crate::session::SessionContext;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub session_id: String,
    pub file_name: String,
}

#[derive(Debug, Deserialize)]
pub struct JdUploadRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct JdUploadResponse {
    pub session_id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct MatchScoreResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub analysis: MatchAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub job_title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub session_id: String,
    pub job_title: Option<String>,
    pub questions: Vec<NumberedBlock>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub session_id: String,
    pub question_id: String,
    pub question: Option<String>,
    pub feedback: AnswerFeedback,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume
///
/// Multipart upload with a PDF in `file`. Opens a new session.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let mut form = read_form(multipart, "file").await?;
    let file = form.require_file()?;
    require_pdf(&file.file_name)?;

    let file_name = file.file_name.clone();
    let session_id = state.backend.upload_resume(file).await?;

    state.sessions.put(&SessionContext::new(&session_id)).await?;
    info!("Resume '{file_name}' uploaded, session {session_id} opened");

    Ok(Json(ResumeUploadResponse {
        session_id,
        file_name,
    }))
}

/// POST /api/v1/jd
pub async fn handle_upload_jd(
    State(state): State<AppState>,
    Json(request): Json<JdUploadRequest>,
) -> Result<Json<JdUploadResponse>, AppError> {
    let session_id = require_session_id(&request.session_id)?;
    let jd_text = request.jd_text.trim();
    if jd_text.is_empty() {
        return Err(AppError::Validation(
            "jd_text cannot be empty".to_string(),
        ));
    }
    let mut context = load_session(state.sessions.as_ref(), session_id).await?;

    state.backend.upload_jd(session_id, jd_text).await?;

    context.jd_uploaded = true;
    context.touch();
    state.sessions.put(&context).await?;
    info!("Job description uploaded for session {session_id}");

    Ok(Json(JdUploadResponse {
        session_id: session_id.to_string(),
        status: "uploaded".to_string(),
    }))
}

/// POST /api/v1/match-score
///
/// Fetches the backend's analysis text and returns it parsed into score,
/// sections and breakdown.
pub async fn handle_match_score(
    State(state): State<AppState>,
    Json(request): Json<SessionRequest>,
) -> Result<Json<MatchScoreResponse>, AppError> {
    let session_id = require_session_id(&request.session_id)?;
    let context = load_session(state.sessions.as_ref(), session_id).await?;
    if !context.jd_uploaded {
        return Err(AppError::Validation(
            "Upload a job description before requesting a match score".to_string(),
        ));
    }

    let raw = state.backend.match_score(session_id).await?;
    let analysis = analyze_match(&raw, DEFAULT_SECTION_HEADERS);
    if analysis.match_score == 0 {
        warn!("No match score line found for session {session_id}");
    }

    Ok(Json(MatchScoreResponse {
        session_id: session_id.to_string(),
        analysis,
    }))
}

/// POST /api/v1/questions
///
/// Generates questions and remembers them on the session.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuestionsRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let session_id = require_session_id(&request.session_id)?;
    let mut context = load_session(state.sessions.as_ref(), session_id).await?;
    let job_title = resolve_job_title(&context, request.job_title.as_deref())?;

    let generated = state
        .backend
        .generate_questions(session_id, job_title.as_deref())
        .await?;
    let questions = questions_from_upstream(generated);
    if questions.is_empty() {
        warn!("Question generation for session {session_id} yielded no numbered questions");
        return Err(AppError::UnprocessableEntity(
            "No interview questions could be extracted, please try again".to_string(),
        ));
    }

    context.job_title = job_title.clone();
    context.questions = questions.clone();
    context.touch();
    state.sessions.put(&context).await?;
    info!(
        "Generated {} questions for session {session_id}",
        questions.len()
    );

    Ok(Json(QuestionsResponse {
        session_id: session_id.to_string(),
        job_title,
        questions,
    }))
}

/// GET /api/v1/questions/:session_id
///
/// Returns the question list stored by the last generation.
pub async fn handle_get_questions(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let session_id = require_session_id(&session_id)?;
    let context = load_session(state.sessions.as_ref(), session_id).await?;

    Ok(Json(QuestionsResponse {
        session_id: context.session_id,
        job_title: context.job_title,
        questions: context.questions,
    }))
}

/// POST /api/v1/answers
///
/// Multipart with `session_id`, `question_id` and the recorded answer in `file`.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnswerResponse>, AppError> {
    let mut form = read_form(multipart, "file").await?;
    let session_id = require_session_id(form.field("session_id"))?.to_string();
    let question_id = form.field("question_id").trim().to_string();
    if question_id.is_empty() {
        return Err(AppError::Validation("question_id is required".to_string()));
    }
    let recording = form.require_file()?;
    let context = load_session(state.sessions.as_ref(), &session_id).await?;

    let feedback = state
        .backend
        .submit_answer(&session_id, &question_id, recording)
        .await?;
    let feedback = parse_answer_feedback(&feedback);
    info!("Feedback received for session {session_id}, question {question_id}");

    Ok(Json(AnswerResponse {
        question: question_text(&context, &question_id).map(str::to_string),
        session_id,
        question_id,
        feedback,
    }))
}

/// DELETE /api/v1/session/:session_id
pub async fn handle_clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let session_id = require_session_id(&session_id)?;
    state.sessions.clear(session_id).await?;
    info!("Session {session_id} cleared");
    Ok(StatusCode::NO_CONTENT)
}
