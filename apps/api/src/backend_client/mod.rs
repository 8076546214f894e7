/// Backend client — the single point of entry for all calls to the coaching backend.
///
/// No other module talks to the backend directly. Failures are returned as-is:
/// the flow stops at the failing step and the user retries by hand.
use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod payloads;

use payloads::{
    AnswerResponse, BackendErrorBody, JdUploadRequest, LoginRequest, LoginResponse,
    MatchScoreResponse, QuestionsResponse, RegisterRequest, RegisterResponse, SessionAck,
    SessionRequest, UpstreamText, UserProfile,
};

const LOGIN_ENDPOINT: &str = "/api/login";
const REGISTER_ENDPOINT: &str = "/api/register";
const UPLOAD_RESUME_ENDPOINT: &str = "/dashboard-upload-resume";
const UPLOAD_JD_ENDPOINT: &str = "/dashboard-upload-jd";
const MATCH_SCORE_ENDPOINT: &str = "/match-score";
const GENERATE_QUESTIONS_ENDPOINT: &str = "/generate-questions";
const SUBMIT_ANSWER_ENDPOINT: &str = "/submit-answer";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A file received from the UI, forwarded untouched.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    fn into_part(self) -> Result<Part, BackendError> {
        let part = Part::bytes(self.bytes.to_vec()).file_name(self.file_name);
        match self.content_type {
            Some(mime) => Ok(part.mime_str(&mime)?),
            None => Ok(part),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateQuestionsRequest<'a> {
    session_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_title: Option<&'a str>,
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /api/login
    pub async fn login(&self, request: &LoginRequest) -> Result<UserProfile, BackendError> {
        let builder = self.client.post(self.url(LOGIN_ENDPOINT)).json(request);
        let response: LoginResponse = self.send(builder, LOGIN_ENDPOINT).await?;
        Ok(response.user)
    }

    /// POST /api/register
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<String>, BackendError> {
        let builder = self.client.post(self.url(REGISTER_ENDPOINT)).json(request);
        let response: RegisterResponse = self.send(builder, REGISTER_ENDPOINT).await?;
        Ok(response.message)
    }

    /// POST /dashboard-upload-resume. Returns the session id the backend opened.
    pub async fn upload_resume(&self, file: UploadedFile) -> Result<String, BackendError> {
        debug!("Uploading resume '{}' ({} bytes)", file.file_name, file.bytes.len());
        let form = Form::new().part("file", file.into_part()?);
        let builder = self
            .client
            .post(self.url(UPLOAD_RESUME_ENDPOINT))
            .multipart(form);
        let ack: SessionAck = self.send(builder, UPLOAD_RESUME_ENDPOINT).await?;
        info!("Backend opened session {}", ack.session_id);
        Ok(ack.session_id)
    }

    /// POST /dashboard-upload-jd
    pub async fn upload_jd(&self, session_id: &str, jd_text: &str) -> Result<(), BackendError> {
        let builder = self
            .client
            .post(self.url(UPLOAD_JD_ENDPOINT))
            .json(&JdUploadRequest {
                session_id,
                jd_text,
            });
        let ack: SessionAck = self.send(builder, UPLOAD_JD_ENDPOINT).await?;
        debug!(
            "JD upload acknowledged for {} (status {:?})",
            ack.session_id, ack.status
        );
        Ok(())
    }

    /// POST /match-score. Returns the raw analysis text.
    pub async fn match_score(&self, session_id: &str) -> Result<String, BackendError> {
        let builder = self
            .client
            .post(self.url(MATCH_SCORE_ENDPOINT))
            .json(&SessionRequest { session_id });
        let response: MatchScoreResponse = self.send(builder, MATCH_SCORE_ENDPOINT).await?;
        Ok(response.into_analysis_text())
    }

    /// POST /generate-questions
    pub async fn generate_questions(
        &self,
        session_id: &str,
        job_title: Option<&str>,
    ) -> Result<UpstreamText, BackendError> {
        let builder = self
            .client
            .post(self.url(GENERATE_QUESTIONS_ENDPOINT))
            .json(&GenerateQuestionsRequest {
                session_id,
                job_title,
            });
        let response: QuestionsResponse = self.send(builder, GENERATE_QUESTIONS_ENDPOINT).await?;
        Ok(response.questions)
    }

    /// POST /submit-answer. Returns the backend's `feedback` value untouched.
    pub async fn submit_answer(
        &self,
        session_id: &str,
        question_id: &str,
        recording: UploadedFile,
    ) -> Result<Value, BackendError> {
        let form = Form::new()
            .text("session_id", session_id.to_string())
            .text("question_id", question_id.to_string())
            .part("file", recording.into_part()?);
        let builder = self
            .client
            .post(self.url(SUBMIT_ANSWER_ENDPOINT))
            .multipart(form);
        let response: AnswerResponse = self.send(builder, SUBMIT_ANSWER_ENDPOINT).await?;
        Ok(response.feedback)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &'static str,
    ) -> Result<T, BackendError> {
        let response = builder.send().await.map_err(|e| {
            warn!("Request to {endpoint} failed: {e}");
            BackendError::Http(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Backend {endpoint} returned {status}: {body}");
            let message = serde_json::from_str::<BackendErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Backend {endpoint} returned {} bytes", body.len());
        serde_json::from_str(&body).map_err(|source| BackendError::Decode { endpoint, source })
    }
}
