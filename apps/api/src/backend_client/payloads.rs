use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionRequest<'a> {
    pub session_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct JdUploadRequest<'a> {
    pub session_id: &'a str,
    pub jd_text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SessionAck {
    #[serde(default)]
    pub status: Option<String>,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchScoreResponse {
    pub match_score: UpstreamText,
}

impl MatchScoreResponse {
    /// Analysis text for the extractor. A bare integer score is written as a
    /// `Match Score: NN%` line so it parses like generated text.
    pub fn into_analysis_text(self) -> String {
        match self.match_score {
            UpstreamText::Other(Value::Number(n)) if n.as_u64().is_some() => {
                format!("Match Score: {n}%")
            }
            other => other.into_text(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionsResponse {
    pub questions: UpstreamText,
}

#[derive(Debug, Deserialize)]
pub struct AnswerResponse {
    #[serde(default)]
    pub feedback: Value,
}

/// Generated text as the backend returns it: `{"raw": "..."}`, a bare string,
/// or a list of strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UpstreamText {
    Raw { raw: String },
    Text(String),
    List(Vec<String>),
    Other(Value),
}

impl UpstreamText {
    /// Flattens to a single string. Lists are joined by newlines.
    pub fn into_text(self) -> String {
        match self {
            UpstreamText::Raw { raw } => raw,
            UpstreamText::Text(text) => text,
            UpstreamText::List(items) => items.join("\n"),
            UpstreamText::Other(Value::Null) => String::new(),
            UpstreamText::Other(other) => other.to_string(),
        }
    }
}

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct BackendErrorBody {
    pub error: String,
}
