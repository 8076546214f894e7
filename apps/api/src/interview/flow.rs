//! Prerequisite checks and response shaping for the interview flow.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::backend_client::payloads::UpstreamText;
use crate::backend_client::UploadedFile;
use crate::errors::AppError;
use crate::extraction::{extract_numbered_blocks, NumberedBlock};
use crate::session::{SessionContext, SessionStore};

/// Returns the trimmed session id, or a validation error when it is blank.
pub fn require_session_id(session_id: &str) -> Result<&str, AppError> {
    let session_id = session_id.trim();
    if session_id.is_empty() {
        return Err(AppError::Validation(
            "session_id is required. Upload your resume first.".to_string(),
        ));
    }
    Ok(session_id)
}

/// Loads a session, treating unknown and unreadable sessions alike.
pub async fn load_session(
    store: &dyn SessionStore,
    session_id: &str,
) -> Result<SessionContext, AppError> {
    store
        .get(session_id)
        .await?
        .ok_or_else(|| AppError::no_session(session_id))
}

pub fn require_pdf(file_name: &str) -> Result<(), AppError> {
    if file_name.to_ascii_lowercase().ends_with(".pdf") {
        Ok(())
    } else {
        Err(AppError::Validation("Please upload a PDF".to_string()))
    }
}

/// Picks the job title for question generation.
///
/// A title given with the request wins, then the one remembered on the
/// session. Without either, the session must at least have a job description.
pub fn resolve_job_title(
    context: &SessionContext,
    requested: Option<&str>,
) -> Result<Option<String>, AppError> {
    let title = requested
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| context.job_title.clone());

    if title.is_none() && !context.jd_uploaded {
        return Err(AppError::Validation(
            "Upload a job description or enter a target role first".to_string(),
        ));
    }
    Ok(title)
}

/// Extracts the question list from generated text.
///
/// A list of plain, unnumbered strings is taken one question per entry.
pub fn questions_from_upstream(questions: UpstreamText) -> Vec<NumberedBlock> {
    if let UpstreamText::List(items) = &questions {
        let joined = items.join("\n");
        let blocks = extract_numbered_blocks(&joined);
        if !blocks.is_empty() {
            return blocks;
        }
        return items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .enumerate()
            .map(|(i, item)| NumberedBlock {
                ordinal: Some(i as u64 + 1),
                text: item.to_string(),
            })
            .collect();
    }
    extract_numbered_blocks(&questions.into_text())
}

/// Finds the cached question an answer refers to. Question ids are 1-based
/// positions in the stored list.
pub fn question_text<'a>(context: &'a SessionContext, question_id: &str) -> Option<&'a str> {
    let position = question_id.trim().parse::<usize>().ok()?;
    context
        .questions
        .get(position.checked_sub(1)?)
        .map(|block| block.text.as_str())
}

/// Text fields plus at most one file from a multipart form.
#[derive(Debug, Default)]
pub struct FormParts {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl FormParts {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn require_file(&mut self) -> Result<UploadedFile, AppError> {
        self.file
            .take()
            .filter(|f| !f.file_name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("No file selected".to_string()))
    }
}

/// Reads a multipart body. The part named `file_field` is kept as the file.
pub async fn read_form(mut multipart: Multipart, file_field: &str) -> Result<FormParts, AppError> {
    let mut parts = FormParts::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == file_field {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            parts.file = Some(UploadedFile {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid field '{name}': {e}")))?;
            parts.fields.insert(name, value);
        }
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    fn context_with_questions() -> SessionContext {
        let mut context = SessionContext::new("s1");
        context.questions = extract_numbered_blocks("1. First?\n2. Second?");
        context
    }

    #[test]
    fn test_blank_session_id_rejected() {
        assert!(matches!(require_session_id("   "), Err(AppError::Validation(_))));
        assert_eq!(require_session_id(" abc ").unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = MemorySessionStore::new();
        let result = load_session(&store, "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_require_pdf_is_case_insensitive() {
        assert!(require_pdf("Resume.PDF").is_ok());
        assert!(require_pdf("resume.docx").is_err());
        assert!(require_pdf("pdf").is_err());
    }

    #[test]
    fn test_job_title_required_without_jd() {
        let context = SessionContext::new("s1");
        assert!(matches!(
            resolve_job_title(&context, Some("  ")),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            resolve_job_title(&context, Some(" Backend Engineer ")).unwrap(),
            Some("Backend Engineer".to_string())
        );
    }

    #[test]
    fn test_job_title_optional_with_jd() {
        let mut context = SessionContext::new("s1");
        context.jd_uploaded = true;
        assert_eq!(resolve_job_title(&context, None).unwrap(), None);
        context.job_title = Some("SRE".to_string());
        assert_eq!(resolve_job_title(&context, None).unwrap(), Some("SRE".to_string()));
    }

    #[test]
    fn test_questions_from_raw_text() {
        let blocks = questions_from_upstream(UpstreamText::Raw {
            raw: "Questions:\n1. Why Rust?\n2. Why now?".to_string(),
        });
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].text, "2. Why now?");
    }

    #[test]
    fn test_questions_from_unnumbered_list() {
        let blocks = questions_from_upstream(UpstreamText::List(vec![
            "Why Rust?".to_string(),
            " ".to_string(),
            "Why now?".to_string(),
        ]));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].ordinal, Some(2));
        assert_eq!(blocks[1].text, "Why now?");
    }

    #[test]
    fn test_questions_from_unstructured_text_is_empty() {
        let blocks = questions_from_upstream(UpstreamText::Text("Sorry, no questions".to_string()));
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_numeric_questions_value_is_not_a_score() {
        let blocks = questions_from_upstream(UpstreamText::Other(serde_json::json!(72)));
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_question_text_by_position() {
        let context = context_with_questions();
        assert_eq!(question_text(&context, "2"), Some("2. Second?"));
        assert_eq!(question_text(&context, "0"), None);
        assert_eq!(question_text(&context, "3"), None);
        assert_eq!(question_text(&context, "q1"), None);
    }
}
