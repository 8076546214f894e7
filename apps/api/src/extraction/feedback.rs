//! Answer feedback normalisation.
//!
//! The feedback generator is asked for `{strengths, improvements, score}` JSON
//! but may wrap it in code fences, hand back `{"error": ..., "raw": ...}` when
//! its own decoding failed, or return a plain paragraph.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::extraction::models::{AnswerFeedback, MatchPercentage};
use crate::extraction::sections::segment_freeform;

#[derive(Debug, Deserialize)]
struct StructuredFeedback {
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    score: Option<f64>,
}

impl StructuredFeedback {
    fn is_empty(&self) -> bool {
        self.strengths.is_empty() && self.improvements.is_empty() && self.score.is_none()
    }

    fn into_feedback(self) -> AnswerFeedback {
        AnswerFeedback::Structured {
            strengths: clean_items(self.strengths),
            improvements: clean_items(self.improvements),
            score: self
                .score
                .map(|s| s.round().clamp(0.0, 100.0) as MatchPercentage)
                .unwrap_or(0),
        }
    }
}

/// Turns the backend's `feedback` value into `AnswerFeedback`. Never fails.
pub fn parse_answer_feedback(value: &Value) -> AnswerFeedback {
    match value {
        Value::Object(map) => {
            if let Some(structured) = as_structured(value) {
                return structured.into_feedback();
            }
            match map.get("raw") {
                Some(Value::String(raw)) => parse_feedback_text(raw),
                _ => freeform(&value.to_string()),
            }
        }
        Value::String(text) => parse_feedback_text(text),
        Value::Null => freeform(""),
        other => freeform(&other.to_string()),
    }
}

fn parse_feedback_text(text: &str) -> AnswerFeedback {
    let stripped = strip_json_fences(text);
    match serde_json::from_str::<Value>(stripped)
        .ok()
        .as_ref()
        .and_then(as_structured)
    {
        Some(structured) => structured.into_feedback(),
        None => {
            debug!("Feedback is not structured JSON, treating as prose");
            freeform(stripped)
        }
    }
}

fn as_structured(value: &Value) -> Option<StructuredFeedback> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value::<StructuredFeedback>(value.clone())
        .ok()
        .filter(|s| !s.is_empty())
}

fn freeform(text: &str) -> AnswerFeedback {
    let text = text.trim();
    AnswerFeedback::Freeform {
        text: text.to_string(),
        highlights: segment_freeform(text),
    }
}

fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Strips ```json ... ``` or ``` ... ``` code fences from generator output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}
