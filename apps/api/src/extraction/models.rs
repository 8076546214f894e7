use serde::{Deserialize, Serialize};

/// Match percentage in `[0, 100]`. `0` means the text carried no score line.
pub type MatchPercentage = u32;

/// Bullet items pulled out of one `###` section of analysis text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub header: String,
    pub items: Vec<String>,
}

/// One generated interview question plus any continuation lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedBlock {
    /// Leading label as written in the source. Not guaranteed sequential or unique.
    pub ordinal: Option<u64>,
    pub text: String,
}

/// A display section of the detailed match breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownSection {
    pub header: String,
    pub bullets: Vec<String>,
}

/// Everything the UI shows for one match-score response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchAnalysis {
    pub match_score: MatchPercentage,
    pub sections: Vec<ExtractedSection>,
    pub breakdown: Vec<BreakdownSection>,
}

/// Feedback on a submitted interview answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerFeedback {
    Structured {
        strengths: Vec<String>,
        improvements: Vec<String>,
        score: MatchPercentage,
    },
    Freeform {
        text: String,
        highlights: Vec<String>,
    },
}
