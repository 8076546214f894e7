// Response section extraction: turns loosely formatted generator text into
// structured data for the UI. Pure and synchronous; no function here fails.

pub mod feedback;
pub mod models;
pub mod numbered;
pub mod sections;

pub use feedback::parse_answer_feedback;
pub use models::{AnswerFeedback, MatchAnalysis, NumberedBlock};
pub use numbered::extract_numbered_blocks;
pub use sections::{analyze_match, DEFAULT_SECTION_HEADERS};
