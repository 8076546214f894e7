// Interview flow: resume upload → JD upload → match score → questions → answers.
// Each step checks its prerequisites locally before calling the backend.

pub mod flow;
pub mod handlers;
