// Résumé ↔ job description analysis.
// Implements: text extraction, prompt building, lenient completion parsing,
// presentation, and the single-session UI state machine.
// All inference calls go through llm_client.

pub mod extract;
pub mod handlers;
pub mod interpret;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod render;
pub mod session;
