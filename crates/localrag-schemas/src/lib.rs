//! Structured-output contracts for the research agent's LLM calls.
//!
//! Each output model declares its shape (serde + schemars) and its own
//! semantic rules (`StructuredOutput::validate`). Raw model text goes through
//! `parse_output`, which rejects anything malformed before it reaches callers.
pub mod models;
pub mod prompts;
pub mod templates;
pub mod validate;

pub use models::*;
pub use prompts::{ClarificationPrompt, CitationPrompt, FinalReportPrompt, PlanPrompt, Prompt, SummaryPrompt};
pub use validate::{extract_json, parse_output, StructuredOutput};
