//! Tools the research agent calls besides local retrieval: web search,
//! reflection, and the start/complete signals an orchestrator routes on.
pub mod signals;
pub mod think;
pub mod tools;
pub mod web_search;

pub use signals::{mark_research_complete, mark_research_started, ResearchSignal};
pub use think::think;
pub use tools::{tool_specs, ToolSpec};
pub use web_search::{format_results, WebResult, WebSearch, API_KEY_ENV};
