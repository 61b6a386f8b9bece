//! Descriptors for the research tools, in the shape tool-calling LLM APIs expect.
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchArgs {
    /// Query to run against the web search provider.
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ThinkArgs {
    /// Reflection on the progress so far: findings, gaps, and the next step.
    pub reflection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConductResearchArgs {
    /// The topic to research, as a standalone description of at least a paragraph.
    pub research_topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResearchCompleteArgs {
    /// Short summary of what the research established.
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

fn spec<T: JsonSchema>(name: &str, description: &str) -> ToolSpec {
    ToolSpec {
        name: name.to_string(),
        description: description.to_string(),
        parameters: serde_json::to_value(schema_for!(T)).unwrap_or_default(),
    }
}

pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        spec::<WebSearchArgs>("web_search", "Search the web for information that is missing from the local index."),
        spec::<ThinkArgs>("think_tool", "Record a reflection on research progress and plan the next step. Call it after each search."),
        spec::<ConductResearchArgs>("conduct_research", "Delegate a research task to a sub-agent. Marks the start of research on the topic."),
        spec::<ResearchCompleteArgs>("research_complete", "Signal that research is complete."),
    ]
}
