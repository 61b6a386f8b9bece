use serde::{Deserialize, Serialize};

/// Control signals a research agent emits; the orchestrator routes on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum ResearchSignal {
    Started { topic: String },
    Complete { summary: String },
}

pub fn mark_research_started(topic: &str) -> ResearchSignal {
    tracing::info!(topic, "research started");
    ResearchSignal::Started { topic: topic.to_string() }
}

pub fn mark_research_complete(summary: &str) -> ResearchSignal {
    tracing::info!(summary_len = summary.len(), "research complete");
    ResearchSignal::Complete { summary: summary.to_string() }
}

impl ResearchSignal {
    pub fn is_complete(&self) -> bool { matches!(self, ResearchSignal::Complete { .. }) }
}
