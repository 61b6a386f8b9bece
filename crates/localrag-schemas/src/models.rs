use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use localrag_core::types::RetrievedDoc;
use localrag_core::{Error, Result};
use crate::validate::StructuredOutput;

/// One sentence of an answer, optionally backed by a reference from the context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerStatement {
    /// Reasoning behind the answer. This should explain how the answer was derived.
    pub reasoning: String,
    /// Sentence of the answer. May be a title or paragraph text in markdown format.
    #[serde(alias = "answer_sentece")]
    pub answer_sentence: String,
    /// URL of the reference from given context.
    #[serde(default)]
    pub reference_url: Option<String>,
    /// Title of the reference from given context.
    #[serde(default)]
    pub reference_title: Option<String>,
}

impl AnswerStatement {
    pub fn plain(reasoning: &str, sentence: &str) -> Self {
        Self { reasoning: reasoning.into(), answer_sentence: sentence.into(), reference_url: None, reference_title: None }
    }

    pub fn cited(reasoning: &str, sentence: &str, title: &str, url: &str) -> Self {
        Self { reasoning: reasoning.into(), answer_sentence: sentence.into(), reference_url: Some(url.into()), reference_title: Some(title.into()) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerWithCitations {
    /// Sequential list of sentences of the answer. Some statements are with references.
    pub statements: Vec<AnswerStatement>,
}

impl AnswerWithCitations {
    /// Markdown rendering, one statement per line, citations appended as links.
    pub fn format_response(&self) -> String {
        self.statements
            .iter()
            .map(|s| match (&s.reference_title, &s.reference_url) {
                (Some(title), Some(url)) if !title.is_empty() && !url.is_empty() => format!("{} [[{}]({})]", s.answer_sentence, title, url),
                _ => s.answer_sentence.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl StructuredOutput for AnswerWithCitations {
    fn validate(&self) -> Result<()> {
        if self.statements.is_empty() { return Err(Error::Schema("answer has no statements".into())); }
        for (i, s) in self.statements.iter().enumerate() {
            if s.answer_sentence.trim().is_empty() { return Err(Error::Schema(format!("statement {} has an empty answer sentence", i))); }
            let has_url = s.reference_url.as_deref().is_some_and(|u| !u.trim().is_empty());
            let has_title = s.reference_title.as_deref().is_some_and(|t| !t.trim().is_empty());
            if has_url && !has_title { return Err(Error::Schema(format!("statement {} cites a url without a title", i))); }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnswersCollection {
    /// List of answers with citations.
    pub answers: Vec<AnswerWithCitations>,
}

/// A context passage handed to the answering prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDoc {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<RetrievedDoc> for ContextDoc {
    fn from(doc: RetrievedDoc) -> Self { Self { content: doc.content, title: doc.title, url: doc.url } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryInput {
    pub question: String,
    pub context: Vec<ContextDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryInput {
    /// Messages to summarize (tool results, notes); free-form JSON objects.
    pub messages: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationInput {
    /// Messages from the user so far.
    pub messages: Vec<String>,
}

pub const MAX_FINAL_STATEMENTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClarificationOutput {
    /// Whether a clarifying question is required to better understand the user's query.
    pub clarification_is_required: bool,
    /// Clarifying question to be asked to the user. Empty when no clarification is required.
    #[serde(default)]
    pub clarifying_question: Option<String>,
    /// Statements from the user inputs to conduct search on.
    #[serde(default)]
    pub final_statements: Vec<String>,
}

impl StructuredOutput for ClarificationOutput {
    fn validate(&self) -> Result<()> {
        let question = self.clarifying_question.as_deref().map(str::trim).filter(|q| !q.is_empty());
        match (self.clarification_is_required, question) {
            (true, None) => Err(Error::Schema("clarification required but no clarifying question given".into())),
            (false, Some(_)) => Err(Error::Schema("clarifying question given although clarification is not required".into())),
            (true, Some(_)) => Ok(()),
            (false, None) => {
                if self.final_statements.is_empty() { return Err(Error::Schema("no final statements to search on".into())); }
                if self.final_statements.len() > MAX_FINAL_STATEMENTS {
                    return Err(Error::Schema(format!("{} final statements, at most {} allowed", self.final_statements.len(), MAX_FINAL_STATEMENTS)));
                }
                if self.final_statements.iter().any(|s| s.trim().is_empty()) { return Err(Error::Schema("empty final statement".into())); }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerInput {
    /// Recent messages from the conversation.
    pub messages: String,
    /// Initial topics to research.
    pub search_topics: Vec<String>,
}

pub const PLAN_STEPS: usize = 3;
pub const MAX_EXPANDED_TOPICS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlannerOutput {
    /// Reasoning statements for each topic.
    pub reasoning_on_topics: String,
    /// Expanded and refined list of distinct topics to research, no more than 10 topics.
    pub expanded_topics: Vec<String>,
    /// Reasoning statements for the plan. Plan should have exactly 3 steps.
    pub reasoning_on_plan: String,
    /// Exactly 3 distinct research steps covering the expanded topics, each a concise description of a research activity.
    pub plan: Vec<String>,
}

impl StructuredOutput for PlannerOutput {
    fn validate(&self) -> Result<()> {
        if self.plan.len() != PLAN_STEPS { return Err(Error::Schema(format!("plan has {} steps, exactly {} required", self.plan.len(), PLAN_STEPS))); }
        if self.plan.iter().any(|s| s.trim().is_empty()) { return Err(Error::Schema("plan contains an empty step".into())); }
        if self.expanded_topics.len() > MAX_EXPANDED_TOPICS {
            return Err(Error::Schema(format!("{} expanded topics, at most {} allowed", self.expanded_topics.len(), MAX_EXPANDED_TOPICS)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubagentInput {
    /// The request that initiated the research process.
    pub original_request: String,
    /// The topic this subagent is assigned to research.
    pub research_topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubagentOutput {
    /// Detailed report summarizing the findings on the research topic.
    pub report: String,
    /// URLs used as sources; the source name when no URL is available.
    #[serde(default)]
    pub references: Vec<String>,
}

impl StructuredOutput for SubagentOutput {
    fn validate(&self) -> Result<()> {
        if self.report.trim().is_empty() { return Err(Error::Schema("subagent report is empty".into())); }
        Ok(())
    }
}
