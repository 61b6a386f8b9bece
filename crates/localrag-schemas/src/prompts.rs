//! Prompt definitions pairing an instruction and few-shot examples with an output contract.
use serde::Serialize;

use localrag_core::{Error, Result};
use crate::models::*;
use crate::validate::{parse_output, StructuredOutput};

pub trait Prompt {
    type Input: Serialize;
    type Output: StructuredOutput;

    fn name(&self) -> &'static str;
    fn instruction(&self) -> &'static str;
    fn examples(&self) -> Vec<(Self::Input, Self::Output)> { Vec::new() }

    /// Full prompt text: instruction, output schema, examples, then the input.
    fn render(&self, input: &Self::Input) -> Result<String> {
        let schema = serde_json::to_string(&<Self::Output as StructuredOutput>::output_schema()).map_err(|e| Error::Schema(e.to_string()))?;
        let mut out = String::new();
        out.push_str(self.instruction().trim());
        out.push_str("\nReturn the output as a JSON object that complies with the following JSON Schema:\n");
        out.push_str(&schema);
        out.push_str("\nUse double quotes only, escaped with a backslash where needed.\n");
        let examples = self.examples();
        if !examples.is_empty() {
            out.push_str("\n--------EXAMPLES-----------\n");
            for (i, (example_in, example_out)) in examples.iter().enumerate() {
                out.push_str(&format!("Example {}\nInput: {}\nOutput: {}\n", i + 1, to_json(example_in)?, to_json(example_out)?));
            }
            out.push_str("-----------------------------\n");
        }
        out.push_str(&format!("\nNow perform the same with the following input\nInput: {}\nOutput: ", to_json(input)?));
        Ok(out)
    }

    /// Validate a raw model response against the output contract.
    fn parse(&self, raw: &str) -> Result<Self::Output> { parse_output(raw) }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::Schema(e.to_string()))
}

pub struct SummaryPrompt;

impl Prompt for SummaryPrompt {
    type Input = SummaryInput;
    type Output = AnswerWithCitations;

    fn name(&self) -> &'static str { "summary" }

    fn instruction(&self) -> &'static str {
        "Given a list of messages, write a concise summary that captures the main points and key information.
The summary must be clear, coherent and well-structured.
Cover the research question itself, not the technical steps taken to gather the context."
    }

    fn examples(&self) -> Vec<(SummaryInput, AnswerWithCitations)> {
        vec![(
            SummaryInput {
                messages: vec![
                    serde_json::json!({"content": "Genoa CFC is the oldest extant football team in Italy. They play at the Stadio Luigi Ferraris.", "url": "https://en.wikipedia.org/wiki/Genoa_CFC", "title": "Genoa CFC"}),
                    serde_json::json!({"content": "Luigi Ferraris was born in 1887.", "url": "https://en.wikipedia.org/wiki/Luigi_Ferraris", "title": "Luigi Ferraris"}),
                ],
            },
            AnswerWithCitations {
                statements: vec![
                    AnswerStatement::plain("The context is about Italy's oldest club and its stadium.", "## Genoa CFC"),
                    AnswerStatement::cited("Genoa CFC is named as the oldest extant team.", "* Genoa CFC is the oldest extant football team in Italy and plays at the Stadio Luigi Ferraris.", "Genoa CFC", "https://en.wikipedia.org/wiki/Genoa_CFC"),
                    AnswerStatement::cited("The stadium's namesake has a known birth year.", "* Luigi Ferraris, the stadium's namesake, was born in 1887.", "Luigi Ferraris", "https://en.wikipedia.org/wiki/Luigi_Ferraris"),
                ],
            },
        )]
    }
}

pub struct FinalReportPrompt;

impl Prompt for FinalReportPrompt {
    type Input = AnswersCollection;
    type Output = AnswerWithCitations;

    fn name(&self) -> &'static str { "final_report" }

    fn instruction(&self) -> &'static str {
        "Given research findings, write a final report that summarizes the key points.
Keep it clear and well-structured, focused on the most important information without dropping details.
Do not report technical information about the research process."
    }
}

pub struct CitationPrompt;

impl Prompt for CitationPrompt {
    type Input = QueryInput;
    type Output = AnswerWithCitations;

    fn name(&self) -> &'static str { "citation" }

    fn instruction(&self) -> &'static str {
        "Answer the question using the given context.
The answer may span several sentences; attach a reference to every sentence taken from the context.
Build the answer step by step from multiple context elements, in markdown following this template:
```
# Title
Here is what the context provides for your question:
* statement 1
* statement 2 [reference title](reference url)
```"
    }

    fn examples(&self) -> Vec<(QueryInput, AnswerWithCitations)> {
        vec![(
            QueryInput {
                question: "What is the main topic of the document?".into(),
                context: vec![ContextDoc {
                    content: "The main topic is climate change.".into(),
                    title: Some("Climate Change".into()),
                    url: Some("https://example.com/climate_change".into()),
                }],
            },
            AnswerWithCitations {
                statements: vec![
                    AnswerStatement::plain("The question asks for the topic; it becomes the title.", "# Climate change"),
                    AnswerStatement::cited("The context states the topic directly.", "* The document is about climate change.", "Climate Change", "https://example.com/climate_change"),
                ],
            },
        )]
    }
}

pub struct ClarificationPrompt;

impl Prompt for ClarificationPrompt {
    type Input = ClarificationInput;
    type Output = ClarificationOutput;

    fn name(&self) -> &'static str { "clarification" }

    fn instruction(&self) -> &'static str {
        "Decide whether a clarifying question is needed to understand the user's query.
If it is, write the question to ask the user and leave the final statements empty.
If it is not, provide the final statements to search on: a list of strings representing the user's input, at most 3.
Ask for clarification only when the query is ambiguous or lacks detail, and never more than twice in a row."
    }

    fn examples(&self) -> Vec<(ClarificationInput, ClarificationOutput)> {
        vec![
            (
                ClarificationInput { messages: vec!["What is the capital of France?".into()] },
                ClarificationOutput { clarification_is_required: false, clarifying_question: None, final_statements: vec!["Capital of France".into()] },
            ),
            (
                ClarificationInput { messages: vec!["What are the health benefits of eating apples?".into()] },
                ClarificationOutput {
                    clarification_is_required: true,
                    clarifying_question: Some("Are you interested in nutritional benefits, or benefits for specific health conditions?".into()),
                    final_statements: vec![],
                },
            ),
        ]
    }
}

pub struct PlanPrompt;

impl Prompt for PlanPrompt {
    type Input = PlannerInput;
    type Output = PlannerOutput;

    fn name(&self) -> &'static str { "plan" }

    fn instruction(&self) -> &'static str {
        "You are an expert planner. Create a research plan for the user's request.
Expand and refine the given topics into a comprehensive set (no more than 10) covering the request.
Then write a plan of exactly 3 distinct, specific steps, each focused on a different aspect and answering a single question in 1-3 sentences."
    }

    fn examples(&self) -> Vec<(PlannerInput, PlannerOutput)> {
        vec![(
            PlannerInput {
                messages: "User goal: choose a gravel bike for long mixed-terrain rides, budget around $2,500, comfort over speed.".into(),
                search_topics: vec!["Research new bikes".into()],
            },
            PlannerOutput {
                reasoning_on_topics: "Comfort and terrain drive geometry and tire choice; budget bounds the models.".into(),
                expanded_topics: vec!["Endurance gravel geometry".into(), "Tubeless tire clearance".into(), "Gravel bikes under $2,500".into()],
                reasoning_on_plan: "Separate fit, components and shortlist so each step answers one question.".into(),
                plan: vec![
                    "Identify which frame geometry figures indicate comfort on long gravel rides.".into(),
                    "Determine the tire clearance and tubeless setup suited to fire roads and light singletrack.".into(),
                    "Shortlist current gravel bikes under $2,500 that meet the geometry and tire criteria.".into(),
                ],
            },
        )]
    }
}
