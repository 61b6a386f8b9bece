//! System prompts for the research subagent and its supervisor.
//!
//! Placeholders are `{name}`; `render` substitutes them and fails when one has no value.
use std::collections::HashMap;

use localrag_core::{Error, Result};

pub const SUBAGENT_PROMPT: &str = r#"You are a research assistant researching the user's topic using local files.

<Task>
Use the tools provided to gather information about the topic. Call them in series or in parallel; the strategy is up to you.
</Task>

<Available Tools>
- **retrieve_docs**: relevant passages from the local offline index, try it first
- **web_search**: search the web for information missing from the local index
- **think_tool**: reflection and planning between searches

Use think_tool after each search to reflect on results and plan the next step.
</Available Tools>

<Hard Limits>
- Simple queries: at most 1 search call
- Complex queries: at most 3 search calls
Stop as soon as you can answer comprehensively, have 2+ relevant sources, or your last 2 searches returned similar information.
</Hard Limits>

<Input>
Research Topic: {research_topic}
</Input>
"#;

pub const SUPERVISOR_PROMPT: &str = r#"You are a research supervisor. Conduct research by calling the "conduct_research" tool.

<Task>
Call "conduct_research" for the overall research question. When the findings satisfy you, call "research_complete".
</Task>

<Available Tools>
1. **conduct_research**: delegate a research task to a sub-agent
2. **research_complete**: signal that research is done
3. **think_tool**: reflection and planning

Use think_tool before delegating and after each result. Independent sub-topics may be delegated in parallel, at most {max_concurrent_research_units} per iteration.
</Available Tools>

<Hard Limits>
- Prefer a single sub-agent unless the request clearly splits into independent parts
- Stop after {max_researcher_iterations} calls to think_tool and conduct_research
- Give each sub-agent complete standalone instructions without acronyms
</Hard Limits>

<Input>
Topic to research: {research_topic}
</Input>
"#;

fn is_placeholder(name: &str) -> bool { !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') }

/// Names of `{name}` placeholders in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        rest = &rest[start + 1..];
        let Some(end) = rest.find('}') else { break };
        let name = &rest[..end];
        if is_placeholder(name) { names.push(name); }
    }
    names
}

/// Substitute `{key}` placeholders in one pass over the template. Values are
/// copied verbatim, so placeholder text inside a value is never expanded.
/// Every placeholder must have a value; extra values are ignored.
pub fn render(template: &str, vars: &HashMap<&str, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}').map(|end| &after[..end]).filter(|name| is_placeholder(name)) {
            Some(name) => {
                let value = vars.get(name)
                    .ok_or_else(|| Error::InvalidInput(format!("template placeholder '{}' not provided", name)))?;
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

pub fn subagent_prompt(research_topic: &str) -> Result<String> {
    render(SUBAGENT_PROMPT, &HashMap::from([("research_topic", research_topic.to_string())]))
}

pub fn supervisor_prompt(research_topic: &str, max_concurrent_research_units: usize, max_researcher_iterations: usize) -> Result<String> {
    render(
        SUPERVISOR_PROMPT,
        &HashMap::from([
            ("research_topic", research_topic.to_string()),
            ("max_concurrent_research_units", max_concurrent_research_units.to_string()),
            ("max_researcher_iterations", max_researcher_iterations.to_string()),
        ]),
    )
}
