use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use localrag_core::types::RetrievedDoc;
use localrag_core::Error;

pub const RETRIEVE_DESCRIPTION: &str = "Retrieve passages relevant to a query from the local offline document index. \
Searches only the locally indexed corpus, never the web. Returns up to k passages, best match first, \
each with its source metadata and a cosine similarity score.";

/// Arguments of the retrieval tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RetrieveArgs {
    /// Natural-language search query.
    pub query: String,
    /// Maximum number of passages to return.
    #[serde(default, alias = "top_k", skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RetrieveOutput {
    /// Retrieved passages, best match first.
    pub result: Vec<RetrievedDoc>,
}

fn object_schema<T: JsonSchema>() -> Arc<JsonObject> {
    match serde_json::to_value(schema_for!(T)) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

/// Tool entry as listed by `tools/list`.
pub fn retrieve_tool(name: &str) -> Tool {
    let mut tool = Tool::new(name.to_string(), RETRIEVE_DESCRIPTION, object_schema::<RetrieveArgs>());
    tool.output_schema = Some(object_schema::<RetrieveOutput>());
    tool
}

/// `tools/call` result for a successful lookup.
pub fn call_result(docs: Vec<RetrievedDoc>) -> CallToolResult {
    match serde_json::to_value(RetrieveOutput { result: docs }) {
        Ok(output) => CallToolResult::structured(output),
        Err(e) => call_error(&Error::Operation(format!("unserializable result: {}", e))),
    }
}

/// `tools/call` result for a failed lookup. The failure is reported to the
/// caller as tool output rather than as a protocol error.
pub fn call_error(err: &Error) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("{}: {}", err.kind(), err))])
}
