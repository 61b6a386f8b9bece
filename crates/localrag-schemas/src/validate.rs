use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;

use localrag_core::{Error, Result};

/// A model output contract: a serde shape plus semantic rules on top of it.
pub trait StructuredOutput: DeserializeOwned + Serialize + JsonSchema {
    fn validate(&self) -> Result<()>;

    /// JSON Schema of the output shape, embedded in rendered prompts.
    fn output_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Self)).unwrap_or_default()
    }
}

/// Locate the JSON object in raw model text (code fences and surrounding prose are tolerated).
pub fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Deserialize and validate raw model output. Any failure is `Error::Schema`.
pub fn parse_output<T: StructuredOutput>(raw: &str) -> Result<T> {
    let type_name = std::any::type_name::<T>().rsplit("::").next().unwrap_or("output");
    let json = extract_json(raw).ok_or_else(|| Error::Schema(format!("no JSON object found for {}", type_name)))?;
    let value: T = serde_json::from_str(json).map_err(|e| Error::Schema(format!("{} does not match its schema: {}", type_name, e)))?;
    value.validate().inspect_err(|e| tracing::warn!(error = %e, "rejected structured output"))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_fenced_block() {
        let raw = "Sure, here it is:\n```json\n{\"a\": {\"b\": 1}}\n```\n";
        assert_eq!(extract_json(raw), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn no_object_yields_none() {
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }
}
