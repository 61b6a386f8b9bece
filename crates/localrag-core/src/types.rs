//! Domain types shared by the embedder, the store and the tool server.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// A contiguous span of a source document, the unit of retrieval.
///
/// - `id`: globally unique chunk identifier (`doc_id:chunk_index`)
/// - `doc_id`: stable document identity (path relative to the corpus root, or external id)
/// - `source`: where the document came from (path of the corpus file)
/// - `title`/`url`: optional citation metadata
/// - `chunk_index`/`total_chunks`: position within the parent document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub source: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub content: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// One entry of a retrieval result.
///
/// `score` is cosine similarity against the query; higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RetrievedDoc {
    pub id: ChunkId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source: String,
    pub chunk_index: usize,
    pub score: f32,
}

/// Sort best first. Ties fall back to the chunk id so equal stores give equal orderings.
pub fn sort_by_score(docs: &mut [RetrievedDoc]) {
    docs.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, score: f32) -> RetrievedDoc {
        RetrievedDoc { id: id.into(), content: String::new(), title: None, url: None, source: "s".into(), chunk_index: 0, score }
    }

    #[test]
    fn sort_is_descending_with_id_tiebreak() {
        let mut docs = vec![doc("b", 0.5), doc("c", 0.9), doc("a", 0.5)];
        sort_by_score(&mut docs);
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn optional_metadata_is_omitted_from_json() {
        let json = serde_json::to_value(doc("a", 1.0)).unwrap();
        assert!(json.get("title").is_none());
        assert!(json.get("url").is_none());
        assert_eq!(json["source"], "s");
    }
}
