use std::sync::Arc;

use localrag_core::config::RetrievalSettings;
use localrag_core::traits::Embedder;
use localrag_core::types::DocumentChunk;
use localrag_embed::HashEmbedder;
use localrag_server::RetrievalService;
use localrag_vector::{LanceDbIndexer, VectorStore};
use tempfile::TempDir;

pub const TABLE: &str = "wiki_chunks";
pub const DIM: usize = 512;

fn chunk(id: &str, content: &str) -> DocumentChunk {
    DocumentChunk {
        id: format!("{id}:0"),
        doc_id: id.to_string(),
        source: format!("corpus/{id}.txt"),
        title: Some(id.to_string()),
        url: Some(format!("https://en.wikipedia.org/wiki/{id}")),
        content: content.to_string(),
        chunk_index: 0,
        total_chunks: 1,
    }
}

pub fn corpus() -> Vec<DocumentChunk> {
    vec![
        chunk("Paris", "Paris is the capital of France."),
        chunk("Tokyo", "Tokyo is the capital of Japan."),
        chunk("Rust", "Rust is a systems programming language."),
        chunk("Lance", "Lance is a columnar format for vectors."),
        chunk("Seine", "The Seine flows through Paris in France."),
    ]
}

/// Index the corpus into a scratch store and open a service over it.
pub async fn service(max_k: usize) -> (TempDir, RetrievalService) {
    let tmp = TempDir::new().unwrap();
    let embedder = HashEmbedder::new(DIM);
    LanceDbIndexer::new(tmp.path(), TABLE).await.unwrap().index_chunks(&corpus(), &embedder, 2).await.unwrap();
    let store = VectorStore::open(tmp.path(), TABLE).await.unwrap();
    let embedder: Arc<dyn Embedder> = Arc::new(embedder);
    let service = RetrievalService::new(store, embedder, RetrievalSettings { default_k: 3, max_k }).unwrap();
    (tmp, service)
}
