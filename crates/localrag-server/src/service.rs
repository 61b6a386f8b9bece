use std::sync::Arc;

use localrag_core::config::{RetrievalSettings, Settings};
use localrag_core::traits::Embedder;
use localrag_core::types::RetrievedDoc;
use localrag_core::{Error, Result};
use localrag_embed::load_embedder;
use localrag_vector::VectorStore;

/// Query-time retrieval over a read-only store.
///
/// Built once at startup and shared by reference; clones share the store
/// handle and the embedder.
#[derive(Clone)]
pub struct RetrievalService {
    store: VectorStore,
    embedder: Arc<dyn Embedder>,
    settings: RetrievalSettings,
}

impl RetrievalService {
    /// Open the configured store and embedder. Every failure here is fatal to startup.
    pub async fn open(settings: &Settings) -> Result<Self> {
        let store = VectorStore::open(&settings.store.resolved_path(), &settings.store.table).await?;
        let embedder = load_embedder(&settings.embed)?;
        Self::new(store, embedder, settings.retrieval.clone())
    }

    pub fn new(store: VectorStore, embedder: Arc<dyn Embedder>, settings: RetrievalSettings) -> Result<Self> {
        if embedder.dim() != store.dim() {
            return Err(Error::InvalidConfig(format!(
                "embedder '{}' produces {} dims but the store holds {}-dim vectors",
                embedder.id(),
                embedder.dim(),
                store.dim()
            )));
        }
        tracing::info!(embedder = embedder.id(), dim = store.dim(), default_k = settings.default_k, max_k = settings.max_k, "retrieval service ready");
        Ok(Self { store, embedder, settings })
    }

    /// Chunks most similar to `query`, best first, at most `k` (default `default_k`, capped at `max_k`).
    pub async fn retrieve(&self, query: &str, k: Option<usize>) -> Result<Vec<RetrievedDoc>> {
        let query = query.trim();
        if query.is_empty() { return Err(Error::InvalidInput("query must not be empty".into())); }
        let k = match k {
            Some(0) => return Err(Error::InvalidInput("k must be at least 1".into())),
            Some(k) => k.min(self.settings.max_k),
            None => self.settings.default_k,
        };

        let embedder = Arc::clone(&self.embedder);
        let text = query.to_string();
        let vector = tokio::task::spawn_blocking(move || embedder.embed_query(&text))
            .await
            .map_err(|e| Error::Operation(format!("embedding task failed: {}", e)))?
            .map_err(Error::embedding)?;

        let docs = self.store.search(&vector, k).await?;
        tracing::info!(query, k, returned = docs.len(), "retrieve");
        Ok(docs)
    }
}
