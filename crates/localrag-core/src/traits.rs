/// Text to vector mapping. Implementations return L2-normalized vectors of `dim()` length.
pub trait Embedder: Send + Sync {
    /// Stable identifier for the model (e.g. `bert:snowflake-arctic-embed-m-v1.5:d768`).
    fn id(&self) -> &str;
    fn dim(&self) -> usize;
    /// Embed corpus passages.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
    /// Embed a search query. Models trained with a query instruction override this.
    fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector"))
    }
}
