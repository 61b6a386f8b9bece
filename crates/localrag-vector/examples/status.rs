use std::path::PathBuf;
use localrag_vector::VectorStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let db_path = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data/lancedb"));
    let table = args.next().unwrap_or_else(|| "wiki_chunks".to_string());
    let store = VectorStore::open(&db_path, &table).await?;
    println!("{}: rows={} dim={}", table, store.count().await?, store.dim());
    Ok(())
}
