use anyhow::{ensure, Result};
use arrow_array::{FixedSizeListArray, Int32Array, RecordBatch, RecordBatchIterator, RecordBatchReader, StringArray};
use indicatif::{ProgressBar, ProgressStyle};
use lancedb::Connection;
use std::path::Path;
use std::sync::Arc;

use localrag_core::traits::Embedder;
use localrag_core::types::DocumentChunk;
use crate::schema::build_arrow_schema;
use crate::table::open_db;

/// Offline corpus writer. Upserts embedded chunks by `id`, creating the table on first write,
/// so indexing the same corpus again replaces rows instead of duplicating them.
pub struct LanceDbIndexer { pub(crate) db: Connection, pub(crate) table_name: String }

impl LanceDbIndexer {
	pub async fn new(db_path: &Path, table_name: &str) -> Result<Self> {
		std::fs::create_dir_all(db_path)?;
		let db = open_db(db_path.to_string_lossy().as_ref()).await?;
		Ok(Self { db, table_name: table_name.to_string() })
	}

	/// Embed and write `chunks` in batches of `batch_size`, reporting progress.
	pub async fn index_chunks(&self, chunks: &[DocumentChunk], embedder: &dyn Embedder, batch_size: usize) -> Result<usize> {
		if chunks.is_empty() { tracing::info!("no chunks to index"); return Ok(0); }
		tracing::info!(chunks = chunks.len(), table = %self.table_name, embedder = embedder.id(), "indexing into LanceDB");
		let pb = ProgressBar::new(chunks.len() as u64);
		pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")?.progress_chars("#>-"));
		let mut processed = 0usize;
		for batch in chunks.chunks(batch_size.max(1)) {
			let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
			let embeddings = embedder.embed_batch(&texts)?;
			ensure!(embeddings.len() == batch.len(), "embedder returned {} vectors for {} texts", embeddings.len(), batch.len());
			self.insert_batch(batch, &embeddings, embedder.dim()).await?;
			processed += batch.len(); pb.set_position(processed as u64);
		}
		pb.finish_with_message("done");
		tracing::info!(processed, "LanceDB indexing completed");
		Ok(processed)
	}

	async fn insert_batch(&self, chunks: &[DocumentChunk], embeddings: &[Vec<f32>], dim: usize) -> Result<()> {
		if chunks.is_empty() { return Ok(()); }
		let record_batch = docs_to_record_batch(chunks, embeddings, dim)?; let schema = record_batch.schema();
		let reader: Box<dyn RecordBatchReader + Send> = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
		if self.db.table_names().execute().await?.contains(&self.table_name) {
			let table = self.db.open_table(&self.table_name).execute().await?;
			let mut merge = table.merge_insert(&["id"]);
			merge.when_matched_update_all(None).when_not_matched_insert_all();
			merge.execute(reader).await?;
		} else {
			self.db.create_table(&self.table_name, reader).execute().await?;
		}
		Ok(())
	}
}

fn docs_to_record_batch(chunks: &[DocumentChunk], embeddings: &[Vec<f32>], dim: usize) -> Result<RecordBatch> {
	ensure!(embeddings.iter().all(|e| e.len() == dim), "embedding dimension mismatch (expected {})", dim);
	let schema = build_arrow_schema(i32::try_from(dim)?);
	let vectors = embeddings.iter().map(|e| Some(e.iter().map(|&x| Some(x)).collect::<Vec<_>>()));
	let record_batch = RecordBatch::try_new(schema, vec![
		Arc::new(StringArray::from_iter_values(chunks.iter().map(|c| c.id.as_str()))),
		Arc::new(StringArray::from_iter_values(chunks.iter().map(|c| c.doc_id.as_str()))),
		Arc::new(StringArray::from_iter_values(chunks.iter().map(|c| c.source.as_str()))),
		Arc::new(chunks.iter().map(|c| c.title.as_deref()).collect::<StringArray>()),
		Arc::new(chunks.iter().map(|c| c.url.as_deref()).collect::<StringArray>()),
		Arc::new(StringArray::from_iter_values(chunks.iter().map(|c| c.content.as_str()))),
		Arc::new(Int32Array::from_iter_values(chunks.iter().map(|c| c.chunk_index as i32))),
		Arc::new(Int32Array::from_iter_values(chunks.iter().map(|c| c.total_chunks as i32))),
		Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(vectors, i32::try_from(dim)?)),
	])?;
	Ok(record_batch)
}
