use arrow_array::{Array, Float32Array, Int32Array, RecordBatch, StringArray};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase, Select};
use lancedb::{DistanceType, Table};
use std::path::Path;

use localrag_core::types::{sort_by_score, RetrievedDoc};
use localrag_core::{Error, Result};
use crate::schema::{vector_dim, RESULT_COLUMNS};
use crate::table::open_existing;

/// Read-only handle on a persisted chunk table.
///
/// Cloning is cheap and clones share the underlying dataset, so one handle
/// can serve concurrent lookups.
#[derive(Clone)]
pub struct VectorStore { table: Table, dim: usize }

impl VectorStore {
	pub async fn open(path: &Path, table_name: &str) -> Result<Self> {
		let table = open_existing(path, table_name).await?;
		let schema = table.schema().await.map_err(Error::store)?;
		let dim = vector_dim(&schema)
			.ok_or_else(|| Error::StoreUnavailable(format!("table '{}' has no fixed-size '{}' column", table_name, crate::schema::VECTOR_COLUMN)))?;
		tracing::info!(path = %path.display(), table = table_name, dim, "vector store opened");
		Ok(Self { table, dim })
	}

	pub fn dim(&self) -> usize { self.dim }

	pub async fn count(&self) -> Result<usize> { self.table.count_rows(None).await.map_err(Error::store) }

	/// Exact cosine nearest neighbours of `query_vec`, best first, at most `k`.
	pub async fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<RetrievedDoc>> {
		if k == 0 { return Ok(Vec::new()); }
		if query_vec.len() != self.dim {
			return Err(Error::Operation(format!("query vector has {} dims, store expects {}", query_vec.len(), self.dim)));
		}
		if self.count().await? == 0 { return Ok(Vec::new()); }

		let mut stream = self.table
			.vector_search(query_vec.to_vec()).map_err(Error::store)?
			.distance_type(DistanceType::Cosine)
			.select(Select::columns(&RESULT_COLUMNS))
			.limit(k)
			.execute().await.map_err(Error::store)?;
		let mut docs = Vec::new();
		while let Some(batch) = stream.try_next().await.map_err(Error::store)? {
			docs.extend(batch_to_docs(&batch)?);
		}
		sort_by_score(&mut docs);
		docs.truncate(k);
		Ok(docs)
	}
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
	batch.column_by_name(name)
		.and_then(|c| c.as_any().downcast_ref::<T>())
		.ok_or_else(|| Error::StoreUnavailable(format!("column '{}' missing or mistyped", name)))
}

fn optional(col: &StringArray, i: usize) -> Option<String> {
	if col.is_null(i) { None } else { Some(col.value(i).to_string()) }
}

fn batch_to_docs(batch: &RecordBatch) -> Result<Vec<RetrievedDoc>> {
	let ids = column::<StringArray>(batch, "id")?;
	let sources = column::<StringArray>(batch, "source")?;
	let titles = column::<StringArray>(batch, "title")?;
	let urls = column::<StringArray>(batch, "url")?;
	let contents = column::<StringArray>(batch, "content")?;
	let chunk_indices = column::<Int32Array>(batch, "chunk_index")?;
	let distances = column::<Float32Array>(batch, "_distance")?;
	Ok((0..batch.num_rows()).map(|i| RetrievedDoc {
		id: ids.value(i).to_string(),
		content: contents.value(i).to_string(),
		title: optional(titles, i),
		url: optional(urls, i),
		source: sources.value(i).to_string(),
		chunk_index: chunk_indices.value(i).max(0) as usize,
		score: 1.0 - distances.value(i),
	}).collect())
}
