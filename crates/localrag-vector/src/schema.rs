use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

pub const VECTOR_COLUMN: &str = "vector";

/// Columns returned by a lookup. The vector itself stays on disk.
pub const RESULT_COLUMNS: [&str; 6] = ["id", "source", "title", "url", "content", "chunk_index"];

pub fn build_arrow_schema(dim: i32) -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new("id", DataType::Utf8, false),
		Field::new("doc_id", DataType::Utf8, false),
		Field::new("source", DataType::Utf8, false),
		Field::new("title", DataType::Utf8, true),
		Field::new("url", DataType::Utf8, true),
		Field::new("content", DataType::Utf8, false),
		Field::new("chunk_index", DataType::Int32, false),
		Field::new("total_chunks", DataType::Int32, false),
		Field::new(VECTOR_COLUMN, DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim), true),
	]))
}

/// Dimension of the stored vectors, if the table has a fixed-size vector column.
pub fn vector_dim(schema: &Schema) -> Option<usize> {
	match schema.field_with_name(VECTOR_COLUMN).ok()?.data_type() {
		DataType::FixedSizeList(_, n) if *n > 0 => Some(*n as usize),
		_ => None,
	}
}
