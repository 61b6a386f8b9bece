//! LanceDB-backed chunk store.
//!
//! The offline writer (`LanceDbIndexer`) builds a table of chunks plus their
//! vectors; the read side (`VectorStore`) opens it without modification and
//! answers exact cosine nearest-neighbour lookups.
pub mod schema;
pub mod search;
pub mod table;
pub mod writer;

pub use search::VectorStore;
pub use writer::LanceDbIndexer;
