//! LanceDB connection helpers.
//!
//! `open_db` is used by the offline writer and creates the directory on demand.
//! `open_existing` is the read path: it never creates anything and reports a
//! missing directory or table as `StoreUnavailable`.
use lancedb::{connect, Connection, Table};
use std::path::Path;

use localrag_core::{Error, Result};

pub async fn open_db(uri: &str) -> anyhow::Result<Connection> {
    Ok(connect(uri).execute().await?)
}

pub async fn open_existing(path: &Path, table: &str) -> Result<Table> {
    if !path.is_dir() {
        return Err(Error::StoreUnavailable(format!("store directory {} does not exist", path.display())));
    }
    let conn = connect(path.to_string_lossy().as_ref()).execute().await.map_err(Error::store)?;
    let names = conn.table_names().execute().await.map_err(Error::store)?;
    if !names.iter().any(|n| n == table) {
        return Err(Error::StoreUnavailable(format!("table '{}' not found in {} (available: [{}])", table, path.display(), names.join(", "))));
    }
    conn.open_table(table).execute().await.map_err(Error::store)
}
