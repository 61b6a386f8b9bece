//! Error taxonomy shared by the retrieval, schema and research crates.
//!
//! Configuration problems surface at startup, provider failures surface as a
//! failed tool call, lookup failures surface as a failed retrieval.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Schema violation: {0}")]
    Schema(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Stable identifier for the variant, used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidConfig(_) => "invalid_config",
            Error::InvalidInput(_) => "invalid_input",
            Error::StoreUnavailable(_) => "store_unavailable",
            Error::EmbeddingUnavailable(_) => "embedding_unavailable",
            Error::Provider(_) => "provider_error",
            Error::Schema(_) => "schema_violation",
            Error::Operation(_) => "operation_failed",
        }
    }

    pub fn store<E: std::fmt::Display>(err: E) -> Self { Error::StoreUnavailable(err.to_string()) }

    pub fn embedding<E: std::fmt::Display>(err: E) -> Self { Error::EmbeddingUnavailable(err.to_string()) }

    pub fn provider<E: std::fmt::Display>(err: E) -> Self { Error::Provider(err.to_string()) }
}

pub type Result<T> = std::result::Result<T, Error>;
