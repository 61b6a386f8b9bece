//! The retrieval tool: an explicitly owned `RetrievalService` over the
//! persisted store, exposed as a single MCP tool over stdio.
pub mod server;
pub mod service;
pub mod tools;

pub use server::McpServer;
pub use service::RetrievalService;
