//! Stdio MCP server exposing the local retrieval tool. Launched by an agent
//! as a subprocess; stdout carries protocol messages only.
use std::sync::Arc;

use anyhow::Context;
use localrag_core::config::Config;
use localrag_server::{McpServer, RetrievalService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    localrag_core::logging::init();
    let settings = Config::load().context("loading configuration")?.settings()?;
    let service = RetrievalService::open(&settings).await.context("starting retrieval service")?;
    McpServer::new(Arc::new(service), settings.server.clone()).serve_stdio().await?;
    tracing::info!("exiting");
    Ok(())
}
