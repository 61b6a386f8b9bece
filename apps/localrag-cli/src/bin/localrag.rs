use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use localrag_core::config::{Config, Settings};
use localrag_core::data_processor::DataProcessor;
use localrag_embed::load_embedder;
use localrag_research::{format_results, tool_specs, WebSearch, API_KEY_ENV};
use localrag_server::{tools::retrieve_tool, RetrievalService};
use localrag_vector::LanceDbIndexer;

#[derive(Debug, Parser)]
#[command(name = "localrag", version, about = "Local document retrieval for research agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Chunk, embed and store a directory of .txt / .jsonl documents.
    Index {
        data_dir: PathBuf,
        /// Delete the existing store before indexing. Without it, chunks are upserted by id.
        #[arg(long)]
        fresh: bool,
        /// Index at most this many files.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Query the local store.
    Query {
        text: String,
        #[arg(short, long)]
        k: Option<usize>,
    },
    /// Run a web search through the configured provider.
    WebSearch { text: String },
    /// Print the tool descriptors as JSON.
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    localrag_core::logging::init();
    let settings = Config::load().context("loading configuration")?.settings()?;
    match cli.command {
        Command::Index { data_dir, fresh, limit } => index(&settings, &data_dir, fresh, limit).await,
        Command::Query { text, k } => query(&settings, &text, k).await,
        Command::WebSearch { text } => web_search(&settings, &text).await,
        Command::Tools => tools(&settings),
    }
}

async fn index(settings: &Settings, data_dir: &Path, fresh: bool, limit: Option<usize>) -> anyhow::Result<()> {
    let processor = DataProcessor::new();
    let chunks = match limit {
        Some(limit) => processor.process_directory_limited(data_dir, limit)?,
        None => processor.process_directory(data_dir)?,
    };
    if chunks.is_empty() {
        println!("No documents found in {}", data_dir.display());
        return Ok(());
    }

    let store_path = settings.store.resolved_path();
    if fresh && store_path.exists() {
        tracing::info!(path = %store_path.display(), "removing existing store");
        std::fs::remove_dir_all(&store_path).with_context(|| format!("removing {}", store_path.display()))?;
    }
    let embedder = load_embedder(&settings.embed)?;
    let indexer = LanceDbIndexer::new(&store_path, &settings.store.table).await?;
    let written = indexer.index_chunks(&chunks, embedder.as_ref(), settings.embed.batch_size).await?;
    println!("Indexed {} chunks into {} (table '{}')", written, store_path.display(), settings.store.table);
    Ok(())
}

async fn query(settings: &Settings, text: &str, k: Option<usize>) -> anyhow::Result<()> {
    let service = RetrievalService::open(settings).await?;
    let docs = service.retrieve(text, k).await?;
    if docs.is_empty() {
        println!("No results.");
    }
    for (i, doc) in docs.iter().enumerate() {
        println!("{}. [{:.4}] {} ({})", i + 1, doc.score, doc.title.as_deref().unwrap_or(&doc.id), doc.url.as_deref().unwrap_or(&doc.source));
        println!("   {}", doc.content.replace('\n', " "));
    }
    Ok(())
}

async fn web_search(settings: &Settings, text: &str) -> anyhow::Result<()> {
    let search = WebSearch::new(&settings.search)?;
    if !search.has_credentials() {
        anyhow::bail!("web search needs an API key: set search.api_key in config.toml or export {}", API_KEY_ENV);
    }
    let results = search.search(text).await?;
    println!("{}", format_results(&results));
    Ok(())
}

fn tools(settings: &Settings) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "mcp": [retrieve_tool(&settings.server.tool_name)],
        "research": tool_specs(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
