//! Offline corpus chunking used to build the store.
//!
//! `.txt` files become one document each (title = file stem). `.jsonl` files
//! hold one document per line: `{"content"|"text": ..., "title"?: ..., "url"?: ...}`.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::DocumentChunk;

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub max_tokens: usize,
    pub words_per_chunk: usize,
    pub overlap_percent: f32,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_tokens: 500, words_per_chunk: 300, overlap_percent: 0.2 }
    }
}

#[derive(Debug, Deserialize)]
struct JsonlRecord {
    #[serde(alias = "text")]
    content: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

struct SourceDoc {
    doc_id: String,
    source: String,
    title: Option<String>,
    url: Option<String>,
    content: String,
}

#[derive(Default)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(chunking_config: ChunkingConfig) -> Self { Self { chunking_config } }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<DocumentChunk>> {
        self.process_files(data_dir, self.list_corpus_files(data_dir))
    }

    pub fn process_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<Vec<DocumentChunk>> {
        let mut files = self.list_corpus_files(data_dir);
        if files.len() > limit { files.truncate(limit); tracing::info!(limit, "limited corpus files"); }
        self.process_files(data_dir, files)
    }

    fn process_files(&self, data_dir: &Path, files: Vec<PathBuf>) -> Result<Vec<DocumentChunk>> {
        if files.is_empty() {
            tracing::warn!(dir = %data_dir.display(), "no .txt or .jsonl files found");
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            tracing::debug!(file = %file_path.display(), "processing {}/{}", file_index + 1, files.len());
            for doc in self.read_documents(data_dir, file_path)? {
                all_chunks.extend(self.chunk_document(&doc));
            }
        }
        tracing::info!(files = files.len(), chunks = all_chunks.len(), "corpus chunked");
        Ok(all_chunks)
    }

    fn read_documents(&self, data_dir: &Path, file_path: &Path) -> Result<Vec<SourceDoc>> {
        let content = read_file_content(file_path)?;
        let source = file_path.to_string_lossy().to_string();
        let stem = file_path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_else(|| source.clone());
        let file_id = relative_doc_id(data_dir, file_path);
        if file_path.extension().and_then(|s| s.to_str()) != Some("jsonl") {
            return Ok(vec![SourceDoc { doc_id: file_id, source, title: Some(stem), url: None, content }]);
        }
        let mut docs = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() { continue; }
            let record: JsonlRecord = serde_json::from_str(line)
                .with_context(|| format!("{}:{} is not a corpus record", file_path.display(), line_no + 1))?;
            let doc_id = record.id.unwrap_or_else(|| format!("{}-{}", file_id, line_no));
            docs.push(SourceDoc { doc_id, source: source.clone(), title: record.title, url: record.url, content: record.content });
        }
        Ok(docs)
    }

    fn chunk_document(&self, doc: &SourceDoc) -> Vec<DocumentChunk> {
        let mut pieces = Vec::new();
        for paragraph in doc.content.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() { continue; }
            if self.count_tokens(paragraph) <= self.chunking_config.max_tokens {
                pieces.push(paragraph.to_string());
            } else {
                pieces.extend(self.split_paragraph_with_overlap(paragraph));
            }
        }
        let total_chunks = pieces.len();
        pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| DocumentChunk {
                id: format!("{}:{}", doc.doc_id, chunk_index),
                doc_id: doc.doc_id.clone(),
                source: doc.source.clone(),
                title: doc.title.clone(),
                url: doc.url.clone(),
                content,
                chunk_index,
                total_chunks,
            })
            .collect()
    }

    // Rough subword estimate: ~0.75 words per token.
    fn count_tokens(&self, text: &str) -> usize { let word_count = text.split_whitespace().count(); (word_count as f32 / 0.75) as usize }

    fn split_paragraph_with_overlap(&self, paragraph: &str) -> Vec<String> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        let words_per_chunk = self.chunking_config.words_per_chunk.max(1);
        let overlap_words = ((words_per_chunk as f32 * self.chunking_config.overlap_percent) as usize).min(words_per_chunk - 1);
        let mut chunks = Vec::new(); let mut start = 0;
        while start < words.len() {
            let end = (start + words_per_chunk).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end >= words.len() { break; }
            start = end - overlap_words;
        }
        chunks
    }

    fn list_corpus_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|p| matches!(p.extension().and_then(|s| s.to_str()), Some("txt") | Some("jsonl")))
            .collect();
        files.sort();
        files
    }
}

/// Path of `file_path` under `data_dir` without its extension, `/`-separated,
/// so same-named files in different subdirectories stay distinct.
fn relative_doc_id(data_dir: &Path, file_path: &Path) -> String {
    let relative = file_path.strip_prefix(data_dir).unwrap_or(file_path).with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .filter(|c| !c.is_empty() && c != "/")
        .collect::<Vec<_>>()
        .join("/")
}

fn read_file_content(file_path: &Path) -> Result<String> {
    match fs::read_to_string(file_path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path).with_context(|| format!("reading {}", file_path.display()))?).to_string()),
    }
}
