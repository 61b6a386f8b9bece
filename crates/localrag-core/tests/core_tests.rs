use std::fs;
use std::io::Write;
use tempfile::TempDir;

use localrag_core::config::{ComputeDevice, Config, Pooling, Settings};
use localrag_core::data_processor::{ChunkingConfig, DataProcessor};
use localrag_core::Error;

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let processor = DataProcessor::new();
    let chunks = processor.process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 1, "one small paragraph becomes one chunk");
    assert_eq!(chunks[0].content.trim(), "Short text");
    assert_eq!(chunks[0].title.as_deref(), Some("a"));
    assert_eq!(chunks[0].id, "a:0");
}

#[test]
fn process_directory_limited_two_files_limit_one() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "alpha bravo").unwrap();
    fs::write(dir.join("b.txt"), "charlie delta").unwrap();

    let processor = DataProcessor::new();
    let chunks = processor
        .process_directory_limited(dir, 1)
        .expect("process limited");

    let mut doc_ids = std::collections::HashSet::new();
    for c in &chunks { doc_ids.insert(c.doc_id.clone()); }
    assert_eq!(doc_ids.len(), 1, "limited to one source document");
}

#[test]
fn same_named_files_in_subdirectories_get_distinct_ids() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("a")).unwrap();
    fs::create_dir_all(tmp.path().join("b")).unwrap();
    fs::write(tmp.path().join("a/notes.txt"), "alpha notes").unwrap();
    fs::write(tmp.path().join("b/notes.txt"), "bravo notes").unwrap();
    fs::write(tmp.path().join("b/wiki.jsonl"), r#"{"content": "charlie"}"#).unwrap();

    let chunks = DataProcessor::new().process_directory(tmp.path()).expect("process");
    let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["a/notes:0", "b/notes:0", "b/wiki-0:0"]);
    assert_eq!(chunks[0].title.as_deref(), Some("notes"));
}

#[test]
fn jsonl_records_carry_citation_metadata() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("wiki.jsonl"),
        concat!(
            r#"{"title": "Paris", "url": "https://en.wikipedia.org/wiki/Paris", "content": "Paris is the capital of France."}"#, "\n",
            "\n",
            r#"{"title": "Tokyo", "text": "Tokyo is the capital of Japan.\n\nIt is on Honshu."}"#, "\n",
        ),
    )
    .unwrap();

    let chunks = DataProcessor::new().process_directory(tmp.path()).expect("process");
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].url.as_deref(), Some("https://en.wikipedia.org/wiki/Paris"));
    assert_eq!(chunks[0].doc_id, "wiki-0");
    assert!(chunks[1].url.is_none());
    assert_eq!(chunks[1].doc_id, "wiki-2");
    assert_eq!((chunks[2].chunk_index, chunks[2].total_chunks), (1, 2));
}

#[test]
fn malformed_jsonl_line_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bad.jsonl"), "{not json}\n").unwrap();
    let err = DataProcessor::new().process_directory(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("bad.jsonl:1"));
}

#[test]
fn long_paragraph_splits_with_overlap() {
    let tmp = TempDir::new().unwrap();
    let words: Vec<String> = (0..25).map(|i| format!("w{i}")).collect();
    fs::write(tmp.path().join("long.txt"), words.join(" ")).unwrap();

    let processor = DataProcessor::with_config(ChunkingConfig { max_tokens: 5, words_per_chunk: 10, overlap_percent: 0.2 });
    let chunks = processor.process_directory(tmp.path()).unwrap();
    assert_eq!(chunks.len(), 3);
    assert!(chunks[0].content.ends_with("w9"));
    assert!(chunks[1].content.starts_with("w8"), "two words of overlap");
    assert!(chunks.iter().all(|c| c.total_chunks == 3));
}

#[test]
fn config_defaults_when_no_files_present() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_from(tmp.path()).expect("load");
    let settings = config.settings().unwrap();
    assert_eq!(settings.retrieval.default_k, 3);
    assert_eq!(settings.embed.pooling, Pooling::Cls);
    assert_eq!(settings.server.tool_name, "retrieve_docs");
}

#[test]
fn config_file_overrides_defaults() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[store]\npath = \"/srv/index\"\ntable = \"docs\"\n\n[embed]\ndevice = \"cpu\"\nfake = true\n\n[retrieval]\ndefault_k = 4\n",
    )
    .unwrap();
    let config = Config::load_from(tmp.path()).expect("load");
    let settings = config.settings().unwrap();
    assert_eq!(settings.store.table, "docs");
    assert_eq!(settings.embed.device, ComputeDevice::Cpu);
    assert!(settings.embed.fake);
    assert_eq!(settings.retrieval.default_k, 4);
}

#[test]
fn config_rejects_zero_default_k() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[retrieval]\ndefault_k = 0\n").unwrap();
    match Config::load_from(tmp.path()) {
        Err(Error::InvalidConfig(msg)) => assert!(msg.contains("default_k")),
        other => panic!("expected InvalidConfig, got {:?}", other.err()),
    }
}

#[test]
fn config_rejects_unknown_device() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[embed]\ndevice = \"tpu\"\n").unwrap();
    assert!(matches!(Config::load_from(tmp.path()), Err(Error::InvalidConfig(_))));
}

#[test]
fn settings_validate_max_k_bound() {
    let mut settings = Settings::default();
    settings.retrieval.max_k = 1;
    assert_eq!(settings.validate().unwrap_err().kind(), "invalid_config");
}
