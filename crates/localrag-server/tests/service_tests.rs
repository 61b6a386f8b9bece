mod common;

use std::sync::Arc;

use localrag_core::config::{RetrievalSettings, Settings};
use localrag_embed::HashEmbedder;
use localrag_server::RetrievalService;
use localrag_vector::schema::build_arrow_schema;
use localrag_vector::table::open_db;
use localrag_vector::VectorStore;

#[tokio::test]
async fn capital_of_france_ranks_paris_first() {
    let (_tmp, service) = common::service(50).await;
    let docs = service.retrieve("capital of France", Some(2)).await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].id, "Paris:0");
    assert!(docs[0].content.contains("Paris"));
    assert_eq!(docs[0].url.as_deref(), Some("https://en.wikipedia.org/wiki/Paris"));
    assert!(docs[0].score > docs[1].score);
}

#[tokio::test]
async fn default_k_applies_when_omitted() {
    let (_tmp, service) = common::service(50).await;
    assert_eq!(service.retrieve("capital", None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn length_is_min_of_k_and_available() {
    let (_tmp, service) = common::service(50).await;
    let docs = service.retrieve("capital", Some(20)).await.unwrap();
    assert_eq!(docs.len(), common::corpus().len());
    for pair in docs.windows(2) { assert!(pair[0].score >= pair[1].score); }
}

#[tokio::test]
async fn k_is_clamped_to_max_k() {
    let (_tmp, service) = common::service(2).await;
    assert_eq!(service.retrieve("capital", Some(10)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn empty_query_and_zero_k_are_invalid_input() {
    let (_tmp, service) = common::service(50).await;
    assert_eq!(service.retrieve("   ", None).await.unwrap_err().kind(), "invalid_input");
    assert_eq!(service.retrieve("capital", Some(0)).await.unwrap_err().kind(), "invalid_input");
}

#[tokio::test]
async fn repeated_queries_are_identical() {
    let (_tmp, service) = common::service(50).await;
    let a = service.retrieve("capital of France", Some(3)).await.unwrap();
    let b = service.retrieve("  capital of France ", Some(3)).await.unwrap();
    assert_eq!(a, b);
    let ids: Vec<&str> = a.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["Paris:0", "Tokyo:0", "Seine:0"]);
}

#[tokio::test]
async fn concurrent_retrievals_share_one_service() {
    let (_tmp, service) = common::service(50).await;
    let service = Arc::new(service);
    let handles: Vec<_> = ["capital of France", "capital of Japan", "columnar vectors", "systems language"]
        .into_iter()
        .map(|q| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.retrieve(q, Some(1)).await })
        })
        .collect();
    let mut top = Vec::new();
    for h in handles { top.push(h.await.unwrap().unwrap().remove(0).id); }
    assert_eq!(top, ["Paris:0", "Tokyo:0", "Lance:0", "Rust:0"]);
}

#[tokio::test]
async fn empty_table_returns_no_results() {
    let tmp = tempfile::TempDir::new().unwrap();
    let db = open_db(tmp.path().to_string_lossy().as_ref()).await.unwrap();
    db.create_empty_table(common::TABLE, build_arrow_schema(common::DIM as i32)).execute().await.unwrap();
    let store = VectorStore::open(tmp.path(), common::TABLE).await.unwrap();
    let service = RetrievalService::new(store, Arc::new(HashEmbedder::new(common::DIM)), RetrievalSettings::default()).unwrap();
    assert!(service.retrieve("capital of France", None).await.unwrap().is_empty());
    assert!(service.retrieve("capital of France", Some(5)).await.unwrap().is_empty());
}

#[tokio::test]
async fn dimension_mismatch_is_a_config_error() {
    let (tmp, _service) = common::service(50).await;
    let store = VectorStore::open(tmp.path(), common::TABLE).await.unwrap();
    let err = RetrievalService::new(store, Arc::new(HashEmbedder::new(64)), RetrievalSettings::default()).err().unwrap();
    assert_eq!(err.kind(), "invalid_config");
}

#[tokio::test]
async fn open_from_settings_with_fake_embedder() {
    let (tmp, _service) = common::service(50).await;
    let mut settings = Settings::default();
    settings.store.path = tmp.path().to_string_lossy().into_owned();
    settings.embed.fake = true;
    settings.embed.fake_dim = common::DIM;
    let service = RetrievalService::open(&settings).await.unwrap();
    assert_eq!(service.retrieve("capital of Japan", Some(1)).await.unwrap()[0].id, "Tokyo:0");
}

#[tokio::test]
async fn missing_store_fails_to_open() {
    let tmp = tempfile::TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.store.path = tmp.path().join("absent").to_string_lossy().into_owned();
    settings.embed.fake = true;
    let err = RetrievalService::open(&settings).await.err().unwrap();
    assert_eq!(err.kind(), "store_unavailable");
    assert!(!tmp.path().join("absent").exists());
}
