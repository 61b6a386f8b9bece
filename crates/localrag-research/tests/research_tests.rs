use std::collections::HashSet;

use localrag_core::config::SearchSettings;
use localrag_research::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one HTTP exchange with a canned response; returns the endpoint url
/// and a handle yielding the raw request.
async fn one_shot_server(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 { break; }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap()))
                    .unwrap_or(0);
                if request.len() >= head_end + 4 + content_length { break; }
            }
        }
        let response = format!("HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}", status, body.len(), body);
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).to_string()
    });
    (format!("http://{}/search", addr), handle)
}

fn settings(endpoint: String) -> SearchSettings {
    SearchSettings { endpoint, api_key: Some("test-key".into()), max_results: 2, timeout_secs: 5 }
}

#[tokio::test]
async fn search_posts_query_and_parses_results() {
    let body = r#"{"results": [{"title": "Tokyo", "url": "https://t.example", "content": "Tokyo is the capital of Japan.", "score": 0.3},
                                {"title": "Paris", "url": "https://p.example", "content": "Paris is the capital of France.", "score": 0.8}]}"#;
    let (endpoint, server) = one_shot_server("200 OK", body).await;
    let search = WebSearch::new(&settings(endpoint)).unwrap();
    let results = search.search("  capital of France ").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Paris");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /search"));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer test-key"));
    assert!(request.contains(r#""query":"capital of France""#));
    assert!(request.contains(r#""max_results":2"#));
}

#[tokio::test]
async fn upstream_failure_is_provider_error() {
    let (endpoint, server) = one_shot_server("401 Unauthorized", r#"{"detail": "invalid key"}"#).await;
    let search = WebSearch::new(&settings(endpoint)).unwrap();
    let err = search.search("anything").await.unwrap_err();
    assert_eq!(err.kind(), "provider_error");
    assert!(err.to_string().contains("401"));
    server.await.unwrap();
}

#[tokio::test]
async fn missing_key_is_provider_error() {
    if std::env::var(API_KEY_ENV).is_ok_and(|k| !k.trim().is_empty()) { return; }
    let settings = SearchSettings { api_key: Some("  ".into()), ..settings("http://127.0.0.1:9/search".into()) };
    let search = WebSearch::new(&settings).unwrap();
    assert!(!search.has_credentials());
    assert_eq!(search.search("q").await.unwrap_err().kind(), "provider_error");
}

#[tokio::test]
async fn empty_query_is_rejected_before_any_request() {
    let search = WebSearch::new(&settings("http://127.0.0.1:9/search".into())).unwrap();
    assert_eq!(search.search("   ").await.unwrap_err().kind(), "invalid_input");
}

#[test]
fn signals_serialize_tagged() {
    let started = mark_research_started("Rust async runtimes");
    assert_eq!(serde_json::to_value(&started).unwrap(), serde_json::json!({"signal": "started", "topic": "Rust async runtimes"}));
    assert!(!started.is_complete());

    let done = mark_research_complete("Tokio dominates.");
    assert!(done.is_complete());
    let back: ResearchSignal = serde_json::from_value(serde_json::json!({"signal": "complete", "summary": "Tokio dominates."})).unwrap();
    assert_eq!(back, done);
}

#[test]
fn think_always_acknowledges() {
    assert!(think("compare the two sources").contains("compare the two sources"));
}

#[test]
fn tool_specs_are_unique_and_typed() {
    let specs = tool_specs();
    let names: HashSet<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names.len(), specs.len());
    for name in ["web_search", "think_tool", "conduct_research", "research_complete"] {
        assert!(names.contains(name), "missing {}", name);
    }
    let web = specs.iter().find(|s| s.name == "web_search").unwrap();
    assert_eq!(web.parameters["type"], "object");
    assert!(web.parameters["properties"]["query"].is_object());
    assert_eq!(web.parameters["required"], serde_json::json!(["query"]));
}
