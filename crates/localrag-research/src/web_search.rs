use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use localrag_core::config::SearchSettings;
use localrag_core::{Error, Result};

pub const API_KEY_ENV: &str = "TAVILY_API_KEY";

/// One web search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResult {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<WebResult>,
}

/// Client for the Tavily search API.
#[derive(Clone)]
pub struct WebSearch {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    max_results: usize,
}

impl WebSearch {
    /// The API key comes from `search.api_key`, else from `TAVILY_API_KEY`.
    /// A missing key is only reported when a search is attempted.
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(Error::provider)?;
        let api_key = non_empty(settings.api_key.clone()).or_else(|| non_empty(std::env::var(API_KEY_ENV).ok()));
        Ok(Self { client, endpoint: settings.endpoint.clone(), api_key, max_results: settings.max_results.max(1) })
    }

    pub fn has_credentials(&self) -> bool { self.api_key.is_some() }

    pub async fn search(&self, query: &str) -> Result<Vec<WebResult>> {
        let query = query.trim();
        if query.is_empty() { return Err(Error::InvalidInput("web search query must not be empty".into())); }
        let api_key = self.api_key.as_deref()
            .ok_or_else(|| Error::Provider(format!("no web search API key configured (set search.api_key or {})", API_KEY_ENV)))?;

        tracing::info!(query, endpoint = %self.endpoint, "web search");
        let response = self.client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&json!({ "query": query, "max_results": self.max_results }))
            .send()
            .await
            .map_err(Error::provider)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!("web search failed with {}: {}", status, body.trim())));
        }
        let body = response.text().await.map_err(Error::provider)?;
        let results = parse_response(&body)?;
        tracing::debug!(count = results.len(), "web search results");
        Ok(results)
    }
}

fn non_empty(value: Option<String>) -> Option<String> { value.filter(|v| !v.trim().is_empty()) }

/// Decode a provider response: entries without a url are dropped, duplicate
/// urls keep their best-scored entry, and results come back best first.
pub fn parse_response(body: &str) -> Result<Vec<WebResult>> {
    let parsed: SearchResponse = serde_json::from_str(body).map_err(|e| Error::Provider(format!("unreadable web search response: {}", e)))?;
    let mut results: Vec<WebResult> = parsed.results.into_iter().filter(|r| !r.url.trim().is_empty()).collect();
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    let mut seen = HashSet::new();
    results.retain(|r| seen.insert(r.url.clone()));
    Ok(results)
}

/// Numbered plain-text rendering handed back to the model.
pub fn format_results(results: &[WebResult]) -> String {
    if results.is_empty() { return "No web search results found.".to_string(); }
    let mut out = String::from("Search results:\n");
    for (i, r) in results.iter().enumerate() {
        let title = if r.title.trim().is_empty() { r.url.as_str() } else { r.title.trim() };
        out.push_str(&format!("\n--- SOURCE {}: {} ---\nURL: {}\n\n{}\n", i + 1, title, r.url, r.content.trim()));
    }
    out
}
