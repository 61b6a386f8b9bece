//! Configuration loader, typed settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_EMBED__DEVICE=cpu`).
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> { Self::load_from(Path::new(".")) }

    /// Load configuration files from `dir` (missing files are skipped).
    pub fn load_from(dir: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub embed: EmbedSettings,
    pub retrieval: RetrievalSettings,
    pub search: SearchSettings,
    pub server: ServerSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let r = &self.retrieval;
        if r.default_k == 0 { return Err(Error::InvalidConfig("retrieval.default_k must be >= 1".into())); }
        if r.max_k < r.default_k { return Err(Error::InvalidConfig(format!("retrieval.max_k ({}) is below retrieval.default_k ({})", r.max_k, r.default_k))); }
        if self.embed.fake_dim == 0 { return Err(Error::InvalidConfig("embed.fake_dim must be >= 1".into())); }
        if self.embed.max_len == 0 { return Err(Error::InvalidConfig("embed.max_len must be >= 1".into())); }
        if self.store.table.trim().is_empty() { return Err(Error::InvalidConfig("store.table must not be empty".into())); }
        Ok(())
    }
}

/// Location of the persisted LanceDB store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub path: String,
    pub table: String,
}

impl Default for StoreSettings {
    fn default() -> Self { Self { path: "data/lancedb".into(), table: "wiki_chunks".into() } }
}

impl StoreSettings {
    pub fn resolved_path(&self) -> PathBuf { expand_path(&self.path) }
}

/// Compute device requested for the embedding model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    /// CUDA, then Metal, then CPU.
    #[default]
    Auto,
    Cpu,
    Cuda,
    Metal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pooling {
    #[default]
    Cls,
    Mean,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedSettings {
    pub model_dir: String,
    pub device: ComputeDevice,
    pub max_len: usize,
    pub pooling: Pooling,
    pub query_prefix: String,
    /// Use the hashing embedder instead of loading a model.
    pub fake: bool,
    pub fake_dim: usize,
    pub batch_size: usize,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            model_dir: "models/snowflake-arctic-embed-m-v1.5".into(),
            device: ComputeDevice::Auto,
            max_len: 512,
            pooling: Pooling::Cls,
            query_prefix: "Represent this sentence for searching relevant passages: ".into(),
            fake: false,
            fake_dim: 768,
            batch_size: 32,
        }
    }
}

impl EmbedSettings {
    pub fn resolved_model_dir(&self) -> PathBuf { expand_path(&self.model_dir) }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Result count when the caller omits `k`.
    pub default_k: usize,
    /// Upper bound applied to requested `k`.
    pub max_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self { Self { default_k: 3, max_k: 50 } }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_results: usize,
    pub timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { endpoint: "https://api.tavily.com/search".into(), api_key: None, max_results: 5, timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub name: String,
    pub tool_name: String,
}

impl Default for ServerSettings {
    fn default() -> Self { Self { name: "local-retrieval".into(), tool_name: "retrieve_docs".into() } }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

