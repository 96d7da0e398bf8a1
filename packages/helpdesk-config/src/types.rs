use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub rate_limit: RateLimit,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub assistant: Assistant,
	#[serde(default)]
	pub worker: Worker,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub cache: Cache,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Cache {
	pub dir: PathBuf,
	#[serde(default = "default_cache_ttl_hours")]
	pub ttl_hours: u64,
	#[serde(default = "default_sweep_interval_secs")]
	pub sweep_interval_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub completion: CompletionProviderConfig,
	pub documents: DocumentProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct CompletionProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	#[serde(default = "default_temperature")]
	pub temperature: f32,
	#[serde(default = "default_max_tokens")]
	pub max_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// A folder-scoped document collection, e.g. a Google Drive folder.
#[derive(Debug, Deserialize)]
pub struct DocumentProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub access_token: String,
	pub folder_id: String,
	#[serde(default = "default_page_size")]
	pub page_size: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RateLimit {
	pub quota: u32,
	pub window_secs: u64,
	/// Longest total delay a caller accepts before the call is reported as rate limited.
	pub max_wait_secs: u64,
}
impl Default for RateLimit {
	fn default() -> Self {
		Self { quota: 30, window_secs: 60, max_wait_secs: 60 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub similarity_threshold: f64,
	pub solution_limit: u32,
	pub documents_limit: u32,
	pub excerpt_chars: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { similarity_threshold: 0.5, solution_limit: 5, documents_limit: 3, excerpt_chars: 500 }
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Assistant {
	/// Optional. Replaces the built-in system prompt sent with every completion.
	pub system_prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Worker {
	pub refresh_documents: bool,
}

fn default_cache_ttl_hours() -> u64 {
	24
}

fn default_sweep_interval_secs() -> u64 {
	3_600
}

fn default_temperature() -> f32 {
	0.7
}

fn default_max_tokens() -> u32 {
	500
}

fn default_page_size() -> u32 {
	100
}
