mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Assistant, Cache, CompletionProviderConfig, Config, DocumentProviderConfig, Postgres,
	Providers, RateLimit, Search, Service, Storage, Worker,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
		("providers.completion.api_base", &cfg.providers.completion.api_base),
		("providers.completion.model", &cfg.providers.completion.model),
		("providers.documents.api_base", &cfg.providers.documents.api_base),
		("providers.documents.folder_id", &cfg.providers.documents.folder_id),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	for (label, key) in [
		("completion", &cfg.providers.completion.api_key),
		("documents", &cfg.providers.documents.access_token),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} credential must be non-empty."),
			});
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.cache.dir.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "storage.cache.dir must be non-empty.".to_string(),
		});
	}
	if cfg.storage.cache.ttl_hours == 0 {
		return Err(Error::Validation {
			message: "storage.cache.ttl_hours must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.cache.sweep_interval_secs == 0 {
		return Err(Error::Validation {
			message: "storage.cache.sweep_interval_secs must be greater than zero.".to_string(),
		});
	}

	let temperature = cfg.providers.completion.temperature;

	if !temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.completion.temperature must be a finite number.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&temperature) {
		return Err(Error::Validation {
			message: "providers.completion.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if cfg.providers.completion.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.completion.max_tokens must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.documents.page_size == 0 {
		return Err(Error::Validation {
			message: "providers.documents.page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.rate_limit.quota == 0 {
		return Err(Error::Validation {
			message: "rate_limit.quota must be greater than zero.".to_string(),
		});
	}
	if cfg.rate_limit.window_secs == 0 {
		return Err(Error::Validation {
			message: "rate_limit.window_secs must be greater than zero.".to_string(),
		});
	}

	let threshold = cfg.search.similarity_threshold;

	if !threshold.is_finite() {
		return Err(Error::Validation {
			message: "search.similarity_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&threshold) {
		return Err(Error::Validation {
			message: "search.similarity_threshold must be in the range 0.0-1.0.".to_string(),
		});
	}

	for (label, value) in [
		("search.solution_limit", cfg.search.solution_limit),
		("search.documents_limit", cfg.search.documents_limit),
		("search.excerpt_chars", cfg.search.excerpt_chars),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.assistant.system_prompt.as_deref().map(|prompt| prompt.trim().is_empty()).unwrap_or(false)
	{
		cfg.assistant.system_prompt = None;
	}

	let api_base = &mut cfg.providers.documents.api_base;

	while api_base.ends_with('/') {
		api_base.pop();
	}
}
