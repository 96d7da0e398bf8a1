pub mod analysis;
pub mod answer;
pub mod documents;
pub mod feedback;
pub mod rate_limit;
pub mod solutions;

mod error;

pub use answer::{AnswerRequest, AnswerResponse, DEFAULT_SYSTEM_PROMPT};
pub use documents::{DocumentMatch, RefreshReport};
pub use error::{Error, ErrorKind, Result};
pub use feedback::{FeedbackRequest, SolutionStats};
pub use rate_limit::RateLimiter;
pub use solutions::{AddSolutionRequest, SimilarSolution};

use std::{future::Future, pin::Pin, sync::Arc};

use helpdesk_config::{CompletionProviderConfig, Config, DocumentProviderConfig};
use helpdesk_providers::{completion, documents::DocumentRef};
use helpdesk_storage::{content_cache::ContentCache, db::Db};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a CompletionProviderConfig,
		system_prompt: &'a str,
		user_prompt: &'a str,
	) -> BoxFuture<'a, helpdesk_providers::Result<String>>;
}

pub trait DocumentProvider
where
	Self: Send + Sync,
{
	/// Every document in the configured collection, across all pages.
	fn list_documents<'a>(
		&'a self,
		cfg: &'a DocumentProviderConfig,
	) -> BoxFuture<'a, helpdesk_providers::Result<Vec<DocumentRef>>>;

	fn get_document<'a>(
		&'a self,
		cfg: &'a DocumentProviderConfig,
		id: &'a str,
	) -> BoxFuture<'a, helpdesk_providers::Result<DocumentRef>>;

	fn get_content<'a>(
		&'a self,
		cfg: &'a DocumentProviderConfig,
		id: &'a str,
	) -> BoxFuture<'a, helpdesk_providers::Result<Vec<u8>>>;

	fn export<'a>(
		&'a self,
		cfg: &'a DocumentProviderConfig,
		id: &'a str,
		mime_type: &'a str,
	) -> BoxFuture<'a, helpdesk_providers::Result<Vec<u8>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub completion: Arc<dyn CompletionProvider>,
	pub documents: Arc<dyn DocumentProvider>,
}
impl Providers {
	pub fn new(
		completion: Arc<dyn CompletionProvider>,
		documents: Arc<dyn DocumentProvider>,
	) -> Self {
		Self { completion, documents }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { completion: provider.clone(), documents: provider }
	}
}

pub struct HelpdeskService {
	pub cfg: Config,
	pub db: Db,
	pub cache: ContentCache,
	pub limiter: RateLimiter,
	pub providers: Providers,
}
impl HelpdeskService {
	pub fn new(cfg: Config, db: Db, cache: ContentCache) -> Self {
		Self::with_providers(cfg, db, cache, Providers::default())
	}

	pub fn with_providers(cfg: Config, db: Db, cache: ContentCache, providers: Providers) -> Self {
		let limiter = RateLimiter::from_config(&cfg.rate_limit);

		Self { cfg, db, cache, limiter, providers }
	}
}

struct DefaultProviders;
impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a CompletionProviderConfig,
		system_prompt: &'a str,
		user_prompt: &'a str,
	) -> BoxFuture<'a, helpdesk_providers::Result<String>> {
		Box::pin(completion::complete(cfg, system_prompt, user_prompt))
	}
}
impl DocumentProvider for DefaultProviders {
	fn list_documents<'a>(
		&'a self,
		cfg: &'a DocumentProviderConfig,
	) -> BoxFuture<'a, helpdesk_providers::Result<Vec<DocumentRef>>> {
		Box::pin(helpdesk_providers::documents::list_documents(cfg))
	}

	fn get_document<'a>(
		&'a self,
		cfg: &'a DocumentProviderConfig,
		id: &'a str,
	) -> BoxFuture<'a, helpdesk_providers::Result<DocumentRef>> {
		Box::pin(helpdesk_providers::documents::get_document(cfg, id))
	}

	fn get_content<'a>(
		&'a self,
		cfg: &'a DocumentProviderConfig,
		id: &'a str,
	) -> BoxFuture<'a, helpdesk_providers::Result<Vec<u8>>> {
		Box::pin(helpdesk_providers::documents::get_content(cfg, id))
	}

	fn export<'a>(
		&'a self,
		cfg: &'a DocumentProviderConfig,
		id: &'a str,
		mime_type: &'a str,
	) -> BoxFuture<'a, helpdesk_providers::Result<Vec<u8>>> {
		Box::pin(helpdesk_providers::documents::export(cfg, id, mime_type))
	}
}

/// A ticket reference must be a non-empty run of ASCII digits.
pub(crate) fn validate_ticket_id(raw: &str) -> Result<&str> {
	let ticket_id = raw.trim();

	if ticket_id.is_empty() || !ticket_id.bytes().all(|byte| byte.is_ascii_digit()) {
		return Err(Error::InvalidRequest {
			message: "ticket_id must be a non-empty string of digits.".to_string(),
		});
	}

	Ok(ticket_id)
}

pub(crate) fn non_blank(raw: Option<&str>) -> Option<String> {
	raw.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}
