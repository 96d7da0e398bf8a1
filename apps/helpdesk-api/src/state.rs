use std::sync::Arc;

use helpdesk_service::HelpdeskService;
use helpdesk_storage::{content_cache::ContentCache, db::Db};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<HelpdeskService>,
}
impl AppState {
	pub async fn new(config: helpdesk_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let cache = ContentCache::from_config(&config.storage.cache)?;
		let service = HelpdeskService::new(config, db, cache);

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: HelpdeskService) -> Self {
		Self { service: Arc::new(service) }
	}
}
