pub mod worker;

mod error;

pub use error::{Error, Result};
pub use helpdesk_cli::Args;

use std::time::Duration;

use helpdesk_service::HelpdeskService;
use helpdesk_storage::{content_cache::ContentCache, db::Db};

use crate::worker::WorkerState;

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = helpdesk_config::load(&args.config)?;

	helpdesk_cli::init_tracing(&config.service.log_level);

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let cache = ContentCache::from_config(&config.storage.cache)?;
	let sweep_interval = Duration::from_secs(config.storage.cache.sweep_interval_secs);
	let refresh_documents = config.worker.refresh_documents;
	let state = WorkerState {
		service: HelpdeskService::new(config, db, cache),
		sweep_interval,
		refresh_documents,
	};

	worker::run_worker(state).await;

	Ok(())
}
