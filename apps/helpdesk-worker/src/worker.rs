use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use helpdesk_service::{HelpdeskService, RefreshReport};

use crate::Result;

pub struct WorkerState {
	pub service: HelpdeskService,
	pub sweep_interval: Duration,
	/// Re-extract the whole document collection on every cycle.
	pub refresh_documents: bool,
}

#[derive(Debug, Default)]
pub struct CycleReport {
	pub swept: usize,
	pub refresh: Option<RefreshReport>,
}

/// Runs maintenance cycles forever. A failed cycle is logged and retried on the next tick.
pub async fn run_worker(state: WorkerState) {
	let mut ticker = time::interval(state.sweep_interval);

	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	tracing::info!(
		interval_secs = state.sweep_interval.as_secs(),
		refresh_documents = state.refresh_documents,
		"Worker started."
	);

	loop {
		ticker.tick().await;

		match run_once(&state).await {
			Ok(report) => tracing::debug!(
				swept = report.swept,
				refreshed = report.refresh.as_ref().map(|refresh| refresh.refreshed.len()),
				"Maintenance cycle finished."
			),
			Err(err) => tracing::error!(error = %err, "Maintenance cycle failed."),
		}
	}
}

/// Sweeps expired cache entries, then refreshes the document cache when enabled.
pub async fn run_once(state: &WorkerState) -> Result<CycleReport> {
	let swept = state.service.cache.cleanup_expired().await;

	if swept > 0 {
		tracing::info!(swept, "Swept expired cache entries.");
	}

	let refresh = if state.refresh_documents {
		Some(state.service.refresh_documents(None).await?)
	} else {
		None
	};

	Ok(CycleReport { swept, refresh })
}
