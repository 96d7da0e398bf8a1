//! Sliding-window admission control for rate-sensitive upstream calls.

use std::{
	collections::{HashMap, VecDeque},
	sync::Mutex,
	time::Duration,
};

use tokio::time::{self, Instant};

use crate::{Error, Result};

pub struct RateLimiter {
	quota: usize,
	window: Duration,
	max_wait: Duration,
	windows: Mutex<HashMap<String, VecDeque<Instant>>>,
}
impl RateLimiter {
	pub fn new(quota: u32, window: Duration, max_wait: Duration) -> Self {
		Self {
			quota: usize::try_from(quota).unwrap_or(usize::MAX).max(1),
			window,
			max_wait,
			windows: Mutex::new(HashMap::new()),
		}
	}

	pub fn from_config(cfg: &helpdesk_config::RateLimit) -> Self {
		Self::new(
			cfg.quota,
			Duration::from_secs(cfg.window_secs),
			Duration::from_secs(cfg.max_wait_secs),
		)
	}

	/// Records an admission for `key` and returns `None`, or returns how long to wait until the
	/// oldest admission leaves the window.
	pub fn admit(&self, key: &str) -> Option<Duration> {
		let now = Instant::now();
		let mut windows = self.windows.lock().unwrap_or_else(|err| err.into_inner());
		let window = windows.entry(key.to_string()).or_default();

		while let Some(oldest) = window.front() {
			if now.saturating_duration_since(*oldest) >= self.window {
				window.pop_front();
			} else {
				break;
			}
		}

		if window.len() >= self.quota {
			let oldest = window.front().copied().unwrap_or(now);

			return Some(self.window.saturating_sub(now.saturating_duration_since(oldest)));
		}

		window.push_back(now);

		None
	}

	/// Waits until `key` is admitted. Admission is re-checked after every sleep, so concurrent
	/// callers never exceed the quota. Fails once the total wait would pass the configured
	/// maximum.
	pub async fn wait_if_needed(&self, key: &str) -> Result<()> {
		let mut waited = Duration::ZERO;

		loop {
			let Some(wait) = self.admit(key) else { return Ok(()) };

			waited += wait;

			if waited > self.max_wait {
				tracing::warn!(key, waited_ms = waited.as_millis() as u64, "Rate limit wait exceeded.");

				return Err(Error::RateLimited {
					message: format!("Quota for {key} is exhausted; retry in {}s.", wait.as_secs().max(1)),
				});
			}

			tracing::info!(key, wait_ms = wait.as_millis() as u64, "Rate limited; waiting.");

			time::sleep(wait).await;
		}
	}
}
