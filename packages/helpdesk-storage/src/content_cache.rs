//! Filesystem cache of extracted document text with time-based expiry.
//!
//! Every entry is one `<key>.json` file holding the content and the instant it was stored. Reads
//! that find an expired, unreadable, or corrupted entry treat it as a miss and delete the file.
//! Cache failures are never fatal; they are logged and degrade to a miss.

use std::{
	fmt::Write as _,
	io::ErrorKind,
	path::{Path, PathBuf},
	sync::Arc,
};

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tokio::{fs, sync::Mutex};
use uuid::Uuid;

use crate::{Error, Result};

const LOCK_STRIPES: usize = 32;
const MAX_KEY_LEN: usize = 128;
const ENTRY_EXTENSION: &str = "json";

pub trait Clock: Send + Sync {
	fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
	content: String,
	#[serde(with = "time::serde::rfc3339")]
	timestamp: OffsetDateTime,
}

pub struct ContentCache {
	dir: PathBuf,
	ttl: Duration,
	clock: Arc<dyn Clock>,
	stripes: Vec<Mutex<()>>,
}
impl ContentCache {
	pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self> {
		Self::with_clock(dir, ttl, Arc::new(SystemClock))
	}

	pub fn with_clock(dir: impl Into<PathBuf>, ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
		let dir = dir.into();

		if ttl <= Duration::ZERO {
			return Err(Error::InvalidArgument("Cache TTL must be positive.".to_string()));
		}

		std::fs::create_dir_all(&dir)
			.map_err(|source| Error::CacheDir { path: dir.clone(), source })?;

		let stripes = (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect();

		Ok(Self { dir, ttl, clock, stripes })
	}

	pub fn from_config(cfg: &helpdesk_config::Cache) -> Result<Self> {
		let ttl = i64::try_from(cfg.ttl_hours)
			.ok()
			.and_then(|hours| hours.checked_mul(3_600))
			.map(Duration::seconds)
			.ok_or_else(|| {
				Error::InvalidArgument("storage.cache.ttl_hours is out of range.".to_string())
			})?;

		Self::new(cfg.dir.clone(), ttl)
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Returns the cached content for `id` if it is present and younger than the TTL.
	pub async fn get(&self, id: &str) -> Option<String> {
		let key = cache_key(id);
		let _guard = self.stripe(&key).lock().await;
		let path = self.entry_path(&key);
		let raw = match fs::read(&path).await {
			Ok(raw) => raw,
			Err(err) if err.kind() == ErrorKind::NotFound => return None,
			Err(err) => {
				tracing::warn!(error = %err, key = %key, "Failed to read cache entry.");
				remove_entry(&path).await;

				return None;
			},
		};
		let entry = match serde_json::from_slice::<CacheEntry>(&raw) {
			Ok(entry) => entry,
			Err(err) => {
				tracing::warn!(error = %err, key = %key, "Dropping corrupted cache entry.");
				remove_entry(&path).await;

				return None;
			},
		};

		if self.is_expired(&entry) {
			tracing::debug!(key = %key, "Cache entry expired.");
			remove_entry(&path).await;

			return None;
		}

		Some(entry.content)
	}

	/// Stores `content` for `id`, replacing any previous entry.
	pub async fn set(&self, id: &str, content: &str) {
		let key = cache_key(id);
		let entry = CacheEntry { content: content.to_string(), timestamp: self.clock.now() };
		let raw = match serde_json::to_vec(&entry) {
			Ok(raw) => raw,
			Err(err) => {
				tracing::warn!(error = %err, key = %key, "Failed to encode cache entry.");

				return;
			},
		};
		let _guard = self.stripe(&key).lock().await;
		let path = self.entry_path(&key);
		let tmp = self.dir.join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));

		if let Err(err) = fs::write(&tmp, &raw).await {
			tracing::warn!(error = %err, key = %key, "Failed to write cache entry.");
			remove_entry(&tmp).await;

			return;
		}
		if let Err(err) = fs::rename(&tmp, &path).await {
			tracing::warn!(error = %err, key = %key, "Failed to publish cache entry.");
			remove_entry(&tmp).await;
			remove_entry(&path).await;
		}
	}

	/// True when a file exists for `id`, regardless of its age.
	pub async fn contains(&self, id: &str) -> bool {
		let key = cache_key(id);
		let _guard = self.stripe(&key).lock().await;

		fs::try_exists(self.entry_path(&key)).await.unwrap_or(false)
	}

	/// Removes the entry for `id`, or every entry when `id` is `None`. Returns the number of
	/// removed files.
	pub async fn clear(&self, id: Option<&str>) -> usize {
		if let Some(id) = id {
			let key = cache_key(id);
			let _guard = self.stripe(&key).lock().await;

			return usize::from(remove_entry(&self.entry_path(&key)).await);
		}

		let mut removed = 0;

		for key in self.entry_keys().await {
			let _guard = self.stripe(&key).lock().await;

			if remove_entry(&self.entry_path(&key)).await {
				removed += 1;
			}
		}

		removed
	}

	/// Deletes every expired or unreadable entry and returns how many were removed.
	pub async fn cleanup_expired(&self) -> usize {
		let mut removed = 0;

		for key in self.entry_keys().await {
			let _guard = self.stripe(&key).lock().await;
			let path = self.entry_path(&key);
			let stale = match fs::read(&path).await {
				Ok(raw) => match serde_json::from_slice::<CacheEntry>(&raw) {
					Ok(entry) => self.is_expired(&entry),
					Err(_) => true,
				},
				Err(err) if err.kind() == ErrorKind::NotFound => false,
				Err(_) => true,
			};

			if stale && remove_entry(&path).await {
				removed += 1;
			}
		}

		if removed > 0 {
			tracing::info!(removed, "Removed expired cache entries.");
		}

		removed
	}

	fn is_expired(&self, entry: &CacheEntry) -> bool {
		self.clock.now() - entry.timestamp > self.ttl
	}

	fn entry_path(&self, key: &str) -> PathBuf {
		self.dir.join(format!("{key}.{ENTRY_EXTENSION}"))
	}

	fn stripe(&self, key: &str) -> &Mutex<()> {
		let hash = blake3::hash(key.as_bytes());
		let index = usize::from(hash.as_bytes()[0]) % self.stripes.len();

		&self.stripes[index]
	}

	async fn entry_keys(&self) -> Vec<String> {
		let mut keys = Vec::new();
		let mut entries = match fs::read_dir(&self.dir).await {
			Ok(entries) => entries,
			Err(err) => {
				tracing::warn!(error = %err, dir = %self.dir.display(), "Failed to list cache directory.");

				return keys;
			},
		};

		loop {
			match entries.next_entry().await {
				Ok(Some(entry)) => {
					let path = entry.path();

					if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
						continue;
					}
					if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
						keys.push(stem.to_string());
					}
				},
				Ok(None) => break,
				Err(err) => {
					tracing::warn!(error = %err, "Failed to read cache directory entry.");

					break;
				},
			}
		}

		keys
	}
}

/// Derives a filesystem-safe key from a source id.
///
/// ASCII alphanumerics pass through and every other byte becomes `_` plus two lowercase hex
/// digits, so distinct ids never collide. Encodings longer than 128 characters are replaced by
/// `_h` and the blake3 hex digest of the id; the escape rule never emits `_h`.
pub fn cache_key(id: &str) -> String {
	let mut key = String::with_capacity(id.len());

	for byte in id.bytes() {
		if byte.is_ascii_alphanumeric() {
			key.push(char::from(byte));
		} else {
			let _ = write!(key, "_{byte:02x}");
		}
	}

	if key.len() > MAX_KEY_LEN {
		return format!("_h{}", blake3::hash(id.as_bytes()).to_hex());
	}

	key
}

async fn remove_entry(path: &Path) -> bool {
	match fs::remove_file(path).await {
		Ok(()) => true,
		Err(err) if err.kind() == ErrorKind::NotFound => false,
		Err(err) => {
			tracing::warn!(error = %err, path = %path.display(), "Failed to remove cache file.");

			false
		},
	}
}
