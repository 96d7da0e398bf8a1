use std::sync::{Arc, Mutex};

use time::{Duration, OffsetDateTime, macros::datetime};

use helpdesk_config::Cache;
use helpdesk_storage::{
	Error,
	content_cache::{Clock, ContentCache, cache_key},
};

struct ManualClock(Mutex<OffsetDateTime>);
impl ManualClock {
	fn starting_at(now: OffsetDateTime) -> Arc<Self> {
		Arc::new(Self(Mutex::new(now)))
	}

	fn advance(&self, by: Duration) {
		let mut now = self.0.lock().expect("clock lock");

		*now += by;
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.lock().expect("clock lock")
	}
}

fn cache_with_clock(dir: &tempfile::TempDir) -> (ContentCache, Arc<ManualClock>) {
	let clock = ManualClock::starting_at(datetime!(2025-03-01 08:00 UTC));
	let cache = ContentCache::with_clock(dir.path(), Duration::hours(24), clock.clone())
		.expect("Failed to create cache.");

	(cache, clock)
}

#[tokio::test]
async fn fresh_entries_are_served() {
	let dir = tempfile::tempdir().expect("tempdir");
	let (cache, clock) = cache_with_clock(&dir);

	cache.set("doc-1", "Restart the print spooler.").await;
	clock.advance(Duration::hours(24));

	assert_eq!(cache.get("doc-1").await.as_deref(), Some("Restart the print spooler."));
}

#[tokio::test]
async fn expired_entries_miss_and_are_removed() {
	let dir = tempfile::tempdir().expect("tempdir");
	let (cache, clock) = cache_with_clock(&dir);

	cache.set("doc-1", "Restart the print spooler.").await;
	clock.advance(Duration::hours(24) + Duration::seconds(1));

	assert_eq!(cache.get("doc-1").await, None);
	assert!(!cache.contains("doc-1").await);
	assert!(!dir.path().join(format!("{}.json", cache_key("doc-1"))).exists());
}

#[tokio::test]
async fn set_overwrites_and_refreshes_the_timestamp() {
	let dir = tempfile::tempdir().expect("tempdir");
	let (cache, clock) = cache_with_clock(&dir);

	cache.set("doc-1", "old").await;
	clock.advance(Duration::hours(20));
	cache.set("doc-1", "new").await;
	clock.advance(Duration::hours(20));

	assert_eq!(cache.get("doc-1").await.as_deref(), Some("new"));
}

#[tokio::test]
async fn corrupted_entries_are_misses() {
	let dir = tempfile::tempdir().expect("tempdir");
	let (cache, _clock) = cache_with_clock(&dir);
	let path = dir.path().join(format!("{}.json", cache_key("doc-1")));

	std::fs::write(&path, b"{not json").expect("write corrupt entry");

	assert_eq!(cache.get("doc-1").await, None);
	assert!(!path.exists());
}

#[tokio::test]
async fn clear_removes_one_or_all_entries() {
	let dir = tempfile::tempdir().expect("tempdir");
	let (cache, _clock) = cache_with_clock(&dir);

	cache.set("doc-1", "a").await;
	cache.set("doc-2", "b").await;
	cache.set("doc-3", "c").await;

	assert_eq!(cache.clear(Some("doc-1")).await, 1);
	assert_eq!(cache.clear(Some("doc-1")).await, 0);
	assert!(cache.contains("doc-2").await);
	assert_eq!(cache.clear(None).await, 2);
	assert!(!cache.contains("doc-3").await);
}

#[tokio::test]
async fn sweep_removes_expired_and_corrupted_entries_only() {
	let dir = tempfile::tempdir().expect("tempdir");
	let (cache, clock) = cache_with_clock(&dir);

	cache.set("old", "stale").await;
	clock.advance(Duration::hours(30));
	cache.set("new", "fresh").await;
	std::fs::write(dir.path().join("broken.json"), b"[]").expect("write corrupt entry");
	std::fs::write(dir.path().join("notes.txt"), b"ignored").expect("write foreign file");

	assert_eq!(cache.cleanup_expired().await, 2);
	assert!(cache.contains("new").await);
	assert!(!cache.contains("old").await);
	assert!(dir.path().join("notes.txt").exists());
}

#[tokio::test]
async fn concurrent_writers_leave_one_complete_entry() {
	let dir = tempfile::tempdir().expect("tempdir");
	let (cache, _clock) = cache_with_clock(&dir);
	let cache = Arc::new(cache);
	let mut handles = Vec::new();

	for i in 0..16 {
		let cache = cache.clone();

		handles.push(tokio::spawn(async move {
			cache.set("shared", &format!("writer {i}")).await;
		}));
	}
	for handle in handles {
		handle.await.expect("writer task");
	}

	let content = cache.get("shared").await.expect("entry present");

	assert!(content.starts_with("writer "));

	let leftovers = std::fs::read_dir(dir.path())
		.expect("read cache dir")
		.filter_map(|entry| entry.ok())
		.filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
		.count();

	assert_eq!(leftovers, 0);
}

#[test]
fn zero_ttl_is_rejected() {
	let dir = tempfile::tempdir().expect("tempdir");

	assert!(ContentCache::new(dir.path(), Duration::ZERO).is_err());
}

#[test]
fn oversized_config_ttl_is_rejected() {
	let dir = tempfile::tempdir().expect("tempdir");
	let cfg = |ttl_hours| Cache {
		dir: dir.path().to_path_buf(),
		ttl_hours,
		sweep_interval_secs: 3_600,
	};
	let cache = ContentCache::from_config(&cfg(24)).expect("Failed to create cache.");

	assert_eq!(cache.ttl(), Duration::hours(24));
	assert!(matches!(
		ContentCache::from_config(&cfg(3_000_000_000_000_000)),
		Err(Error::InvalidArgument(_))
	));
	assert!(matches!(ContentCache::from_config(&cfg(u64::MAX)), Err(Error::InvalidArgument(_))));
}
