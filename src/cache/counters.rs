// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::CacheOutcome;

/// Thread-safe counters for token lookups.
#[derive(Debug, Default)]
pub struct CacheMetrics {
	lookups: AtomicU64,
	hits: AtomicU64,
	fetches: AtomicU64,
	refreshed: AtomicU64,
	stale: AtomicU64,
	empty: AtomicU64,
}
impl CacheMetrics {
	/// Returns the total number of token lookups.
	pub fn lookups(&self) -> u64 {
		self.lookups.load(Ordering::Relaxed)
	}

	/// Returns the number of lookups answered from cache without fetching.
	pub fn hits(&self) -> u64 {
		self.hits.load(Ordering::Relaxed)
	}

	/// Returns the number of token source invocations.
	pub fn fetches(&self) -> u64 {
		self.fetches.load(Ordering::Relaxed)
	}

	/// Returns the number of fetches that stored a new token.
	pub fn refreshed(&self) -> u64 {
		self.refreshed.load(Ordering::Relaxed)
	}

	/// Returns the number of failed fetches that fell back to the previous token.
	pub fn stale(&self) -> u64 {
		self.stale.load(Ordering::Relaxed)
	}

	/// Returns the number of failed fetches with nothing to fall back to.
	pub fn empty(&self) -> u64 {
		self.empty.load(Ordering::Relaxed)
	}

	/// Returns the number of failed fetches.
	pub fn fetch_failures(&self) -> u64 {
		self.stale() + self.empty()
	}

	pub(crate) fn record_lookup(&self) {
		self.lookups.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_fetch(&self) {
		self.fetches.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_outcome(&self, outcome: CacheOutcome) {
		let counter = match outcome {
			CacheOutcome::Hit => &self.hits,
			CacheOutcome::Refreshed => &self.refreshed,
			CacheOutcome::Stale => &self.stale,
			CacheOutcome::Empty => &self.empty,
		};

		counter.fetch_add(1, Ordering::Relaxed);
	}
}
