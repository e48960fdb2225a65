//! Read-through, origin-keyed bearer token cache with fail-open-to-stale refreshes.
//!
//! [`TokenCache::get_token`] answers "give me a usable token for this origin". A cached token is
//! reused until `now >= expires_at - refresh_lead`; from then on every lookup calls the
//! [`TokenSource`] inline. A successful fetch replaces the cached token wholesale. A failed fetch
//! never reaches the caller: the previous token is served unchanged when one exists, otherwise
//! the lookup yields an empty string meaning "no credential available".
//!
//! One async mutex guards the whole read-check-refresh-write sequence for every origin, so refresh
//! decisions are serialized across the cache and the map never observes a partial write. Fetches
//! are bounded by token lifetimes, which keeps the contention cost low relative to request volume.

mod counters;

pub use counters::CacheMetrics;

// self
use crate::{
	_prelude::*,
	auth::{Origin, Token},
	obs::{self, CacheOutcome, Layer, LayerSpan},
	source::TokenSource,
};

/// Origin-keyed token cache shared by every consumer through `Arc`.
pub struct TokenCache {
	tokens: AsyncMutex<HashMap<Origin, Token>>,
	source: Arc<dyn TokenSource>,
	refresh_lead: Duration,
	metrics: CacheMetrics,
}
impl TokenCache {
	/// Lead time before expiry at which cached tokens become due for refresh.
	pub const DEFAULT_REFRESH_LEAD: Duration = Duration::seconds(10);

	/// Creates an empty cache backed by `source`.
	pub fn new(source: impl 'static + TokenSource) -> Self {
		Self::with_source(Arc::new(source))
	}

	/// Creates an empty cache backed by an already shared source.
	pub fn with_source(source: Arc<dyn TokenSource>) -> Self {
		Self {
			tokens: Default::default(),
			source,
			refresh_lead: Self::DEFAULT_REFRESH_LEAD,
			metrics: Default::default(),
		}
	}

	/// Overrides the refresh lead time (defaults to 10 seconds). Negative values clamp to zero.
	pub fn with_refresh_lead(mut self, lead: Duration) -> Self {
		self.refresh_lead = if lead.is_negative() { Duration::ZERO } else { lead };

		self
	}

	/// Configured refresh lead time.
	pub fn refresh_lead(&self) -> Duration {
		self.refresh_lead
	}

	/// Lookup and fetch counters for this cache.
	pub fn metrics(&self) -> &CacheMetrics {
		&self.metrics
	}

	/// Returns a usable token for `origin`, refreshing it first when due.
	///
	/// The clock is read after the cache lock is acquired.
	///
	/// Yields an empty string when no token could be obtained and none was cached.
	pub async fn get_token(&self, origin: &Origin) -> String {
		self.lookup(origin, OffsetDateTime::now_utc).await
	}

	/// Same as [`TokenCache::get_token`], treating `now` as the current instant for staleness
	/// checks and for the expiry of a freshly fetched token.
	pub async fn get_token_at(&self, origin: &Origin, now: OffsetDateTime) -> String {
		self.lookup(origin, move || now).await
	}

	async fn lookup<C>(&self, origin: &Origin, clock: C) -> String
	where
		C: Send + FnOnce() -> OffsetDateTime,
	{
		let span = LayerSpan::new(Layer::Cache, "get_token", origin);

		span.instrument(async move {
			self.metrics.record_lookup();

			let mut tokens = self.tokens.lock().await;
			let now = clock();
			let due = tokens.get(origin).is_none_or(|token| token.is_due_at(now, self.refresh_lead));
			let outcome = if due {
				self.metrics.record_fetch();

				match self.source.fetch(origin).await {
					Ok(issued) => {
						tokens.insert(
							origin.clone(),
							Token::issued_at(issued.value, now, issued.valid_for),
						);

						CacheOutcome::Refreshed
					},
					Err(e) => {
						let stale = tokens.contains_key(origin);

						obs::warn_fetch_failed(origin, &e, stale);

						if stale { CacheOutcome::Stale } else { CacheOutcome::Empty }
					},
				}
			} else {
				CacheOutcome::Hit
			};

			self.metrics.record_outcome(outcome);
			obs::record_cache_outcome(outcome);

			tokens.get(origin).map(|token| token.value().expose().to_owned()).unwrap_or_default()
		})
		.await
	}

	/// Returns a snapshot of the token currently cached for `origin`, without fetching.
	pub async fn cached(&self, origin: &Origin) -> Option<Token> {
		self.tokens.lock().await.get(origin).cloned()
	}

	/// Number of origins holding a cached token.
	pub async fn len(&self) -> usize {
		self.tokens.lock().await.len()
	}

	/// Returns `true` when no origin holds a cached token.
	pub async fn is_empty(&self) -> bool {
		self.tokens.lock().await.is_empty()
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("refresh_lead", &self.refresh_lead)
			.field("metrics", &self.metrics)
			.finish_non_exhaustive()
	}
}
