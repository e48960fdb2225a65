//! Optional observability helpers for the token cache and authenticating transport.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `feign.layer` with the `layer` (cache or
//!   transport), `stage` (call site), and `origin` fields, plus warn-level events whenever a token
//!   fetch fails or a credential cannot be placed on a request.
//! - Enable `metrics` to increment the `feign_token_cache_total` counter for every token lookup,
//!   labeled by `outcome`.

mod counter;
mod span;

pub use counter::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Layers that open spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
	/// Token cache lookups and refreshes.
	Cache,
	/// Authenticating transport.
	Transport,
}
impl Layer {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Layer::Cache => "cache",
			Layer::Transport => "transport",
		}
	}
}
impl Display for Layer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// How a single token lookup was answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheOutcome {
	/// Cached token was outside its refresh window.
	Hit,
	/// Token source produced a new token.
	Refreshed,
	/// Refresh failed and the previous token was served instead.
	Stale,
	/// Refresh failed with nothing cached, so no credential was returned.
	Empty,
}
impl CacheOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CacheOutcome::Hit => "hit",
			CacheOutcome::Refreshed => "refreshed",
			CacheOutcome::Stale => "stale",
			CacheOutcome::Empty => "empty",
		}
	}
}
impl Display for CacheOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
