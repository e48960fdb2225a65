//! Token source contract consumed by the token cache.
//!
//! The cache knows nothing about how a credential is minted. Implementations may call an OAuth
//! endpoint, read a sidecar file, or return a fixture; the cache only sees an [`IssuedToken`] or
//! a [`FetchError`]. Any `Fn(Origin) -> impl Future<Output = Result<IssuedToken, FetchError>>`
//! closure is already a [`TokenSource`].

// self
use crate::{_prelude::*, auth::Origin, error::FetchError};

/// Boxed future returned by [`TokenSource::fetch`].
pub type FetchFuture<'a> =
	Pin<Box<dyn Future<Output = Result<IssuedToken, FetchError>> + 'a + Send>>;

/// Capability that produces a fresh token for an origin.
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Obtains a new token for `origin`.
	fn fetch<'a>(&'a self, origin: &'a Origin) -> FetchFuture<'a>;
}
impl<F, Fut> TokenSource for F
where
	F: Send + Sync + Fn(Origin) -> Fut,
	Fut: 'static + Send + Future<Output = Result<IssuedToken, FetchError>>,
{
	fn fetch<'a>(&'a self, origin: &'a Origin) -> FetchFuture<'a> {
		Box::pin(self(origin.clone()))
	}
}

/// Token value plus its validity window, as reported by a [`TokenSource`].
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
	/// Raw token value.
	pub value: String,
	/// How long the token stays valid from the moment it is stored.
	pub valid_for: Duration,
}
impl IssuedToken {
	/// Creates an issued token.
	pub fn new(value: impl Into<String>, valid_for: Duration) -> Self {
		Self { value: value.into(), valid_for }
	}
}
impl Debug for IssuedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IssuedToken")
			.field("value", &"<redacted>")
			.field("valid_for", &self.valid_for)
			.finish()
	}
}
