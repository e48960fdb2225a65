//! Minimal REST client with an origin-keyed bearer token cache and an authenticating transport
//! that injects `Authorization: Bearer <token>` into every outgoing request.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
#[cfg(feature = "reqwest")] pub mod client;
pub mod error;
pub mod http;
pub mod obs;
pub mod source;
pub mod transport;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::{
		collections::VecDeque,
		sync::atomic::{AtomicUsize, Ordering},
	};
	// self
	use crate::{
		auth::Origin,
		error::FetchError,
		source::{FetchFuture, IssuedToken, TokenSource},
	};

	/// Token source that replays a fixed script of outcomes and counts every invocation.
	///
	/// Once the script is exhausted every further fetch fails.
	#[derive(Debug, Default)]
	pub struct ScriptedSource {
		script: AsyncMutex<VecDeque<Result<IssuedToken, String>>>,
		calls: AtomicUsize,
		origins: AsyncMutex<Vec<Origin>>,
	}
	impl ScriptedSource {
		/// Builds a source that answers fetches with the provided outcomes, in order.
		pub fn new(script: impl IntoIterator<Item = Result<IssuedToken, String>>) -> Self {
			Self {
				script: AsyncMutex::new(script.into_iter().collect()),
				calls: AtomicUsize::new(0),
				origins: AsyncMutex::new(Vec::new()),
			}
		}

		/// Shorthand for a successful outcome.
		pub fn issue(value: &str, seconds: i64) -> Result<IssuedToken, String> {
			Ok(IssuedToken::new(value, Duration::seconds(seconds)))
		}

		/// Shorthand for a failed outcome.
		pub fn fail(message: &str) -> Result<IssuedToken, String> {
			Err(message.to_owned())
		}

		/// Number of fetches observed so far.
		pub fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}

		/// Origins passed to each fetch, in call order.
		pub async fn origins(&self) -> Vec<Origin> {
			self.origins.lock().await.clone()
		}
	}
	impl TokenSource for ScriptedSource {
		fn fetch<'a>(&'a self, origin: &'a Origin) -> FetchFuture<'a> {
			Box::pin(async move {
				self.calls.fetch_add(1, Ordering::SeqCst);
				self.origins.lock().await.push(origin.clone());

				match self.script.lock().await.pop_front() {
					Some(Ok(issued)) => Ok(issued),
					Some(Err(message)) => Err(FetchError::message(message)),
					None => Err(FetchError::message("token script exhausted")),
				}
			})
		}
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
