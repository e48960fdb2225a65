//! Authenticating transport that injects cached bearer tokens into outgoing requests.
//!
//! [`AuthTransport`] wraps any [`RequestSender`]. For each request it resolves the origin of
//! the target URL, asks the shared [`TokenCache`] for a token, and sets
//! `Authorization: Bearer <token>` when one is available before delegating. It never fails on
//! its own: an unparsable URL degrades to the unresolved origin, an empty token leaves headers
//! untouched, and the wrapped sender's result is returned verbatim.

// self
use crate::{
	_prelude::*,
	auth::{Origin, TokenSecret},
	cache::TokenCache,
	http::{AuthorizableRequest, RequestSender, SendFuture},
	obs::{self, Layer, LayerSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestSender;

/// Request sender layer that attaches bearer tokens from a shared [`TokenCache`].
///
/// The layer holds no per-request state; it can be cloned cheaply and stacked under other
/// [`RequestSender`] layers.
#[derive(Clone)]
pub struct AuthTransport<S> {
	cache: Arc<TokenCache>,
	inner: S,
}
impl<S> AuthTransport<S>
where
	S: RequestSender,
	S::Request: AuthorizableRequest,
{
	/// Wraps `inner` so every request it sends carries a token from `cache`.
	pub fn with_sender(cache: Arc<TokenCache>, inner: S) -> Self {
		Self { cache, inner }
	}

	/// Shared token cache consulted for every request.
	pub fn cache(&self) -> &Arc<TokenCache> {
		&self.cache
	}

	/// Wrapped sender.
	pub fn inner(&self) -> &S {
		&self.inner
	}

	/// Resolves the origin for `request` and attaches a bearer token when one is available.
	///
	/// Returns the origin that was used for the lookup.
	pub async fn authorize(&self, request: &mut S::Request) -> Origin {
		let origin = Origin::resolve(&request.target_url());

		self.attach(request, &origin).await;

		origin
	}

	async fn attach(&self, request: &mut S::Request, origin: &Origin) {
		let token = TokenSecret::new(self.cache.get_token(origin).await);

		if token.is_empty() {
			return;
		}
		if let Err(e) = request.set_authorization(&token.bearer()) {
			obs::warn_header_rejected(origin, &e);
		}
	}
}
#[cfg(feature = "reqwest")]
impl AuthTransport<ReqwestSender> {
	/// Creates a transport that sends through a default reqwest client.
	pub fn new(cache: Arc<TokenCache>) -> Self {
		Self::with_sender(cache, ReqwestSender::default())
	}
}
impl<S> RequestSender for AuthTransport<S>
where
	S: RequestSender,
	S::Request: AuthorizableRequest,
{
	type Error = S::Error;
	type Request = S::Request;
	type Response = S::Response;

	fn send(&self, mut request: Self::Request) -> SendFuture<'_, Self::Response, Self::Error> {
		Box::pin(async move {
			let origin = Origin::resolve(&request.target_url());
			let span = LayerSpan::new(Layer::Transport, "send", &origin);

			span.instrument(async move {
				self.attach(&mut request, &origin).await;
				self.inner.send(request).await
			})
			.await
		})
	}
}
impl<S> Debug for AuthTransport<S>
where
	S: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthTransport")
			.field("cache", &self.cache)
			.field("inner", &self.inner)
			.finish()
	}
}
