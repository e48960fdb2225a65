//! Request-sending primitives the authenticating transport plugs into.
//!
//! [`RequestSender`] is the only dependency the transport has on an HTTP stack: anything that
//! turns a request into a response (a real client, another middleware layer, a test double)
//! can sit underneath it. [`AuthorizableRequest`] is the minimal view of a request the transport
//! needs: its target URL and a way to set the `Authorization` header. Both are implemented for
//! reqwest when the `reqwest` feature is enabled, with [`ReqwestSender`] acting as the default
//! system sender.

// std
use std::borrow::Cow;
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	Request as ReqwestRequest, Response as ReqwestResponse,
	header::{AUTHORIZATION, HeaderValue},
};
// self
use crate::{_prelude::*, error::HeaderError};

/// Boxed future returned by [`RequestSender::send`].
pub type SendFuture<'a, R, E> = Pin<Box<dyn Future<Output = Result<R, E>> + 'a + Send>>;

/// Capability that performs one HTTP exchange.
///
/// Implementations must be `Send + Sync` so a single sender can serve concurrent requests, and
/// the returned future must be `Send` so callers can spawn it on a multi-threaded runtime.
pub trait RequestSender
where
	Self: Send + Sync,
{
	/// Outgoing request type.
	type Request: Send;
	/// Response type produced on success.
	type Response: Send;
	/// Failure reported by the sender.
	type Error: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves to the downstream response or failure.
	fn send(&self, request: Self::Request) -> SendFuture<'_, Self::Response, Self::Error>;
}
impl<S> RequestSender for Arc<S>
where
	S: ?Sized + RequestSender,
{
	type Error = S::Error;
	type Request = S::Request;
	type Response = S::Response;

	fn send(&self, request: Self::Request) -> SendFuture<'_, Self::Response, Self::Error> {
		(**self).send(request)
	}
}

/// Outgoing request view used to resolve an origin and attach a bearer credential.
pub trait AuthorizableRequest {
	/// Full target URL as a string; it may be malformed.
	fn target_url(&self) -> Cow<'_, str>;

	/// Sets the `Authorization` header to `value`, replacing any existing value.
	fn set_authorization(&mut self, value: &str) -> Result<(), HeaderError>;

	/// Current `Authorization` header value, if present and valid UTF-8.
	fn authorization(&self) -> Option<&str>;
}
#[cfg(feature = "reqwest")]
impl AuthorizableRequest for ReqwestRequest {
	fn target_url(&self) -> Cow<'_, str> {
		Cow::Borrowed(self.url().as_str())
	}

	fn set_authorization(&mut self, value: &str) -> Result<(), HeaderError> {
		let mut header = HeaderValue::from_str(value)
			.map_err(|e| HeaderError::InvalidValue { source: Some(Box::new(e)) })?;

		header.set_sensitive(true);
		self.headers_mut().insert(AUTHORIZATION, header);

		Ok(())
	}

	fn authorization(&self) -> Option<&str> {
		self.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok())
	}
}

/// Thin wrapper around [`ReqwestClient`] used as the default system sender.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestSender(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestSender {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestSender {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestSender {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl RequestSender for ReqwestSender {
	type Error = ReqwestError;
	type Request = ReqwestRequest;
	type Response = ReqwestResponse;

	fn send(&self, request: Self::Request) -> SendFuture<'_, Self::Response, Self::Error> {
		Box::pin(self.0.execute(request))
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use reqwest::Method;
	// self
	use super::*;

	fn request(url: &str) -> ReqwestRequest {
		ReqwestRequest::new(Method::GET, Url::parse(url).expect("Request URL fixture should parse."))
	}

	#[test]
	fn reqwest_request_exposes_target_url() {
		let request = request("https://api.example.com/v1/items?page=2");

		assert_eq!(request.target_url(), "https://api.example.com/v1/items?page=2");
		assert!(request.authorization().is_none());
	}

	#[test]
	fn set_authorization_replaces_existing_value() {
		let mut request = request("https://api.example.com/");

		request
			.headers_mut()
			.append(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
		request
			.headers_mut()
			.append(AUTHORIZATION, HeaderValue::from_static("Basic b3RoZXI6cGFzcw=="));
		request
			.set_authorization("Bearer tok-A")
			.expect("Plain ASCII bearer values should be accepted.");

		let values = request.headers().get_all(AUTHORIZATION).iter().collect::<Vec<_>>();

		assert_eq!(values.len(), 1);
		assert_eq!(request.authorization(), Some("Bearer tok-A"));
		assert!(values[0].is_sensitive());
	}

	#[test]
	fn set_authorization_rejects_control_characters() {
		let mut request = request("https://api.example.com/");
		let err = request
			.set_authorization("Bearer bad\nvalue")
			.expect_err("Header values containing newlines must be rejected.");

		assert!(matches!(err, HeaderError::InvalidValue { source: Some(_) }));
		assert!(request.authorization().is_none());
	}
}
