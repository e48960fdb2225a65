//! Minimal JSON REST client over a base URL.
//!
//! [`RestClient`] exposes `get`/`post`/`put`/`delete` helpers that join a path onto the base URL,
//! encode request bodies as JSON, and decode response bodies into the caller's type. Requests
//! travel through any [`RequestSender`]; [`RestClientBuilder::build_with_token`] routes them
//! through an [`AuthTransport`] so every call carries a bearer token from a shared
//! [`TokenCache`].

// crates.io
use reqwest::{
	Method, Request as ReqwestRequest, Response as ReqwestResponse,
	header::{CONTENT_TYPE, HeaderValue},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	cache::TokenCache,
	error::{CodecError, ConfigError, StatusError, TransportError},
	http::{ReqwestSender, RequestSender},
	transport::AuthTransport,
};

/// REST client routed through the authenticating transport.
pub type AuthRestClient = RestClient<AuthTransport<ReqwestSender>>;

/// Builder for [`RestClient`].
#[derive(Clone, Debug)]
pub struct RestClientBuilder {
	base_url: String,
	timeout: Duration,
	http_client: Option<ReqwestClient>,
}
impl RestClientBuilder {
	fn new(base_url: impl Into<String>) -> Self {
		Self { base_url: base_url.into(), timeout: <RestClient>::DEFAULT_TIMEOUT, http_client: None }
	}

	/// Overrides the whole-request timeout (defaults to 10 seconds).
	///
	/// Ignored when a custom client is supplied through [`RestClientBuilder::http_client`].
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Uses a preconfigured reqwest client instead of building one.
	pub fn http_client(mut self, client: ReqwestClient) -> Self {
		self.http_client = Some(client);

		self
	}

	/// Builds a client that sends requests without credentials.
	pub fn build(self) -> Result<RestClient<ReqwestSender>> {
		let http = self.http()?;
		let sender = ReqwestSender::with_client(http.clone());

		RestClient::assemble(&self.base_url, http, sender)
	}

	/// Builds a client whose requests carry bearer tokens from `cache`.
	pub fn build_with_token(self, cache: Arc<TokenCache>) -> Result<AuthRestClient> {
		let http = self.http()?;
		let sender = AuthTransport::with_sender(cache, ReqwestSender::with_client(http.clone()));

		RestClient::assemble(&self.base_url, http, sender)
	}

	/// Builds a client that hands every request to a custom sender.
	pub fn build_with_sender<S>(self, sender: S) -> Result<RestClient<S>>
	where
		S: RequestSender<Request = ReqwestRequest, Response = ReqwestResponse>,
	{
		let http = self.http()?;

		RestClient::assemble(&self.base_url, http, sender)
	}

	fn http(&self) -> Result<ReqwestClient> {
		if let Some(client) = &self.http_client {
			return Ok(client.clone());
		}

		let client = ReqwestClient::builder()
			.timeout(self.timeout.unsigned_abs())
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(client)
	}
}

/// JSON REST client bound to one base URL.
#[derive(Clone)]
pub struct RestClient<S = ReqwestSender> {
	base_url: String,
	http: ReqwestClient,
	sender: S,
}
impl RestClient<ReqwestSender> {
	/// Default whole-request timeout.
	pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(10);

	/// Starts building a client for `base_url`.
	pub fn builder(base_url: impl Into<String>) -> RestClientBuilder {
		RestClientBuilder::new(base_url)
	}

	/// Creates a client without credentials using default settings.
	pub fn new(base_url: impl Into<String>) -> Result<Self> {
		Self::builder(base_url).build()
	}
}
impl RestClient<AuthTransport<ReqwestSender>> {
	/// Creates a client whose requests carry bearer tokens from `cache`.
	pub fn with_token(base_url: impl Into<String>, cache: Arc<TokenCache>) -> Result<Self> {
		<RestClient>::builder(base_url).build_with_token(cache)
	}
}
impl<S> RestClient<S>
where
	S: RequestSender<Request = ReqwestRequest, Response = ReqwestResponse>,
{
	fn assemble(base_url: &str, http: ReqwestClient, sender: S) -> Result<Self> {
		let parsed =
			Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
			return Err(ConfigError::UnsupportedBaseUrl { url: base_url.to_owned() }.into());
		}

		Ok(Self { base_url: base_url.trim_end_matches('/').to_owned(), http, sender })
	}

	/// Base URL without a trailing slash.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Sender every request is handed to.
	pub fn sender(&self) -> &S {
		&self.sender
	}

	/// Joins `path` onto the base URL.
	///
	/// The base keeps no trailing slash, and one `/` is inserted unless `path` already starts
	/// with `/`, `?`, or `#`.
	pub fn url(&self, path: &str) -> String {
		if path.is_empty() || path.starts_with(['/', '?', '#']) {
			format!("{}{path}", self.base_url)
		} else {
			format!("{}/{path}", self.base_url)
		}
	}

	/// Sends `GET base_url + path` and decodes the JSON response.
	pub async fn get<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.execute(Method::GET, path, None).await
	}

	/// Sends `POST base_url + path` with a JSON body and decodes the JSON response.
	pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		self.execute(Method::POST, path, Some(encode(body)?)).await
	}

	/// Sends `PUT base_url + path` with a JSON body and decodes the JSON response.
	pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		self.execute(Method::PUT, path, Some(encode(body)?)).await
	}

	/// Sends `DELETE base_url + path` and decodes the JSON response.
	pub async fn delete<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.execute(Method::DELETE, path, None).await
	}

	async fn execute<T>(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut builder = self.http.request(method, self.url(path));

		if let Some(body) = body {
			builder =
				builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json")).body(body);
		}

		let request = builder.build().map_err(ConfigError::request_build)?;
		let response = self.sender.send(request).await.map_err(TransportError::network)?;
		let status = response.status();
		let bytes = response.bytes().await.map_err(TransportError::from)?;

		if !status.is_success() {
			return Err(StatusError {
				status: status.as_u16(),
				body: String::from_utf8_lossy(&bytes).into_owned(),
			}
			.into());
		}

		decode(&bytes, status.as_u16())
	}
}
impl<S> Debug for RestClient<S>
where
	S: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RestClient")
			.field("base_url", &self.base_url)
			.field("sender", &self.sender)
			.finish_non_exhaustive()
	}
}

fn encode<B>(body: &B) -> Result<Vec<u8>>
where
	B: ?Sized + Serialize,
{
	Ok(serde_json::to_vec(body).map_err(CodecError::Encode)?)
}

// An empty body decodes as `null` so `()` and `Option<T>` targets accept bodiless responses.
fn decode<T>(bytes: &[u8], status: u16) -> Result<T>
where
	T: DeserializeOwned,
{
	let payload = if bytes.iter().all(u8::is_ascii_whitespace) { b"null".as_slice() } else { bytes };
	let mut deserializer = serde_json::Deserializer::from_slice(payload);
	let value = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| CodecError::Decode { source, status })?;

	deserializer.end().map_err(|source| CodecError::TrailingData { source, status })?;

	Ok(value)
}
