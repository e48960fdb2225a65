//! Demonstrates plugging a custom request type and sender underneath [`AuthTransport`].
//!
//! 1. Implement [`AuthorizableRequest`] so the transport can read the target URL and set the
//!    `Authorization` header.
//! 2. Implement [`RequestSender`] for whatever actually performs the exchange.
//! 3. Share one [`TokenCache`] (backed by any [`TokenSource`] closure) across transports.
//! 4. Send requests; tokens are fetched once per origin and refreshed shortly before expiry.
//!
//! [`TokenSource`]: feign::source::TokenSource

// std
use std::{
	borrow::Cow,
	collections::BTreeMap,
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use color_eyre::Result;
use time::Duration;
// self
use feign::{
	auth::Origin,
	cache::TokenCache,
	error::{FetchError, HeaderError},
	http::{AuthorizableRequest, RequestSender, SendFuture},
	source::IssuedToken,
	transport::AuthTransport,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let minted = Arc::new(AtomicUsize::new(0));
	let counter = minted.clone();
	let cache = Arc::new(
		TokenCache::new(move |origin: Origin| {
			let serial = counter.fetch_add(1, Ordering::SeqCst) + 1;

			async move {
				if origin.as_str().contains("legacy") {
					return Err(FetchError::message("legacy backends do not issue tokens"));
				}

				Ok(IssuedToken::new(format!("demo-{serial}"), Duration::minutes(15)))
			}
		})
		.with_refresh_lead(Duration::seconds(30)),
	);
	let transport = AuthTransport::with_sender(cache.clone(), EchoSender);

	for url in [
		"https://orders.example.com/v1/orders?page=1",
		"https://orders.example.com/v1/orders?page=2",
		"https://billing.example.com:8443/invoices",
		"https://legacy.example.com/reports",
		"definitely not a url",
	] {
		let request = DemoRequest::get(url);

		match transport.send(request).await {
			Ok(echo) => println!(
				"{url} -> authorization: {}.",
				echo.headers.get("authorization").map(String::as_str).unwrap_or("<none>")
			),
			Err(e) => println!("{url} -> sender failed: {e}."),
		}
	}

	println!(
		"Tokens minted: {}; cache hits: {}; origins cached: {}.",
		minted.load(Ordering::SeqCst),
		cache.metrics().hits(),
		cache.len().await
	);

	Ok(())
}

#[derive(Clone, Debug)]
struct DemoRequest {
	url: String,
	headers: BTreeMap<String, String>,
}
impl DemoRequest {
	fn get(url: &str) -> Self {
		Self { url: url.into(), headers: BTreeMap::new() }
	}
}
impl AuthorizableRequest for DemoRequest {
	fn target_url(&self) -> Cow<'_, str> {
		Cow::Borrowed(&self.url)
	}

	fn set_authorization(&mut self, value: &str) -> Result<(), HeaderError> {
		if value.chars().any(char::is_control) {
			return Err(HeaderError::InvalidValue { source: None });
		}

		self.headers.insert("authorization".into(), value.into());

		Ok(())
	}

	fn authorization(&self) -> Option<&str> {
		self.headers.get("authorization").map(String::as_str)
	}
}

#[derive(Debug)]
struct DemoSendError;
impl Display for DemoSendError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("demo sender refused the request")
	}
}
impl StdError for DemoSendError {}

/// Sender that answers every request with the request itself.
#[derive(Clone, Debug)]
struct EchoSender;
impl RequestSender for EchoSender {
	type Error = DemoSendError;
	type Request = DemoRequest;
	type Response = DemoRequest;

	fn send(&self, request: Self::Request) -> SendFuture<'_, Self::Response, Self::Error> {
		Box::pin(async move {
			if request.url.is_empty() {
				return Err(DemoSendError);
			}

			Ok(request)
		})
	}
}
