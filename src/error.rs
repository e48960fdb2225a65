//! Crate-level error types shared by the token source, transport, and REST client.
//!
//! Only the REST client surfaces [`Error`] to callers. The token cache swallows
//! [`FetchError`] and the transport passes its sender's error through untouched.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by the REST client.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Server answered with a non-success status.
	#[error(transparent)]
	Status(#[from] StatusError),
	/// JSON payload could not be encoded or decoded.
	#[cfg(feature = "reqwest")]
	#[error(transparent)]
	Codec(#[from] CodecError),
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL parsed but cannot address an HTTP origin.
	#[error("Base URL `{url}` must use http or https and name a host.")]
	UnsupportedBaseUrl {
		/// Offending URL as supplied by the caller.
		url: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request could not be constructed.
	#[error("HTTP request could not be constructed.")]
	RequestBuild {
		/// Underlying request builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Wraps a request builder failure inside [`ConfigError`].
	pub fn request_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::RequestBuild { source: Box::new(src) }
	}
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Non-success HTTP response captured with its raw body.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Server responded with status {status}.")]
pub struct StatusError {
	/// HTTP status code.
	pub status: u16,
	/// Response body, decoded lossily as UTF-8.
	pub body: String,
}

/// JSON encoding and decoding failures.
#[cfg(feature = "reqwest")]
#[derive(Debug, ThisError)]
pub enum CodecError {
	/// Request body could not be serialized.
	#[error("Request body could not be encoded as JSON.")]
	Encode(#[source] serde_json::Error),
	/// Response body could not be deserialized into the requested type.
	#[error("Response body could not be decoded as JSON at `{path}`.", path = .source.path())]
	Decode {
		/// Structured parsing failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the decoded response.
		status: u16,
	},
	/// Response body held more than one JSON document.
	#[error("Response body has trailing data after the JSON document.")]
	TrailingData {
		/// Parser failure pointing at the trailing bytes.
		#[source]
		source: serde_json::Error,
		/// HTTP status code of the decoded response.
		status: u16,
	},
}

/// Failure reported by a [`TokenSource`](crate::source::TokenSource).
///
/// The token cache recovers from every fetch failure locally, so these values never reach
/// callers of the cache or the transport; they only feed logs.
#[derive(Debug, ThisError)]
pub enum FetchError {
	/// Source reported a plain message.
	#[error("Token source failed: {message}.")]
	Message {
		/// Human-readable failure summary.
		message: String,
	},
	/// Source reported a structured error.
	#[error("Token source failed.")]
	Source {
		/// Underlying failure.
		#[source]
		source: BoxError,
	},
}
impl FetchError {
	/// Wraps an arbitrary error raised while obtaining a token.
	pub fn new(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Source { source: Box::new(src) }
	}

	/// Builds a failure from a message.
	pub fn message(message: impl Into<String>) -> Self {
		Self::Message { message: message.into() }
	}
}

/// Failure to place a credential on an outgoing request.
#[derive(Debug, ThisError)]
pub enum HeaderError {
	/// Value contains bytes that are not allowed in an HTTP header.
	#[error("Authorization header value is not a valid HTTP header value.")]
	InvalidValue {
		/// Header library failure, when one is available.
		#[source]
		source: Option<BoxError>,
	},
}
