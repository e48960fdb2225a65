//! Origin keys (`scheme://host[:port]`) used to partition cached tokens per backend.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Error returned when a URL cannot be reduced to an origin key.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum OriginError {
	/// The URL could not be parsed at all.
	#[error("URL is malformed.")]
	Malformed {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The URL parsed but has no host component (e.g. `mailto:` or `data:` URLs).
	#[error("URL `{url}` has no host.")]
	MissingHost {
		/// Offending URL.
		url: String,
	},
}

/// Backend identity derived from a URL's scheme, host, and non-default port.
///
/// Path, query, fragment, and userinfo are discarded. Scheme and host are lowercased by the URL
/// parser, and default ports are omitted, so `HTTPS://API.example.com:443/v1?x=1` and
/// `https://api.example.com` share one key. The empty key is the *unresolved* origin used when
/// a request URL cannot be parsed.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Origin(String);
impl Origin {
	/// Parses a URL string and reduces it to its origin key.
	pub fn parse(raw: &str) -> Result<Self, OriginError> {
		let url = Url::parse(raw).map_err(|source| OriginError::Malformed { source })?;

		Self::from_url(&url)
	}

	/// Reduces an already parsed URL to its origin key.
	pub fn from_url(url: &Url) -> Result<Self, OriginError> {
		let host =
			url.host_str().ok_or_else(|| OriginError::MissingHost { url: url.to_string() })?;
		let key = match url.port() {
			Some(port) => format!("{}://{host}:{port}", url.scheme()),
			None => format!("{}://{host}", url.scheme()),
		};

		Ok(Self(key))
	}

	/// Resolves a URL string, degrading to [`Origin::unresolved`] when it cannot be parsed.
	pub fn resolve(raw: &str) -> Self {
		Self::parse(raw).unwrap_or_default()
	}

	/// Returns the empty origin used for unparsable request URLs.
	pub fn unresolved() -> Self {
		Self::default()
	}

	/// Returns `true` for the empty origin.
	pub fn is_unresolved(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the origin key as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for Origin {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for Origin {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for Origin {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<Origin> for String {
	fn from(value: Origin) -> Self {
		value.0
	}
}
impl TryFrom<String> for Origin {
	type Error = OriginError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		if value.is_empty() {
			return Ok(Self::unresolved());
		}

		Self::parse(&value)
	}
}
impl TryFrom<&Url> for Origin {
	type Error = OriginError;

	fn try_from(value: &Url) -> Result<Self, Self::Error> {
		Self::from_url(value)
	}
}
impl FromStr for Origin {
	type Err = OriginError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl Debug for Origin {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Origin({})", self.0)
	}
}
impl Display for Origin {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parse_discards_path_query_fragment_and_userinfo() {
		let origin = Origin::parse("https://user:pw@api.example.com/v1/items?page=2#top")
			.expect("Absolute URL fixture should resolve to an origin.");

		assert_eq!(origin.as_str(), "https://api.example.com");
	}

	#[test]
	fn default_ports_collapse_and_custom_ports_survive() {
		let implicit = Origin::parse("https://api.example.com/a")
			.expect("Implicit-port fixture should resolve.");
		let explicit = Origin::parse("https://api.example.com:443/b")
			.expect("Explicit default-port fixture should resolve.");
		let custom = Origin::parse("https://api.example.com:8443/c")
			.expect("Custom-port fixture should resolve.");

		assert_eq!(implicit, explicit);
		assert_ne!(implicit, custom);
		assert_eq!(custom.as_str(), "https://api.example.com:8443");
		assert_eq!(
			Origin::parse("http://127.0.0.1:8080/health")
				.expect("Loopback fixture should resolve.")
				.as_str(),
			"http://127.0.0.1:8080"
		);
	}

	#[test]
	fn scheme_and_host_are_case_normalized() {
		let origin = Origin::parse("HTTPS://API.Example.COM/Path")
			.expect("Mixed-case fixture should resolve.");

		assert_eq!(origin.as_str(), "https://api.example.com");
	}

	#[test]
	fn malformed_and_hostless_urls_fail_to_parse() {
		assert!(matches!(Origin::parse("not a url"), Err(OriginError::Malformed { .. })));
		assert!(matches!(Origin::parse("/relative/path"), Err(OriginError::Malformed { .. })));
		assert!(matches!(
			Origin::parse("mailto:ops@example.com"),
			Err(OriginError::MissingHost { .. })
		));
	}

	#[test]
	fn resolve_degrades_to_unresolved() {
		let origin = Origin::resolve("::::");

		assert!(origin.is_unresolved());
		assert_eq!(origin, Origin::unresolved());
		assert_eq!(origin.as_str(), "");
		assert!(!Origin::resolve("https://api.example.com").is_unresolved());
	}

	#[test]
	fn serde_round_trip_normalizes_and_validates() {
		let origin: Origin = serde_json::from_str("\"https://API.example.com:443/ignored\"")
			.expect("Origin should deserialize from a URL string.");

		assert_eq!(origin.as_str(), "https://api.example.com");
		assert_eq!(
			serde_json::to_string(&origin).expect("Origin should serialize."),
			"\"https://api.example.com\""
		);
		assert!(serde_json::from_str::<Origin>("\"no scheme\"").is_err());
		assert!(
			serde_json::from_str::<Origin>("\"\"")
				.expect("Empty string should deserialize as the unresolved origin.")
				.is_unresolved()
		);
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<Origin, u8> = HashMap::from_iter([(
			Origin::parse("https://api.example.com").expect("Lookup fixture should resolve."),
			7_u8,
		)]);

		assert_eq!(map.get("https://api.example.com"), Some(&7));
	}
}
