//! Immutable cached token with expiry and refresh-window helpers.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Freshness of a cached [`Token`] relative to a refresh lead time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Token is valid and outside the refresh window.
	Fresh,
	/// Token is still valid but inside the refresh window, so the next lookup refreshes it.
	Due,
	/// Token exceeded its expiry instant.
	Expired,
}

/// Bearer token cached for one origin.
///
/// Tokens are never mutated; a refresh replaces the whole value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
	value: TokenSecret,
	expires_at: OffsetDateTime,
}
impl Token {
	/// Creates a token that expires at the provided instant.
	pub fn new(value: impl Into<TokenSecret>, expires_at: OffsetDateTime) -> Self {
		Self { value: value.into(), expires_at }
	}

	/// Creates a token issued at `now` that stays valid for `valid_for`.
	pub fn issued_at(value: impl Into<TokenSecret>, now: OffsetDateTime, valid_for: Duration) -> Self {
		Self::new(value, now.saturating_add(valid_for))
	}

	/// Token value.
	pub fn value(&self) -> &TokenSecret {
		&self.value
	}

	/// Hard expiry instant.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Instant from which the token is due for refresh under the provided lead time.
	pub fn refresh_at(&self, lead: Duration) -> OffsetDateTime {
		self.expires_at.saturating_sub(lead)
	}

	/// Returns `true` once `now` reaches `expires_at - lead`.
	pub fn is_due_at(&self, now: OffsetDateTime, lead: Duration) -> bool {
		now >= self.refresh_at(lead)
	}

	/// Returns `true` once `now` reaches the hard expiry.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.expires_at
	}

	/// Computes the freshness status at a given instant.
	pub fn status_at(&self, now: OffsetDateTime, lead: Duration) -> TokenStatus {
		if self.is_expired_at(now) {
			return TokenStatus::Expired;
		}
		if self.is_due_at(now, lead) {
			return TokenStatus::Due;
		}

		TokenStatus::Fresh
	}

	/// Time left before hard expiry; negative once expired.
	pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
		self.expires_at - now
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("value", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
