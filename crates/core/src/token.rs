//! In-memory access token storage.
//!
//! The access token lives only in process memory. It is never written to
//! disk, never logged, and disappears with the process.

use std::sync::Arc;

use parking_lot::RwLock;

/// Opaque bearer credential.
///
/// `Debug` is redacted so tokens never reach log output.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Arc<str>);

impl AccessToken {
	pub fn new(token: impl AsRef<str>) -> Self {
		Self(Arc::from(token.as_ref()))
	}

	/// Raw token value, for the `Authorization` header only.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// `Authorization` header value for this token.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}
}

impl std::fmt::Debug for AccessToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "AccessToken(<redacted, {} bytes>)", self.0.len())
	}
}

impl From<String> for AccessToken {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for AccessToken {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

/// Holds the single live access token.
///
/// At most one token is live at a time; every reader observes the latest
/// `set`. Writes outside of login/logout are funneled through the refresh
/// coordinator, which serializes them.
#[derive(Debug, Default)]
pub struct AccessTokenStore {
	current: RwLock<Option<AccessToken>>,
}

impl AccessTokenStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the live token (or clears it with `None`).
	pub fn set(&self, token: Option<AccessToken>) {
		*self.current.write() = token;
	}

	/// Returns the live token, if any.
	pub fn get(&self) -> Option<AccessToken> {
		self.current.read().clone()
	}

	pub fn clear(&self) {
		self.set(None);
	}

	pub fn is_present(&self) -> bool {
		self.current.read().is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_then_get_returns_latest() {
		let store = AccessTokenStore::new();
		assert!(store.get().is_none());

		store.set(Some("first".into()));
		store.set(Some("second".into()));
		assert_eq!(store.get(), Some(AccessToken::new("second")));

		store.clear();
		assert!(!store.is_present());
	}

	#[test]
	fn debug_never_prints_the_token() {
		let token = AccessToken::new("super-secret");
		let rendered = format!("{token:?}");
		assert!(!rendered.contains("super-secret"));
		assert_eq!(token.bearer(), "Bearer super-secret");
	}
}
