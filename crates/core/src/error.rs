//! Classified error taxonomy surfaced to every caller of the session layer.
//!
//! Callers never see raw transport failures: the pipeline routes every
//! failure through [`crate::classify`] and hands back one of the five
//! variants below, each with a display-ready message and an optional
//! machine code lifted from the server envelope.

use serde::Serialize;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Machine code attached to failures where no response was received.
pub const NETWORK_ERROR_CODE: &str = "NETWORK_ERROR";
/// Machine code attached to requests that exceeded the request timeout.
pub const TIMEOUT_CODE: &str = "TIMEOUT";
/// Machine code attached to failures that fit no other category.
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";

/// A classified failure.
///
/// `Clone` so a single refresh outcome can be handed to every request
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// 4xx other than 401, or an envelope `error` on a successful status.
	#[error("{message}")]
	Validation { status: u16, message: String, code: Option<String> },

	/// Authentication absent or rejected after the refresh-and-retry cycle.
	#[error("{message}")]
	Auth { message: String, code: Option<String> },

	/// No response was received (connect failure, timeout, broken body).
	#[error("{message}")]
	Network { message: String, code: Option<String> },

	/// 5xx response.
	#[error("{message}")]
	Server { status: u16, message: String, code: Option<String> },

	/// Anything else, including undecodable payloads.
	#[error("{message}")]
	Unknown { message: String, code: Option<String> },
}

/// Fieldless mirror of [`Error`] for matching and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
	ValidationError,
	AuthError,
	NetworkError,
	ServerError,
	UnknownError,
}

impl std::fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorKind::ValidationError => write!(f, "VALIDATION_ERROR"),
			ErrorKind::AuthError => write!(f, "AUTH_ERROR"),
			ErrorKind::NetworkError => write!(f, "NETWORK_ERROR"),
			ErrorKind::ServerError => write!(f, "SERVER_ERROR"),
			ErrorKind::UnknownError => write!(f, "UNKNOWN_ERROR"),
		}
	}
}

impl Error {
	pub fn validation(status: u16, message: impl Into<String>) -> Self {
		Error::Validation {
			status,
			message: message.into(),
			code: None,
		}
	}

	pub fn auth(message: impl Into<String>) -> Self {
		Error::Auth {
			message: message.into(),
			code: None,
		}
	}

	pub fn network(message: impl Into<String>) -> Self {
		Error::Network {
			message: message.into(),
			code: Some(NETWORK_ERROR_CODE.to_string()),
		}
	}

	pub fn timeout(message: impl Into<String>) -> Self {
		Error::Network {
			message: message.into(),
			code: Some(TIMEOUT_CODE.to_string()),
		}
	}

	pub fn server(status: u16, message: impl Into<String>) -> Self {
		Error::Server {
			status,
			message: message.into(),
			code: None,
		}
	}

	pub fn unknown(message: impl Into<String>) -> Self {
		Error::Unknown {
			message: message.into(),
			code: Some(UNKNOWN_ERROR_CODE.to_string()),
		}
	}

	/// Replaces the machine code.
	pub fn with_code(mut self, new_code: Option<String>) -> Self {
		match &mut self {
			Error::Validation { code, .. }
			| Error::Auth { code, .. }
			| Error::Network { code, .. }
			| Error::Server { code, .. }
			| Error::Unknown { code, .. } => *code = new_code,
		}
		self
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::Validation { .. } => ErrorKind::ValidationError,
			Error::Auth { .. } => ErrorKind::AuthError,
			Error::Network { .. } => ErrorKind::NetworkError,
			Error::Server { .. } => ErrorKind::ServerError,
			Error::Unknown { .. } => ErrorKind::UnknownError,
		}
	}

	/// Display-ready message.
	pub fn message(&self) -> &str {
		match self {
			Error::Validation { message, .. }
			| Error::Auth { message, .. }
			| Error::Network { message, .. }
			| Error::Server { message, .. }
			| Error::Unknown { message, .. } => message,
		}
	}

	/// Machine code from the server envelope, or a client-side code.
	pub fn code(&self) -> Option<&str> {
		match self {
			Error::Validation { code, .. }
			| Error::Auth { code, .. }
			| Error::Network { code, .. }
			| Error::Server { code, .. }
			| Error::Unknown { code, .. } => code.as_deref(),
		}
	}

	/// HTTP status that produced the error, when a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Error::Validation { status, .. } | Error::Server { status, .. } => Some(*status),
			_ => None,
		}
	}

	pub fn is_auth(&self) -> bool {
		matches!(self, Error::Auth { .. })
	}

	pub fn is_network(&self) -> bool {
		matches!(self, Error::Network { .. })
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::Network { code: Some(code), .. } if code == TIMEOUT_CODE)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::unknown(format!("Invalid JSON payload: {err}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_is_the_message() {
		let err = Error::validation(422, "targets must not be empty");
		assert_eq!(err.to_string(), "targets must not be empty");
		assert_eq!(err.kind(), ErrorKind::ValidationError);
		assert_eq!(err.status(), Some(422));
	}

	#[test]
	fn timeout_is_a_network_error() {
		let err = Error::timeout("Request timed out");
		assert!(err.is_network());
		assert!(err.is_timeout());
		assert!(!Error::network("down").is_timeout());
	}

	#[test]
	fn with_code_overrides_any_variant() {
		let err = Error::auth("expired").with_code(Some("TOKEN_EXPIRED".into()));
		assert_eq!(err.code(), Some("TOKEN_EXPIRED"));
		assert!(err.is_auth());
	}

	#[test]
	fn kind_serializes_screaming_snake() {
		assert_eq!(serde_json::to_string(&ErrorKind::ServerError).unwrap(), "\"SERVER_ERROR\"");
		assert_eq!(ErrorKind::AuthError.to_string(), "AUTH_ERROR");
	}
}
